use std::io::{self, Write};
use std::sync::Arc;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_scrape_lib::{FileSettings, RunReport, ScrapeEvent, run_with_events};

use crate::cli_types::ScrapeArgs;
use crate::error::CliError;
use crate::progress_bar::ProgressDisplay;
use crate::resolve::{Resolved, resolve_scrape};

/// Run the scrape command.
pub(crate) fn run_scrape(args: &ScrapeArgs, settings: &FileSettings, quiet: bool) -> Result<(), CliError> {
    let Resolved {
        config,
        frontend,
        sources,
    } = resolve_scrape(args, settings)?;
    let config = Arc::new(config);

    log::info!(
        "Scraping '{}' from {} using {}",
        config.platform.if_supports_color(Stdout, |t| t.bold()),
        config.input_dir.display().if_supports_color(Stdout, |t| t.cyan()),
        config.source.if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "Document: {}",
        config.document_path.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::info!(
        "Media:    {}",
        config.media_dir.display().if_supports_color(Stdout, |t| t.dimmed()),
    );
    if let Some(ref emulator) = config.emulator {
        log::info!("Emulator: {}", emulator.if_supports_color(Stdout, |t| t.green()));
    }
    if config.pretend {
        log::info!(
            "{}",
            "Pretend mode: nothing will be written except the miss log"
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let rt = tokio::runtime::Runtime::new().map_err(|e| CliError::runtime(e.to_string()))?;
    let frontend = frontend.build(&config);
    let display = ProgressDisplay::new(quiet);

    let result = rt.block_on(async {
        let (event_tx, event_rx) = tokio::sync::mpsc::unbounded_channel::<ScrapeEvent>();
        let run = retro_scrape_lib::run_scrape(
            Arc::clone(&config),
            sources,
            frontend.as_ref(),
            Some(event_tx),
        );
        run_with_events(run, event_rx, |e| display.handle(e)).await
    });
    display.finish();

    let report = result?;
    print_summary(&report);
    Ok(())
}

/// Printed on stdout so `--quiet` keeps it.
fn print_summary(report: &RunReport) {
    if let Err(e) = write_summary(&mut std::io::stdout().lock(), report) {
        log::warn!("Cannot print the summary: {e}");
    }
}

fn write_summary(out: &mut impl Write, report: &RunReport) -> io::Result<()> {
    let stats = &report.stats;
    writeln!(out)?;
    writeln!(out, "{}", "Summary:".if_supports_color(Stdout, |t| t.bold()))?;
    writeln!(
        out,
        "  Total number of games: {} ({} worker{})",
        stats.total,
        report.threads,
        if report.threads == 1 { "" } else { "s" },
    )?;
    writeln!(
        out,
        "  {} Successfully processed games: {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        stats.found,
    )?;
    if stats.not_found > 0 {
        writeln!(
            out,
            "  {} Skipped games: {}",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            stats.not_found,
        )?;
    }
    if let Some(mean) = stats.mean_match {
        writeln!(out, "  Average search match: {mean:.0}%")?;
    }
    if let Some(mean) = stats.mean_completeness {
        writeln!(out, "  Average entry completeness: {mean:.0}%")?;
    }
    if report.preserved > 0 {
        writeln!(out, "  Kept from existing document: {}", report.preserved)?;
    }
    writeln!(out, "  Elapsed: {}", stats.elapsed_hms())?;

    if report.pretend {
        writeln!(
            out,
            "  {}",
            "Pretend mode, document not written".if_supports_color(Stdout, |t| t.dimmed()),
        )
    } else if let Some(ref e) = report.document_error {
        writeln!(
            out,
            "  {} All scraping succeeded but the document failed to save: {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            e,
        )
    } else {
        writeln!(
            out,
            "  {} {} entries written to {}",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            report.entries,
            report.document_path.display(),
        )
    }
}
