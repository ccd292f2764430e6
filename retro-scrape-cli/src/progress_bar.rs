//! Terminal progress for a scrape run.
//!
//! A spinner covers setup and finalization; a bar tracks files while
//! workers run. Per-file results go through the logger, printed above the
//! bar so they are not overwritten.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use retro_scrape_lib::{FileProgress, ScrapeEvent, format_hms};

const TICK: Duration = Duration::from_millis(100);

pub(crate) struct ProgressDisplay {
    bar: ProgressBar,
}

impl ProgressDisplay {
    /// Hidden when `quiet`, otherwise a spinner until the run starts.
    pub(crate) fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            ProgressBar::new_spinner()
        };
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            bar.set_style(style.tick_chars("/-\\|"));
        }
        bar.set_message("Scanning input folder...");
        bar.enable_steady_tick(TICK);
        Self { bar }
    }

    pub(crate) fn handle(&self, event: ScrapeEvent) {
        match event {
            ScrapeEvent::Started {
                total,
                threads,
                preserved,
            } => {
                if let Ok(style) = ProgressStyle::with_template(
                    "  [{bar:30.cyan/blue}] {pos}/{len} {msg}",
                ) {
                    self.bar.set_style(style.progress_chars("=> "));
                }
                self.bar.set_length(total as u64);
                self.bar.set_position(0);
                self.bar.set_message(format!("({threads} workers)"));
                if preserved > 0 {
                    self.bar.println(format!(
                        "  {} keeping {preserved} entries from the existing document",
                        "\u{2139}".if_supports_color(Stdout, |t| t.cyan()),
                    ));
                }
            }
            ScrapeEvent::Processed(progress) => {
                self.bar.set_position(progress.index as u64);
                self.bar.set_message(format!(
                    "ETA {} {}",
                    format_hms(progress.remaining),
                    progress.base_name
                ));
                self.bar.suspend(|| log_file_result(&progress));
            }
            ScrapeEvent::Finalizing => {
                if let Ok(style) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
                    self.bar.set_style(style.tick_chars("/-\\|"));
                }
                self.bar.set_message("Writing cache and document...");
            }
        }
    }

    pub(crate) fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

fn log_file_result(p: &FileProgress) {
    if p.found {
        log::info!(
            "  {} [{:>3.0}%] {} -> \"{}\" (match {}%, complete {:.0}%)",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            p.percent_done(),
            p.base_name,
            p.title.as_deref().unwrap_or(&p.base_name),
            p.search_match,
            p.completeness,
        );
    } else {
        match p.title.as_deref() {
            Some(closest) => log::info!(
                "  {} [{:>3.0}%] {}: no match (closest: \"{}\")",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                p.percent_done(),
                p.base_name,
                closest,
            ),
            None => log::info!(
                "  {} [{:>3.0}%] {}: no match",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                p.percent_done(),
                p.base_name,
            ),
        }
    }
}
