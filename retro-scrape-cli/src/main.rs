//! retro-scrape CLI
//!
//! Scrapes metadata and media for a folder of game files and writes the
//! document an emulator frontend reads.

mod cli_types;
mod commands;
mod error;
mod progress_bar;
mod resolve;

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use retro_scrape_lib::{FileSettings, config_path};

use cli_types::{CacheAction, Cli, Commands};
use commands::cache::{run_cache_clean, run_cache_merge};
use commands::list::run_list;
use commands::scrape::run_scrape;
use error::CliError;

/// `--quiet` shows warnings and errors, `--verbose` adds debug messages
/// with timestamps. `RUST_LOG` overrides both.
fn init_logging(quiet: bool, verbose: bool) {
    let level = if quiet {
        LevelFilter::Warn
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if !verbose {
        builder.format(|buf, record| writeln!(buf, "{}", record.args()));
    }
    builder.parse_default_env();
    builder.init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    let path = cli.config.clone().unwrap_or_else(config_path);
    let settings = FileSettings::load(&path)?;

    match cli.command {
        Commands::Scrape(ref args) => run_scrape(args, &settings, cli.quiet),
        Commands::Cache { ref action } => match action {
            CacheAction::Clean { target } => run_cache_clean(target, &settings),
            CacheAction::Merge {
                from,
                update,
                target,
            } => run_cache_merge(from, *update, target, &settings),
        },
        Commands::List => {
            run_list();
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{} {}", "\u{2718}".if_supports_color(Stderr, |t| t.red()), e);
            ExitCode::FAILURE
        }
    }
}
