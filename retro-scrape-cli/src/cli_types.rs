//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use retro_scrape_core::{Platform, SourceKind};
use retro_scrape_frontend::FrontendKind;

#[derive(Parser)]
#[command(name = "retro-scrape")]
#[command(about = "Scrape game metadata and media for emulator frontends", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which platform folder and cache a command works on.
#[derive(Args, Clone)]
pub(crate) struct TargetArgs {
    /// Platform name or alias (e.g., snes, megadrive, arcade)
    #[arg(short, long)]
    pub platform: Platform,

    /// Folder holding the ROM files (default: current directory)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Base folder of the local cache
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Do not descend into subfolders of the input folder
    #[arg(long, alias = "nosubdirs")]
    pub no_subdirs: bool,
}

#[derive(Args, Clone)]
pub(crate) struct ScrapeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Metadata source (thegamesdb, screenscraper, arcadedb, localdb, import)
    #[arg(short, long)]
    pub source: Option<SourceKind>,

    /// Frontend to write the document for (emulationstation, attractmode)
    #[arg(short, long)]
    pub frontend: Option<FrontendKind>,

    /// Document to write (default: gamelist.xml or romlist.txt in the input folder)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Folder for downloaded media (default: <input>/media)
    #[arg(long)]
    pub media_dir: Option<PathBuf>,

    /// Attract-Mode emulator the romlist is written for
    #[arg(short, long)]
    pub emulator: Option<String>,

    /// Definitions file for the import source
    #[arg(long)]
    pub import_file: Option<PathBuf>,

    /// Number of concurrent workers (1-8)
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Minimum match percentage for a search result to be accepted (0-100)
    #[arg(short, long)]
    pub min_match: Option<u8>,

    /// Cut descriptions longer than this many characters (0-10000)
    #[arg(long)]
    pub max_length: Option<usize>,

    /// Preferred region for titles and media (e.g., us, eu, jp)
    #[arg(long)]
    pub region: Option<String>,

    /// Preferred language for descriptions (e.g., en, fr)
    #[arg(long)]
    pub language: Option<String>,

    /// Also scrape videos where the source has them
    #[arg(long)]
    pub video: bool,

    /// Write unmatched files into the document as well
    #[arg(long)]
    pub include_skipped: bool,

    /// Keep bracket notes like (USA) or [!] from the file name in titles
    #[arg(long)]
    pub keep_brackets: bool,

    /// Keep entries already in the document and skip their files
    #[arg(long)]
    pub skip_existing: bool,

    /// Do not read or write the local cache
    #[arg(long, alias = "nolocaldb")]
    pub no_local_cache: bool,

    /// Scrape without writing the document, media or cache
    #[arg(short = 'n', long)]
    pub pretend: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Scrape a platform folder and write the frontend document
    Scrape(ScrapeArgs),

    /// Maintain the local cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// List supported platforms
    List,
}

#[derive(Subcommand)]
pub(crate) enum CacheAction {
    /// Remove cached records for files no longer in the input folder
    Clean {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Merge another cache folder into this platform's cache
    Merge {
        /// Cache folder (or its db.json) to merge from
        from: PathBuf,

        /// Let merged values replace fields that are already cached
        #[arg(long)]
        update: bool,

        #[command(flatten)]
        target: TargetArgs,
    },
}
