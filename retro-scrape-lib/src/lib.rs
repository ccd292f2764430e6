//! Scrape orchestration for retro-scrape.
//!
//! [`run_scrape`] takes a resolved [`ScrapeConfig`](retro_scrape_core::ScrapeConfig),
//! scans the input folder, splits the files over worker tasks, matches each
//! file against the selected source and folds the results into the local
//! cache, the miss log and the frontend document. [`clean_cache`] and
//! [`merge_cache`] maintain the cache between runs.

pub mod aggregate;
pub mod async_util;
pub mod error;
pub mod maintenance;
pub mod matcher;
pub mod media;
pub mod miss_log;
pub mod progress;
pub mod run;
pub mod scanner;
pub mod settings;
pub mod shard;
pub mod worker_pool;

pub use aggregate::{ABORT_WINDOW, RunStats};
pub use async_util::run_with_events;
pub use error::ScrapeError;
pub use maintenance::{clean_cache, merge_cache};
pub use progress::{FileProgress, ScrapeEvent, format_hms};
pub use run::{RunReport, run_scrape};
pub use settings::{FileSettings, SectionSettings, config_path, default_cache_dir};
