use std::path::PathBuf;

use thiserror::Error;

use retro_scrape_cache::CacheError;
use retro_scrape_core::CoreError;
use retro_scrape_frontend::FrontendError;
use retro_scrape_sources::SourceError;

/// Errors that end a scrape run or a maintenance operation.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Input folder '{}' does not exist", .0.display())]
    InputMissing(PathBuf),

    /// Every one of the first files missed. The platform and source do
    /// not fit each other, so scraping the rest would waste the quota.
    #[error(
        "The first {processed} files all failed to match on '{backend}' for platform '{platform}'. \
         Check that the platform fits the files and that the source supports it"
    )]
    SystemicMismatch {
        processed: usize,
        backend: String,
        platform: String,
    },

    /// The run needs the cache (the localdb source) and it cannot be opened.
    #[error("Local cache unavailable: {0}")]
    CacheUnavailable(#[source] CacheError),

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("Invalid settings file '{}': {message}", path.display())]
    Settings { path: PathBuf, message: String },

    #[error("Frontend error: {0}")]
    Frontend(#[from] FrontendError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScrapeError {
    /// Whether the run stopped because of the mismatch guard.
    pub fn is_mismatch(&self) -> bool {
        matches!(self, Self::SystemicMismatch { .. })
    }
}
