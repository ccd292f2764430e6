use thiserror::Error;

use retro_scrape_core::CoreError;
use retro_scrape_frontend::FrontendError;
use retro_scrape_lib::ScrapeError;

/// Errors that can occur during CLI command execution.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// The run or maintenance operation failed.
    #[error("{0}")]
    Scrape(#[from] ScrapeError),

    #[error("Config error: {0}")]
    Config(String),

    /// Runtime creation or async error
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl CliError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn runtime(msg: impl Into<String>) -> Self {
        Self::Runtime(msg.into())
    }
}

impl From<CoreError> for CliError {
    fn from(e: CoreError) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<FrontendError> for CliError {
    fn from(e: FrontendError) -> Self {
        Self::Config(e.to_string())
    }
}
