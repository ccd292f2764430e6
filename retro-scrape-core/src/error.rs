use crate::platform::PlatformParseError;
use crate::source::SourceParseError;

/// Errors raised while resolving platform, source and run settings.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Platform(#[from] PlatformParseError),

    #[error(transparent)]
    Source(#[from] SourceParseError),

    #[error("Config error: {0}")]
    Config(String),
}

impl CoreError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
