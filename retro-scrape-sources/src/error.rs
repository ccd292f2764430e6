/// Errors raised by a metadata source.
///
/// None of these are fatal to a scrape run: the worker that hits one logs it
/// and records the file as a miss.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by {0}")]
    RateLimit(&'static str),

    #[error("Game not found")]
    NotFound,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Server is closed: {0}")]
    ServerClosed(String),

    #[error("Server error (HTTP {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Definitions file error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SourceError {
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
