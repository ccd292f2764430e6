use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

use crate::error::SourceError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("retro-scrape/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client for one source, spacing API calls at least
/// `min_interval` apart across all workers.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    last_request: Arc<Mutex<Instant>>,
    min_interval: Duration,
    name: &'static str,
}

impl HttpTransport {
    pub fn new(name: &'static str, min_interval: Duration) -> Result<Self, SourceError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        let start = Instant::now()
            .checked_sub(min_interval)
            .unwrap_or_else(Instant::now);
        Ok(Self {
            http,
            last_request: Arc::new(Mutex::new(start)),
            min_interval,
            name,
        })
    }

    /// GET an API endpoint and return the body text.
    ///
    /// Maps rejected credentials and throttling to dedicated errors so
    /// callers can log them distinctly.
    pub async fn get_text(&self, url: &str, params: &[(&str, String)]) -> Result<String, SourceError> {
        self.rate_limit().await;

        let resp = self.http.get(url).query(params).send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SourceError::InvalidCredentials(format!(
                "{} rejected the credentials",
                self.name
            )));
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimit(self.name));
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound);
        }
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(SourceError::ServerError {
                status: status.as_u16(),
                message: snippet(&text).to_string(),
            });
        }
        Ok(text)
    }

    /// Download a media file. Media hosts are not rate limited.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let resp = self.http.get(url).send().await?.error_for_status()?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }

    /// Wait until at least `min_interval` has passed since the last API request.
    async fn rate_limit(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();
        if elapsed < self.min_interval {
            tokio::time::sleep(self.min_interval - elapsed).await;
        }
        *last = Instant::now();
    }
}

/// First 200 bytes of a response body, cut on a char boundary, for error messages.
pub(crate) fn snippet(text: &str) -> &str {
    let mut end = text.len().min(200);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Parse a JSON body, reporting the start of the body on failure.
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(text: &str, what: &str) -> Result<T, SourceError> {
    serde_json::from_str(text)
        .map_err(|e| SourceError::api(format!("Failed to parse {what}: {e}. Response: {}", snippet(text))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_respects_char_boundaries() {
        let text = "é".repeat(150);
        let cut = snippet(&text);
        assert!(cut.len() <= 200);
        assert!(text.starts_with(cut));
    }

    #[test]
    fn parse_json_reports_body() {
        let err = parse_json::<serde_json::Value>("<html>oops</html>", "game info").unwrap_err();
        assert!(err.to_string().contains("<html>oops"));
    }
}
