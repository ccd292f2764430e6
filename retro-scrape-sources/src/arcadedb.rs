use std::collections::HashMap;
use std::sync::Mutex;

use serde::Deserialize;
use tokio::time::Duration;

use retro_scrape_core::{Candidate, GameEntry};

use crate::error::SourceError;
use crate::http::{HttpTransport, parse_json};
use crate::source::{Query, SourceSettings};

const BASE_URL: &str = "http://adb.arcadeitalia.net/service_scraper.php";
/// Arcade Database asks clients to stay well below one request per second.
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1500);

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    result: Vec<ArcadeGame>,
}

#[derive(Debug, Deserialize, Clone)]
struct ArcadeGame {
    game_name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    manufacturer: Option<String>,
    #[serde(default)]
    year: Option<String>,
    #[serde(default)]
    genre: Option<String>,
    #[serde(default)]
    players: Option<u32>,
    #[serde(default)]
    history: Option<String>,
    /// Community rating, 0-100.
    #[serde(default)]
    rate: Option<f32>,
    #[serde(default)]
    url_image_flyer: Option<String>,
    #[serde(default)]
    url_image_ingame: Option<String>,
    #[serde(default)]
    url_video_shortplay: Option<String>,
}

/// Arcade Database source, keyed by MAME rom name.
pub struct ArcadeDb {
    transport: HttpTransport,
    base_url: String,
    include_video: bool,
    pending: Mutex<HashMap<String, ArcadeGame>>,
}

impl ArcadeDb {
    pub fn new(settings: &SourceSettings) -> Result<Self, SourceError> {
        Ok(Self {
            transport: HttpTransport::new("Arcade Database", MIN_REQUEST_INTERVAL)?,
            base_url: settings.endpoint(BASE_URL),
            include_video: settings.include_video,
            pending: Mutex::new(HashMap::new()),
        })
    }

    /// Look the file's rom name up. The rom name is attached as an
    /// alternative title so an exact rom match scores fully.
    pub async fn search(&self, query: &Query<'_>) -> Result<Vec<Candidate>, SourceError> {
        let rom = query.base_name();
        let params = [
            ("ajax", "query_mame".to_string()),
            ("game_name", rom.clone()),
            ("use_parent", "1".to_string()),
        ];
        let text = self.transport.get_text(&self.base_url, &params).await?;
        let response: QueryResponse = parse_json(&text, "arcade query")?;

        let mut candidates = Vec::new();
        for game in response.result {
            if game.title.is_empty() {
                continue;
            }
            let mut candidate = Candidate::new(game.title.clone(), game.game_name.clone());
            candidate.release_date = game.year.clone();
            candidate.alt_titles = vec![game.game_name.clone()];
            if let Ok(mut pending) = self.pending.lock() {
                pending.insert(game.game_name.clone(), game);
            }
            candidates.push(candidate);
        }
        if candidates.is_empty() {
            log::debug!("Arcade Database has no entry for rom '{rom}'");
        }
        Ok(candidates)
    }

    /// Forget the games kept for `candidates`.
    pub fn discard(&self, candidates: &[Candidate]) {
        if let Ok(mut pending) = self.pending.lock() {
            for candidate in candidates {
                pending.remove(&candidate.reference);
            }
        }
    }

    pub async fn fetch(&self, candidate: &Candidate) -> Result<GameEntry, SourceError> {
        let game = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(&candidate.reference))
            .ok_or(SourceError::NotFound)?;

        let mut entry = GameEntry {
            title: Some(game.title.clone()),
            description: game.history.clone().filter(|h| !h.trim().is_empty()),
            release_date: game.year.clone(),
            developer: game.manufacturer.clone(),
            publisher: game.manufacturer.clone(),
            players: game.players.map(|p| p.to_string()),
            rating: game.rate.map(|r| (r / 100.0).clamp(0.0, 1.0)),
            tags: game.genre.as_deref().map(|g| g.replace(" / ", ", ")),
            ..Default::default()
        };

        if let Some(url) = &game.url_image_flyer {
            entry.cover = self.download(url).await;
        }
        if let Some(url) = &game.url_image_ingame {
            entry.screenshot = self.download(url).await;
        }
        if self.include_video {
            if let Some(url) = &game.url_video_shortplay {
                entry.video = self.download(url).await;
                if entry.video.is_some() {
                    entry.video_format = Some("mp4".to_string());
                }
            }
        }
        Ok(entry)
    }

    async fn download(&self, url: &str) -> Option<Vec<u8>> {
        if url.is_empty() {
            return None;
        }
        self.transport
            .download(url)
            .await
            .map_err(|e| log::warn!("Arcade Database media download failed: {e}"))
            .ok()
            .filter(|bytes| !bytes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_query_response() {
        let text = r#"{"release": 1, "result": [{
            "game_name": "sf2",
            "title": "Street Fighter II: The World Warrior",
            "manufacturer": "Capcom",
            "year": "1991",
            "genre": "Fighter / Versus",
            "players": 2,
            "rate": 90,
            "url_image_ingame": "http://adb/ingame/sf2.png"
        }]}"#;
        let response: QueryResponse = parse_json(text, "arcade query").unwrap();
        let game = &response.result[0];
        assert_eq!(game.game_name, "sf2");
        assert_eq!(game.players, Some(2));
        assert_eq!(game.rate, Some(90.0));
        assert!(game.url_image_flyer.is_none());
    }

    #[test]
    fn empty_result_parses() {
        let response: QueryResponse = parse_json(r#"{"release": 1, "result": []}"#, "arcade query").unwrap();
        assert!(response.result.is_empty());
    }
}
