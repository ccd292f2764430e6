use std::collections::HashMap;

use serde::Deserialize;
use tokio::sync::OnceCell;
use tokio::time::Duration;

use retro_scrape_core::{Candidate, GameEntry, Platform};

use crate::error::SourceError;
use crate::http::{HttpTransport, parse_json};
use crate::screenscraper::compact_date;
use crate::source::{Query, SourceSettings};
use crate::systems::thegamesdb_platform_id;

const BASE_URL: &str = "https://api.thegamesdb.net/v1";
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Deserialize)]
struct GamesResponse {
    data: GamesData,
    #[serde(default)]
    include: Option<Include>,
}

#[derive(Debug, Deserialize)]
struct GamesData {
    #[serde(default)]
    games: Vec<TgdbGame>,
}

#[derive(Debug, Deserialize, Clone)]
struct TgdbGame {
    id: u64,
    game_title: String,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    players: Option<u32>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    rating: Option<String>,
    #[serde(default)]
    developers: Option<Vec<u64>>,
    #[serde(default)]
    publishers: Option<Vec<u64>>,
    #[serde(default)]
    genres: Option<Vec<u64>>,
}

#[derive(Debug, Deserialize)]
struct Include {
    #[serde(default)]
    boxart: Option<ImageSet>,
}

#[derive(Debug, Deserialize)]
struct ImagesResponse {
    data: ImageSet,
}

/// Image listing shared by `include.boxart` and the `Games/Images` endpoint.
#[derive(Debug, Deserialize)]
struct ImageSet {
    base_url: BaseUrl,
    #[serde(alias = "images", default)]
    data: HashMap<String, Vec<Image>>,
}

#[derive(Debug, Deserialize)]
struct BaseUrl {
    original: String,
}

#[derive(Debug, Deserialize)]
struct Image {
    #[serde(rename = "type")]
    image_type: String,
    #[serde(default)]
    side: Option<String>,
    filename: String,
}

impl ImageSet {
    fn first_url(&self, game_id: u64, image_type: &str, side: Option<&str>) -> Option<String> {
        self.data
            .get(&game_id.to_string())?
            .iter()
            .find(|img| img.image_type == image_type && (side.is_none() || img.side.as_deref() == side))
            .map(|img| format!("{}{}", self.base_url.original, img.filename))
    }
}

/// Response of the `Genres`, `Developers` and `Publishers` endpoints.
#[derive(Debug, Deserialize)]
struct NamesResponse {
    data: HashMap<String, HashMap<String, NamedId>>,
}

#[derive(Debug, Deserialize)]
struct NamedId {
    id: u64,
    name: String,
}

type NameTable = HashMap<u64, String>;

/// TheGamesDB v1 API source.
pub struct TheGamesDb {
    transport: HttpTransport,
    base_url: String,
    api_key: String,
    genres: OnceCell<NameTable>,
    developers: OnceCell<NameTable>,
    publishers: OnceCell<NameTable>,
}

impl TheGamesDb {
    pub fn new(settings: &SourceSettings) -> Result<Self, SourceError> {
        let api_key = settings
            .credentials
            .api_key
            .clone()
            .ok_or_else(|| SourceError::config("missing TheGamesDB API key (THEGAMESDB_APIKEY)"))?;
        Ok(Self {
            transport: HttpTransport::new("TheGamesDB", MIN_REQUEST_INTERVAL)?,
            base_url: settings.endpoint(BASE_URL),
            api_key,
            genres: OnceCell::new(),
            developers: OnceCell::new(),
            publishers: OnceCell::new(),
        })
    }

    fn params(&self, extra: &[(&'static str, String)]) -> Vec<(&'static str, String)> {
        let mut params = vec![("apikey", self.api_key.clone())];
        params.extend_from_slice(extra);
        params
    }

    pub async fn search(&self, query: &Query<'_>, platform: Platform) -> Result<Vec<Candidate>, SourceError> {
        let mut extra = vec![("name", query.title.to_string())];
        if let Some(id) = thegamesdb_platform_id(platform) {
            extra.push(("filter[platform]", id.to_string()));
        }
        let text = self
            .transport
            .get_text(&format!("{}/Games/ByGameName", self.base_url), &self.params(&extra))
            .await?;
        let response: GamesResponse = parse_json(&text, "search results")?;

        Ok(response
            .data
            .games
            .into_iter()
            .map(|game| {
                let mut candidate = Candidate::new(game.game_title, game.id.to_string());
                candidate.release_date = game.release_date;
                candidate
            })
            .collect())
    }

    pub async fn fetch(&self, candidate: &Candidate) -> Result<GameEntry, SourceError> {
        let extra = [
            ("id", candidate.reference.clone()),
            ("fields", "players,publishers,developers,genres,overview,rating".to_string()),
            ("include", "boxart".to_string()),
        ];
        let text = self
            .transport
            .get_text(&format!("{}/Games/ByGameID", self.base_url), &self.params(&extra))
            .await?;
        let response: GamesResponse = parse_json(&text, "game details")?;
        let game = response
            .data
            .games
            .into_iter()
            .next()
            .ok_or(SourceError::NotFound)?;

        let mut entry = GameEntry {
            title: Some(game.game_title.clone()),
            description: game.overview.clone(),
            release_date: game.release_date.as_deref().map(compact_date),
            players: game.players.map(|p| p.to_string()),
            tags: self.names(&self.genres, "Genres", game.genres.as_deref()).await,
            developer: self.names(&self.developers, "Developers", game.developers.as_deref()).await,
            publisher: self.names(&self.publishers, "Publishers", game.publishers.as_deref()).await,
            ..Default::default()
        };
        // ESRB-style ratings ("E - Everyone") carry no score
        entry.rating = game.rating.as_deref().and_then(|r| r.parse::<f32>().ok()).map(|r| (r / 10.0).clamp(0.0, 1.0));

        let cover_url = response
            .include
            .as_ref()
            .and_then(|inc| inc.boxart.as_ref())
            .and_then(|boxart| boxart.first_url(game.id, "boxart", Some("front")));
        if let Some(url) = cover_url {
            entry.cover = self.download(&url).await;
        }
        if let Some(url) = self.screenshot_url(game.id).await {
            entry.screenshot = self.download(&url).await;
        }
        Ok(entry)
    }

    async fn screenshot_url(&self, game_id: u64) -> Option<String> {
        let extra = [
            ("games_id", game_id.to_string()),
            ("filter[type]", "screenshot".to_string()),
        ];
        let text = self
            .transport
            .get_text(&format!("{}/Games/Images", self.base_url), &self.params(&extra))
            .await
            .ok()?;
        let response: ImagesResponse = parse_json(&text, "image list").ok()?;
        response.data.first_url(game_id, "screenshot", None)
    }

    /// Resolve ids to a comma-separated name list, loading the name table on first use.
    async fn names(&self, cell: &OnceCell<NameTable>, endpoint: &str, ids: Option<&[u64]>) -> Option<String> {
        let ids = ids.filter(|ids| !ids.is_empty())?;
        let table = cell
            .get_or_try_init(|| self.load_names(endpoint))
            .await
            .map_err(|e| log::warn!("TheGamesDB {endpoint} lookup failed: {e}"))
            .ok()?;
        let names: Vec<&str> = ids
            .iter()
            .filter_map(|id| table.get(id).map(String::as_str))
            .collect();
        if names.is_empty() {
            None
        } else {
            Some(names.join(", "))
        }
    }

    async fn load_names(&self, endpoint: &str) -> Result<NameTable, SourceError> {
        let text = self
            .transport
            .get_text(&format!("{}/{endpoint}", self.base_url), &self.params(&[]))
            .await?;
        let response: NamesResponse = parse_json(&text, endpoint)?;
        Ok(response
            .data
            .into_values()
            .flat_map(|inner| inner.into_values())
            .map(|named| (named.id, named.name))
            .collect())
    }

    async fn download(&self, url: &str) -> Option<Vec<u8>> {
        self.transport
            .download(url)
            .await
            .map_err(|e| log::warn!("TheGamesDB media download failed: {e}"))
            .ok()
            .filter(|bytes| !bytes.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAME: &str = r#"{
        "code": 200,
        "data": {"count": 1, "games": [{
            "id": 136,
            "game_title": "Super Metroid",
            "release_date": "1994-04-18",
            "players": 1,
            "overview": "Samus returns.",
            "rating": "E - Everyone",
            "genres": [1, 15]
        }]},
        "include": {"boxart": {
            "base_url": {"original": "https://cdn.example/original/"},
            "data": {"136": [
                {"id": 1, "type": "boxart", "side": "back", "filename": "boxart/back/136-1.jpg"},
                {"id": 2, "type": "boxart", "side": "front", "filename": "boxart/front/136-1.jpg"}
            ]}
        }}
    }"#;

    #[test]
    fn parses_game_and_front_boxart() {
        let response: GamesResponse = parse_json(GAME, "game").unwrap();
        let game = &response.data.games[0];
        assert_eq!(game.game_title, "Super Metroid");
        assert_eq!(game.genres.as_deref(), Some(&[1, 15][..]));
        let url = response
            .include
            .unwrap()
            .boxart
            .unwrap()
            .first_url(136, "boxart", Some("front"));
        assert_eq!(url.as_deref(), Some("https://cdn.example/original/boxart/front/136-1.jpg"));
    }

    #[test]
    fn parses_image_listing() {
        let text = r#"{"data": {
            "base_url": {"original": "https://cdn.example/original/"},
            "images": {"136": [{"type": "screenshot", "filename": "screenshots/136-1.jpg"}]}
        }}"#;
        let response: ImagesResponse = parse_json(text, "images").unwrap();
        assert_eq!(
            response.data.first_url(136, "screenshot", None).as_deref(),
            Some("https://cdn.example/original/screenshots/136-1.jpg")
        );
        assert!(response.data.first_url(1, "screenshot", None).is_none());
    }

    #[test]
    fn parses_name_tables() {
        let text = r#"{"data": {"genres": {"1": {"id": 1, "name": "Action"}, "15": {"id": 15, "name": "Adventure"}}}}"#;
        let response: NamesResponse = parse_json(text, "genres").unwrap();
        let count = response.data.values().map(HashMap::len).sum::<usize>();
        assert_eq!(count, 2);
    }

    #[test]
    fn missing_api_key_is_config_error() {
        assert!(matches!(
            TheGamesDb::new(&SourceSettings::default()),
            Err(SourceError::Config(_))
        ));
    }
}
