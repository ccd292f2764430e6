use std::collections::HashMap;
use std::sync::Mutex;

use serde::Deserialize;
use tokio::time::Duration;

use retro_scrape_core::{Candidate, GameEntry, Platform};

use crate::error::SourceError;
use crate::http::{HttpTransport, parse_json};
use crate::source::{Query, SourceSettings};
use crate::systems::{preferred_ss_region, screenscraper_system_id};

const BASE_URL: &str = "https://api.screenscraper.fr/api2";
const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(1200);
const SOFT_NAME: &str = "retro-scrape";

const COVER_TYPES: &[&str] = &["box-2D", "box-texture"];
const SCREENSHOT_TYPES: &[&str] = &["ss", "sstitle"];
const VIDEO_TYPES: &[&str] = &["video-normalized", "video"];
/// Media fallbacks after the preferred region.
const MEDIA_REGIONS: &[&str] = &["us", "wor", "ss"];

#[derive(Debug, Deserialize)]
struct Envelope {
    response: Payload,
}

#[derive(Debug, Deserialize)]
struct Payload {
    jeu: Game,
}

/// A text tagged with the region or language it applies to.
#[derive(Debug, Clone, Deserialize)]
struct Tagged {
    #[serde(alias = "region", alias = "langue", default)]
    tag: String,
    text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Text {
    text: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Medium {
    #[serde(rename = "type")]
    kind: String,
    url: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    format: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Genre {
    #[serde(default)]
    noms: Vec<Tagged>,
}

/// The parts of a `jeuInfos.php` game this source reads.
#[derive(Debug, Clone, Deserialize)]
struct Game {
    id: String,
    #[serde(default)]
    notgame: Option<String>,
    #[serde(default)]
    noms: Vec<Tagged>,
    #[serde(default)]
    synopsis: Vec<Tagged>,
    #[serde(default)]
    dates: Vec<Tagged>,
    #[serde(default)]
    medias: Vec<Medium>,
    #[serde(default)]
    editeur: Option<Text>,
    #[serde(default)]
    developpeur: Option<Text>,
    #[serde(default)]
    joueurs: Option<Text>,
    #[serde(default)]
    note: Option<Text>,
    #[serde(default)]
    genres: Vec<Genre>,
}

/// First item whose tag equals one of `order`, earlier tags winning.
fn pick<'a, T: 'a>(
    items: impl Iterator<Item = &'a T> + Clone,
    tag: impl Fn(&T) -> &str,
    order: &[&str],
) -> Option<&'a T> {
    order
        .iter()
        .find_map(|want| items.clone().find(|item| tag(*item) == *want))
}

/// Text for `order`, or the first text at all when `any` is set.
fn pick_text<'a>(texts: &'a [Tagged], order: &[&str], any: bool) -> Option<&'a str> {
    pick(texts.iter(), |t| t.tag.as_str(), order)
        .or_else(|| if any { texts.first() } else { None })
        .map(|t| t.text.as_str())
}

impl Game {
    fn is_not_game(&self) -> bool {
        self.notgame.as_deref() == Some("true")
    }

    fn title(&self, region: &str) -> Option<&str> {
        pick_text(&self.noms, &[region, "ss"], true)
    }

    fn date(&self, region: &str) -> Option<&str> {
        pick_text(&self.dates, &[region], true)
    }

    fn synopsis(&self, language: &str) -> Option<&str> {
        pick_text(&self.synopsis, &[language, "en"], false)
    }

    /// Genre names in one language, comma separated.
    fn genres(&self, language: &str) -> Option<String> {
        [language, "en"].iter().find_map(|lang| {
            let names: Vec<&str> = self
                .genres
                .iter()
                .filter_map(|g| pick_text(&g.noms, &[*lang], false))
                .collect();
            (!names.is_empty()).then(|| names.join(", "))
        })
    }

    /// Rating scaled from ScreenScraper's 0-20 to 0-1.
    fn rating(&self) -> Option<f32> {
        let note = self.note.as_ref()?.text.parse::<f32>().ok()?;
        Some((note / 20.0).clamp(0.0, 1.0))
    }

    /// One medium of the first kind in `kinds` that has any. Media without
    /// a region (videos) fall through to the first of their kind.
    fn medium(&self, kinds: &[&str], region: &str) -> Option<&Medium> {
        let order: Vec<&str> = std::iter::once(region).chain(MEDIA_REGIONS.iter().copied()).collect();
        kinds.iter().find_map(|kind| {
            let of_kind = self.medias.iter().filter(move |m| m.kind == *kind);
            pick(of_kind.clone(), |m| m.region.as_str(), &order).or_else(|| of_kind.clone().next())
        })
    }
}

/// ScreenScraper source. Searches by ROM file name, which lets the server
/// recognise the exact dump instead of guessing from the title.
pub struct ScreenScraper {
    transport: HttpTransport,
    base_url: String,
    params: Vec<(&'static str, String)>,
    region: &'static str,
    language: String,
    include_video: bool,
    /// Games returned by `search`, kept until fetched or discarded.
    pending: Mutex<HashMap<String, Game>>,
}

impl ScreenScraper {
    pub fn new(settings: &SourceSettings) -> Result<Self, SourceError> {
        let creds = &settings.credentials;
        let dev_id = creds
            .dev_id
            .clone()
            .ok_or_else(|| SourceError::config("missing ScreenScraper dev id (SCREENSCRAPER_DEVID)"))?;
        let dev_password = creds.dev_password.clone().ok_or_else(|| {
            SourceError::config("missing ScreenScraper dev password (SCREENSCRAPER_DEVPASSWORD)")
        })?;

        let mut params = vec![
            ("devid", dev_id),
            ("devpassword", dev_password),
            ("softname", SOFT_NAME.to_string()),
            ("output", "json".to_string()),
        ];
        if let Some(user) = &creds.user {
            params.push(("ssid", user.clone()));
        }
        if let Some(password) = &creds.password {
            params.push(("sspassword", password.clone()));
        }

        Ok(Self {
            transport: HttpTransport::new("ScreenScraper", MIN_REQUEST_INTERVAL)?,
            base_url: settings.endpoint(BASE_URL),
            params,
            region: preferred_ss_region(&settings.region),
            language: settings.language.clone(),
            include_video: settings.include_video,
            pending: Mutex::new(HashMap::new()),
        })
    }

    async fn game_info(&self, extra: Vec<(&'static str, String)>) -> Result<Game, SourceError> {
        let mut params = self.params.clone();
        params.extend(extra);
        let text = self
            .transport
            .get_text(&format!("{}/jeuInfos.php", self.base_url), &params)
            .await?;
        parse_game(&text)
    }

    fn system_param(platform: Platform) -> Vec<(&'static str, String)> {
        screenscraper_system_id(platform)
            .map(|id| vec![("systemeid", id.to_string())])
            .unwrap_or_default()
    }

    pub async fn search(&self, query: &Query<'_>, platform: Platform) -> Result<Vec<Candidate>, SourceError> {
        let mut params = Self::system_param(platform);
        params.push(("romtype", "rom".to_string()));
        params.push(("romnom", query.file_name()));

        let game = match self.game_info(params).await {
            Ok(game) => game,
            Err(SourceError::NotFound) => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        if game.is_not_game() {
            log::debug!("ScreenScraper marks '{}' as not a game", query.base_name());
            return Ok(Vec::new());
        }
        let Some(title) = game.title(self.region) else {
            return Ok(Vec::new());
        };

        let mut candidate = Candidate::new(title, game.id.clone());
        candidate.release_date = game.date(self.region).map(str::to_string);
        // names in other regions count too
        candidate.alt_titles = game
            .noms
            .iter()
            .map(|n| n.text.clone())
            .filter(|n| n != title)
            .collect();

        if let Ok(mut pending) = self.pending.lock() {
            pending.insert(game.id.clone(), game);
        }
        Ok(vec![candidate])
    }

    /// Forget the games kept for `candidates`.
    pub fn discard(&self, candidates: &[Candidate]) {
        if let Ok(mut pending) = self.pending.lock() {
            for candidate in candidates {
                pending.remove(&candidate.reference);
            }
        }
    }

    pub async fn fetch(&self, candidate: &Candidate, platform: Platform) -> Result<GameEntry, SourceError> {
        let cached = self
            .pending
            .lock()
            .ok()
            .and_then(|mut pending| pending.remove(&candidate.reference));
        let game = match cached {
            Some(game) => game,
            None => {
                let mut params = Self::system_param(platform);
                params.push(("gameid", candidate.reference.clone()));
                self.game_info(params).await?
            }
        };

        let mut entry = GameEntry {
            title: game.title(self.region).map(str::to_string),
            description: game.synopsis(&self.language).map(str::to_string),
            release_date: game.date(self.region).map(compact_date),
            developer: game.developpeur.as_ref().map(|d| d.text.clone()),
            publisher: game.editeur.as_ref().map(|p| p.text.clone()),
            players: game.joueurs.as_ref().map(|p| p.text.clone()),
            rating: game.rating(),
            tags: game.genres(&self.language),
            region: Some(self.region.to_string()),
            language: Some(self.language.clone()),
            ..Default::default()
        };

        if let Some(media) = game.medium(COVER_TYPES, self.region) {
            entry.cover = self.download(&media.url).await;
        }
        if let Some(media) = game.medium(SCREENSHOT_TYPES, self.region) {
            entry.screenshot = self.download(&media.url).await;
        }
        if self.include_video {
            if let Some(media) = game.medium(VIDEO_TYPES, self.region) {
                entry.video = self.download(&media.url).await;
                if entry.video.is_some() {
                    entry.video_format = Some(if media.format.is_empty() {
                        "mp4".to_string()
                    } else {
                        media.format.clone()
                    });
                }
            }
        }
        Ok(entry)
    }

    /// Download media, treating a failure as missing media.
    async fn download(&self, url: &str) -> Option<Vec<u8>> {
        match self.transport.download(url).await {
            Ok(bytes) if !bytes.is_empty() => Some(bytes),
            Ok(_) => None,
            Err(e) => {
                log::warn!("ScreenScraper media download failed: {e}");
                None
            }
        }
    }
}

/// ScreenScraper answers 200 with plain text for most failures.
fn parse_game(text: &str) -> Result<Game, SourceError> {
    if text.is_empty() || text.contains("Erreur") || text.contains("Jeu non trouvé") {
        return Err(SourceError::NotFound);
    }
    if text.contains("API fermé") || text.contains("API closed") {
        return Err(SourceError::ServerClosed("ScreenScraper API is temporarily closed".into()));
    }
    if text.contains("Le quota de scrape journalier") {
        return Err(SourceError::RateLimit("ScreenScraper daily quota"));
    }
    let envelope: Envelope = parse_json(text, "game info")?;
    Ok(envelope.response.jeu)
}

/// `1994-03-18` -> `19940318`; partial dates keep the parts they have.
pub(crate) fn compact_date(date: &str) -> String {
    date.chars().filter(char::is_ascii_digit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "response": {
            "jeu": {
                "id": "1234",
                "noms": [
                    {"region": "ss", "text": "Super Metroid"},
                    {"region": "jp", "text": "Super Metroid (J)"}
                ],
                "synopsis": [{"langue": "en", "text": "Samus returns."}],
                "dates": [{"region": "us", "text": "1994-04-18"}],
                "medias": [
                    {"type": "box-2D", "url": "https://x/box-jp", "region": "jp", "format": "png"},
                    {"type": "box-2D", "url": "https://x/box-us", "region": "us", "format": "png"},
                    {"type": "video", "url": "https://x/video", "format": "mp4"}
                ],
                "editeur": {"id": "3", "text": "Nintendo"},
                "note": {"text": "18"},
                "genres": [{"noms": [{"langue": "en", "text": "Action"}, {"langue": "fr", "text": "Action FR"}]}]
            }
        }
    }"#;

    fn sample() -> Game {
        parse_game(SAMPLE).unwrap()
    }

    #[test]
    fn parses_game_info() {
        let game = sample();
        assert_eq!(game.title("us"), Some("Super Metroid"));
        assert_eq!(game.title("jp"), Some("Super Metroid (J)"));
        assert_eq!(game.date("eu"), Some("1994-04-18"));
        assert_eq!(game.synopsis("en"), Some("Samus returns."));
        assert_eq!(game.genres("fr").as_deref(), Some("Action FR"));
        assert_eq!(game.rating(), Some(0.9));
        assert!(!game.is_not_game());
    }

    #[test]
    fn text_falls_back_to_english_only() {
        let game = sample();
        assert_eq!(game.synopsis("de"), Some("Samus returns."));
        assert_eq!(game.genres("de").as_deref(), Some("Action"));

        let mut japanese_only = sample();
        japanese_only.synopsis = vec![Tagged {
            tag: "jp".to_string(),
            text: "...".to_string(),
        }];
        assert_eq!(japanese_only.synopsis("de"), None);
    }

    #[test]
    fn media_prefers_region_then_type_order() {
        let game = sample();
        assert_eq!(game.medium(COVER_TYPES, "jp").unwrap().url, "https://x/box-jp");
        assert_eq!(game.medium(COVER_TYPES, "eu").unwrap().url, "https://x/box-us");
        assert_eq!(game.medium(VIDEO_TYPES, "us").unwrap().url, "https://x/video");
        assert!(game.medium(SCREENSHOT_TYPES, "us").is_none());
    }

    #[test]
    fn plain_text_answers_map_to_errors() {
        assert!(matches!(parse_game("Erreur : Jeu non trouvé !"), Err(SourceError::NotFound)));
        assert!(matches!(parse_game("API closed for maintenance"), Err(SourceError::ServerClosed(_))));
    }

    #[test]
    fn discarded_candidates_are_not_kept() {
        let mut settings = SourceSettings::default();
        settings.credentials.dev_id = Some("dev".to_string());
        settings.credentials.dev_password = Some("secret".to_string());
        let ss = ScreenScraper::new(&settings).unwrap();

        let game = sample();
        let candidate = Candidate::new("Super Metroid", game.id.clone());
        ss.pending.lock().unwrap().insert(game.id.clone(), game);
        assert_eq!(ss.pending.lock().unwrap().len(), 1);

        ss.discard(&[candidate]);
        assert!(ss.pending.lock().unwrap().is_empty());
    }

    #[test]
    fn compacts_dates() {
        assert_eq!(compact_date("1994-04-18"), "19940418");
        assert_eq!(compact_date("1994"), "1994");
    }

    #[test]
    fn missing_dev_credentials_is_config_error() {
        let err = ScreenScraper::new(&SourceSettings::default()).err().unwrap();
        assert!(matches!(err, SourceError::Config(_)));
    }
}
