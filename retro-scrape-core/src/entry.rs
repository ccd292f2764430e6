use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A metadata or media field that can be scraped, cached and attributed to a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Title,
    Description,
    ReleaseDate,
    Developer,
    Publisher,
    Players,
    Rating,
    Tags,
    Region,
    Language,
    Cover,
    Screenshot,
    Video,
}

impl FieldKind {
    pub const ALL: &'static [FieldKind] = &[
        FieldKind::Title,
        FieldKind::Description,
        FieldKind::ReleaseDate,
        FieldKind::Developer,
        FieldKind::Publisher,
        FieldKind::Players,
        FieldKind::Rating,
        FieldKind::Tags,
        FieldKind::Region,
        FieldKind::Language,
        FieldKind::Cover,
        FieldKind::Screenshot,
        FieldKind::Video,
    ];

    /// Weight of this field in [`GameEntry::completeness`]. Zero means the
    /// field is not part of the checklist.
    fn weight(&self) -> u32 {
        match self {
            Self::Description | Self::Cover | Self::Screenshot | Self::Video => 2,
            Self::Region | Self::Language => 0,
            _ => 1,
        }
    }

    pub fn is_media(&self) -> bool {
        matches!(self, Self::Cover | Self::Screenshot | Self::Video)
    }
}

/// A possible match returned by a source's search, before the full record is fetched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Candidate {
    pub title: String,
    /// Source-specific key used to fetch the full record (game id, rom name).
    pub reference: String,
    /// Platform name as reported by the source, if it reports one.
    pub platform: Option<String>,
    pub release_date: Option<String>,
    /// Other names the candidate is known by (e.g. a MAME rom name).
    /// Scored alongside `title`; the best of them counts.
    pub alt_titles: Vec<String>,
}

impl Candidate {
    pub fn new(title: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            reference: reference.into(),
            ..Default::default()
        }
    }
}

/// Everything known about one input file after scraping.
#[derive(Debug, Clone, Default)]
pub struct GameEntry {
    pub path: PathBuf,
    /// File name without directory or extension.
    pub base_name: String,

    pub found: bool,
    /// Similarity of the chosen (or closest) candidate to the search title, 0-100.
    pub search_match: u8,

    pub title: Option<String>,
    pub description: Option<String>,
    /// Release date as `YYYYMMDD`, `YYYYMM` or `YYYY`.
    pub release_date: Option<String>,
    pub developer: Option<String>,
    pub publisher: Option<String>,
    pub players: Option<String>,
    /// Normalized rating in `0.0..=1.0`.
    pub rating: Option<f32>,
    /// Comma-separated genres.
    pub tags: Option<String>,
    pub platform: Option<String>,
    pub region: Option<String>,
    pub language: Option<String>,

    pub cover: Option<Vec<u8>>,
    pub screenshot: Option<Vec<u8>>,
    pub video: Option<Vec<u8>>,
    /// File extension for `video`, e.g. `mp4`.
    pub video_format: Option<String>,

    pub cover_path: Option<PathBuf>,
    pub screenshot_path: Option<PathBuf>,
    pub video_path: Option<PathBuf>,

    /// Source name that contributed each field.
    pub sources: BTreeMap<FieldKind, String>,
}

impl GameEntry {
    /// Create an empty entry for `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let base_name = base_name_of(&path);
        Self {
            path,
            base_name,
            ..Default::default()
        }
    }

    /// Field value in its cached string form.
    ///
    /// Media fields yield the persisted path, not the payload.
    pub fn field(&self, kind: FieldKind) -> Option<String> {
        let path_str = |p: &Option<PathBuf>| p.as_ref().map(|p| p.to_string_lossy().into_owned());
        match kind {
            FieldKind::Title => self.title.clone(),
            FieldKind::Description => self.description.clone(),
            FieldKind::ReleaseDate => self.release_date.clone(),
            FieldKind::Developer => self.developer.clone(),
            FieldKind::Publisher => self.publisher.clone(),
            FieldKind::Players => self.players.clone(),
            FieldKind::Rating => self.rating.map(|r| format!("{r:.2}")),
            FieldKind::Tags => self.tags.clone(),
            FieldKind::Region => self.region.clone(),
            FieldKind::Language => self.language.clone(),
            FieldKind::Cover => path_str(&self.cover_path),
            FieldKind::Screenshot => path_str(&self.screenshot_path),
            FieldKind::Video => path_str(&self.video_path),
        }
    }

    /// Set a field from its cached string form. Unparseable ratings are ignored.
    pub fn set_field(&mut self, kind: FieldKind, value: String) {
        match kind {
            FieldKind::Title => self.title = Some(value),
            FieldKind::Description => self.description = Some(value),
            FieldKind::ReleaseDate => self.release_date = Some(value),
            FieldKind::Developer => self.developer = Some(value),
            FieldKind::Publisher => self.publisher = Some(value),
            FieldKind::Players => self.players = Some(value),
            FieldKind::Rating => self.rating = value.trim().parse().ok(),
            FieldKind::Tags => self.tags = Some(value),
            FieldKind::Region => self.region = Some(value),
            FieldKind::Language => self.language = Some(value),
            FieldKind::Cover => self.cover_path = Some(PathBuf::from(value)),
            FieldKind::Screenshot => self.screenshot_path = Some(PathBuf::from(value)),
            FieldKind::Video => self.video_path = Some(PathBuf::from(value)),
        }
    }

    fn has(&self, kind: FieldKind) -> bool {
        let non_empty = |s: &Option<String>| s.as_deref().is_some_and(|s| !s.trim().is_empty());
        match kind {
            FieldKind::Cover => self.cover.is_some() || self.cover_path.is_some(),
            FieldKind::Screenshot => self.screenshot.is_some() || self.screenshot_path.is_some(),
            FieldKind::Video => self.video.is_some() || self.video_path.is_some(),
            FieldKind::Rating => self.rating.is_some(),
            other => non_empty(&self.field(other)),
        }
    }

    /// Percentage (0-100) of the weighted field checklist that is present.
    ///
    /// Video only counts towards the checklist when `include_video` is set.
    pub fn completeness(&self, include_video: bool) -> f64 {
        let mut total = 0;
        let mut present = 0;
        for &kind in FieldKind::ALL {
            if kind == FieldKind::Video && !include_video {
                continue;
            }
            let weight = kind.weight();
            total += weight;
            if self.has(kind) {
                present += weight;
            }
        }
        if total == 0 {
            return 0.0;
        }
        f64::from(present) * 100.0 / f64::from(total)
    }

    /// Drop media payloads, keeping any persisted paths.
    pub fn strip_media(&mut self) {
        self.cover = None;
        self.screenshot = None;
        self.video = None;
    }

    /// Attribute every present field without provenance to `source`.
    pub fn stamp_source(&mut self, source: &str) {
        for &kind in FieldKind::ALL {
            if self.has(kind) && !self.sources.contains_key(&kind) {
                self.sources.insert(kind, source.to_string());
            }
        }
    }

    /// Display title: the scraped title if present, otherwise the base name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.base_name)
    }
}

/// File name without directory or extension.
pub fn base_name_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Normalized identity used to key cached records: the lowercased base name.
pub fn identity_of(path: &Path) -> String {
    base_name_of(path).trim().to_lowercase()
}

#[cfg(test)]
#[path = "tests/entry_tests.rs"]
mod tests;
