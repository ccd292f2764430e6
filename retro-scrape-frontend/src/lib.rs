pub mod attractmode;
pub mod emulationstation;
pub mod error;

pub use attractmode::AttractMode;
pub use emulationstation::EmulationStation;
pub use error::FrontendError;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use retro_scrape_core::{GameEntry, ScrapeConfig};

/// A game-launching frontend the scraped catalog is written for.
pub trait Frontend: Send + Sync {
    fn name(&self) -> &'static str;

    /// File name of the document when none is configured.
    fn default_document_name(&self) -> &'static str;

    /// Order entries the way the frontend lists them.
    fn sort_entries(&self, entries: &mut [GameEntry]);

    /// Serialize `entries` into the frontend's document format.
    ///
    /// Descriptions longer than `max_length` characters are cut.
    fn assemble_document(
        &self,
        entries: &[GameEntry],
        max_length: usize,
    ) -> Result<Vec<u8>, FrontendError>;

    /// Entries already present in an existing document. A missing
    /// document yields no entries.
    fn read_existing(&self, path: &Path) -> Result<Vec<GameEntry>, FrontendError>;
}

/// Frontend selected by name at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FrontendKind {
    #[default]
    EmulationStation,
    AttractMode,
}

impl FrontendKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EmulationStation => "emulationstation",
            Self::AttractMode => "attractmode",
        }
    }

    /// Build the frontend for a run. Media and rom paths under the input
    /// folder are written relative to it.
    pub fn build(self, config: &ScrapeConfig) -> Box<dyn Frontend> {
        let base_dir = config.input_dir.clone();
        match self {
            Self::EmulationStation => Box::new(EmulationStation::new(base_dir)),
            Self::AttractMode => {
                Box::new(AttractMode::new(base_dir).with_emulator(config.emulator.clone()))
            }
        }
    }

    pub fn default_document_name(&self) -> &'static str {
        match self {
            Self::EmulationStation => emulationstation::DOCUMENT_NAME,
            Self::AttractMode => attractmode::DOCUMENT_NAME,
        }
    }
}

impl fmt::Display for FrontendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FrontendKind {
    type Err = FrontendError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "emulationstation" | "es" => Ok(Self::EmulationStation),
            "attractmode" | "am" => Ok(Self::AttractMode),
            other => Err(FrontendError::Unknown(other.to_string())),
        }
    }
}

/// Cut `text` to at most `max_length` characters.
pub(crate) fn truncate_chars(text: &str, max_length: usize) -> &str {
    match text.char_indices().nth(max_length) {
        Some((end, _)) => text[..end].trim_end(),
        None => text,
    }
}

/// `path` relative to `base` as `./rel`, or unchanged when outside it.
pub(crate) fn display_path(path: &Path, base: &Path) -> String {
    match path.strip_prefix(base) {
        Ok(rel) => format!("./{}", rel.display()),
        Err(_) => path.display().to_string(),
    }
}

/// Inverse of [`display_path`].
pub(crate) fn resolve_path(value: &str, base: &Path) -> PathBuf {
    match value.strip_prefix("./") {
        Some(rel) => base.join(rel),
        None => {
            let path = PathBuf::from(value);
            if path.is_absolute() { path } else { base.join(path) }
        }
    }
}

/// Case-insensitive title order, ties broken by file name.
pub(crate) fn title_order(a: &GameEntry, b: &GameEntry) -> std::cmp::Ordering {
    a.display_title()
        .to_lowercase()
        .cmp(&b.display_title().to_lowercase())
        .then_with(|| a.base_name.cmp(&b.base_name))
}
