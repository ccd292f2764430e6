use std::path::{Path, PathBuf};

use retro_scrape_cache::CacheSnapshot;
use retro_scrape_core::{Candidate, GameEntry, Platform, SourceKind};

use crate::arcadedb::ArcadeDb;
use crate::credentials::Credentials;
use crate::error::SourceError;
use crate::import::Import;
use crate::localdb::LocalDb;
use crate::screenscraper::ScreenScraper;
use crate::thegamesdb::TheGamesDb;

/// What a worker asks a searching source for.
#[derive(Debug, Clone, Copy)]
pub struct Query<'a> {
    /// Normalized title to search for.
    pub title: &'a str,
    /// The input file, for sources that search by file name.
    pub path: &'a Path,
}

impl Query<'_> {
    /// File name including its extension.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// File name without extension.
    pub fn base_name(&self) -> String {
        retro_scrape_core::base_name_of(self.path)
    }
}

/// Everything needed to construct a source.
#[derive(Debug, Clone, Default)]
pub struct SourceSettings {
    pub region: String,
    pub language: String,
    pub include_video: bool,
    pub credentials: Credentials,
    /// Cache snapshot for the cache-only source.
    pub cache: Option<CacheSnapshot>,
    /// Definitions file for the import source.
    pub import_file: Option<PathBuf>,
    /// API root replacing a searching source's public one, e.g. a mirror.
    pub api_base: Option<String>,
}

impl SourceSettings {
    /// The configured API root, or `default`.
    pub fn endpoint(&self, default: &str) -> String {
        self.api_base
            .as_deref()
            .map(|base| base.trim_end_matches('/'))
            .filter(|base| !base.is_empty())
            .unwrap_or(default)
            .to_string()
    }
}

/// The metadata source selected for a run.
///
/// Chosen once at startup; every call dispatches with a single match.
pub enum Source {
    TheGamesDb(TheGamesDb),
    ScreenScraper(ScreenScraper),
    ArcadeDb(ArcadeDb),
    LocalDb(LocalDb),
    Import(Import),
}

impl Source {
    pub fn build(kind: SourceKind, settings: SourceSettings) -> Result<Self, SourceError> {
        let source = match kind {
            SourceKind::TheGamesDb => Self::TheGamesDb(TheGamesDb::new(&settings)?),
            SourceKind::ScreenScraper => Self::ScreenScraper(ScreenScraper::new(&settings)?),
            SourceKind::ArcadeDb => Self::ArcadeDb(ArcadeDb::new(&settings)?),
            SourceKind::LocalDb => {
                let snapshot = settings
                    .cache
                    .ok_or_else(|| SourceError::config("the localdb source needs the local cache"))?;
                Self::LocalDb(LocalDb::new(snapshot))
            }
            SourceKind::Import => {
                let file = settings
                    .import_file
                    .ok_or_else(|| SourceError::config("the import source needs a definitions file"))?;
                Self::Import(Import::load(&file)?)
            }
        };
        Ok(source)
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::TheGamesDb(_) => SourceKind::TheGamesDb,
            Self::ScreenScraper(_) => SourceKind::ScreenScraper,
            Self::ArcadeDb(_) => SourceKind::ArcadeDb,
            Self::LocalDb(_) => SourceKind::LocalDb,
            Self::Import(_) => SourceKind::Import,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Candidate matches for `query`, best guess first. Direct sources return none.
    pub async fn search(
        &self,
        query: &Query<'_>,
        platform: Platform,
    ) -> Result<Vec<Candidate>, SourceError> {
        match self {
            Self::TheGamesDb(s) => s.search(query, platform).await,
            Self::ScreenScraper(s) => s.search(query, platform).await,
            Self::ArcadeDb(s) => s.search(query).await,
            Self::LocalDb(_) | Self::Import(_) => Ok(Vec::new()),
        }
    }

    /// Full record for a selected candidate, media payloads included.
    pub async fn fetch(
        &self,
        candidate: &Candidate,
        platform: Platform,
    ) -> Result<GameEntry, SourceError> {
        let mut entry = match self {
            Self::TheGamesDb(s) => s.fetch(candidate).await?,
            Self::ScreenScraper(s) => s.fetch(candidate, platform).await?,
            Self::ArcadeDb(s) => s.fetch(candidate).await?,
            Self::LocalDb(_) | Self::Import(_) => return Err(SourceError::NotFound),
        };
        entry.platform = Some(platform.short_name().to_string());
        entry.stamp_source(self.name());
        Ok(entry)
    }

    /// Drop anything kept from `search` for `candidates`. Called once a
    /// file is done with its candidate list.
    pub fn discard(&self, candidates: &[Candidate]) {
        match self {
            Self::ScreenScraper(s) => s.discard(candidates),
            Self::ArcadeDb(s) => s.discard(candidates),
            Self::TheGamesDb(_) | Self::LocalDb(_) | Self::Import(_) => {}
        }
    }

    /// Resolve a file directly, without search and candidate selection.
    ///
    /// Only the cache-only and import sources resolve this way; the others
    /// always return `None`.
    pub fn lookup(&self, path: &Path) -> Result<Option<GameEntry>, SourceError> {
        match self {
            Self::LocalDb(s) => Ok(s.lookup(path)),
            Self::Import(s) => {
                let entry = s.lookup(path)?.map(|mut entry| {
                    entry.stamp_source(self.name());
                    entry
                });
                Ok(entry)
            }
            _ => Ok(None),
        }
    }
}
