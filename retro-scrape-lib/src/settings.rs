//! Settings file (`~/.config/retro-scrape/config.toml`) and default locations.
//!
//! The file has a `[main]` section applying to every platform, one section
//! per platform short name overriding it, and `[screenscraper]` /
//! `[thegamesdb]` sections holding credentials:
//!
//! ```toml
//! [main]
//! threads = 4
//! frontend = "emulationstation"
//!
//! [snes]
//! source = "screenscraper"
//! min_match = 80
//!
//! [screenscraper]
//! user = "me"
//! password = "secret"
//! ```
//!
//! Command line flags are applied by the caller after the file sections.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use retro_scrape_core::{CoreError, Platform, ScrapeConfig, SourceKind};
use retro_scrape_sources::Credentials;

use crate::error::ScrapeError;

pub const CONFIG_FILE: &str = "config.toml";

/// `~/.config/retro-scrape`.
pub fn config_dir() -> PathBuf {
    let config = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    config.join("retro-scrape")
}

/// Canonical path to the settings file.
pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Default cache base: `<data dir>/retro-scrape/cache`.
pub fn default_cache_dir() -> PathBuf {
    let data = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    data.join("retro-scrape").join("cache")
}

/// One section of the settings file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SectionSettings {
    pub source: Option<String>,
    pub frontend: Option<String>,
    pub input_dir: Option<PathBuf>,
    pub threads: Option<usize>,
    pub min_match: Option<u8>,
    pub max_length: Option<usize>,
    pub region: Option<String>,
    pub language: Option<String>,
    pub include_video: Option<bool>,
    pub include_skipped: Option<bool>,
    pub keep_brackets: Option<bool>,
    pub skip_existing: Option<bool>,
    pub subdirs: Option<bool>,
    pub local_cache: Option<bool>,
    pub cache_dir: Option<PathBuf>,
    pub media_dir: Option<PathBuf>,
    pub document: Option<PathBuf>,
    pub emulator: Option<String>,
    pub pretend: Option<bool>,
}

impl SectionSettings {
    /// Keys set in `over` win over keys set here.
    pub fn overlay(self, over: SectionSettings) -> SectionSettings {
        SectionSettings {
            source: over.source.or(self.source),
            frontend: over.frontend.or(self.frontend),
            input_dir: over.input_dir.or(self.input_dir),
            threads: over.threads.or(self.threads),
            min_match: over.min_match.or(self.min_match),
            max_length: over.max_length.or(self.max_length),
            region: over.region.or(self.region),
            language: over.language.or(self.language),
            include_video: over.include_video.or(self.include_video),
            include_skipped: over.include_skipped.or(self.include_skipped),
            keep_brackets: over.keep_brackets.or(self.keep_brackets),
            skip_existing: over.skip_existing.or(self.skip_existing),
            subdirs: over.subdirs.or(self.subdirs),
            local_cache: over.local_cache.or(self.local_cache),
            cache_dir: over.cache_dir.or(self.cache_dir),
            media_dir: over.media_dir.or(self.media_dir),
            document: over.document.or(self.document),
            emulator: over.emulator.or(self.emulator),
            pretend: over.pretend.or(self.pretend),
        }
    }

    /// Write every key that is set into `config`.
    ///
    /// Paths are applied as given; the caller resolves defaults that
    /// depend on the input folder afterwards.
    pub fn apply(&self, config: &mut ScrapeConfig) -> Result<(), CoreError> {
        if let Some(ref source) = self.source {
            let kind: SourceKind = source.parse()?;
            *config = config.clone().with_source(kind);
        }
        if let Some(ref dir) = self.input_dir {
            config.input_dir = dir.clone();
        }
        if let Some(threads) = self.threads {
            config.threads = threads;
        }
        if let Some(min_match) = self.min_match {
            config.min_match = min_match;
        }
        if let Some(max_length) = self.max_length {
            config.max_length = max_length;
        }
        if let Some(ref region) = self.region {
            config.region = region.clone();
        }
        if let Some(ref language) = self.language {
            config.language = language.clone();
        }
        let flags = [
            (self.include_video, &mut config.include_video),
            (self.include_skipped, &mut config.include_skipped),
            (self.keep_brackets, &mut config.keep_brackets),
            (self.skip_existing, &mut config.skip_existing),
            (self.subdirs, &mut config.subdirs),
            (self.local_cache, &mut config.local_cache),
            (self.pretend, &mut config.pretend),
        ];
        for (value, slot) in flags {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(ref dir) = self.cache_dir {
            config.cache_dir = dir.clone();
        }
        if let Some(ref dir) = self.media_dir {
            config.media_dir = dir.clone();
        }
        if let Some(ref path) = self.document {
            config.document_path = path.clone();
        }
        if let Some(ref emulator) = self.emulator {
            config.emulator = Some(emulator.clone());
        }
        Ok(())
    }
}

/// Parsed settings file.
#[derive(Debug, Clone, Default)]
pub struct FileSettings {
    main: SectionSettings,
    platforms: BTreeMap<String, SectionSettings>,
    credentials: Credentials,
}

impl FileSettings {
    /// Load the settings file. A missing file yields empty settings.
    pub fn load(path: &Path) -> Result<Self, ScrapeError> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No settings file at {}", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };
        Self::parse(&contents).map_err(|message| ScrapeError::Settings {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, String> {
        let table: toml::Table = contents.parse().map_err(|e: toml::de::Error| e.to_string())?;
        let mut settings = Self::default();
        let mut tgdb = Credentials::default();

        for (name, value) in table {
            let context = |e: toml::de::Error| format!("[{name}]: {e}");
            match name.as_str() {
                "main" => settings.main = value.try_into().map_err(context)?,
                "screenscraper" => settings.credentials = value.try_into().map_err(context)?,
                "thegamesdb" => tgdb = value.try_into().map_err(context)?,
                other => {
                    let platform: Platform = other
                        .parse()
                        .map_err(|_| format!("unknown section [{other}]"))?;
                    let section = value.try_into().map_err(context)?;
                    settings.platforms.insert(platform.short_name().to_string(), section);
                }
            }
        }
        settings.credentials = settings.credentials.or(tgdb);
        Ok(settings)
    }

    /// `[main]` with the platform's own section on top.
    pub fn section(&self, platform: Platform) -> SectionSettings {
        let own = self
            .platforms
            .get(platform.short_name())
            .cloned()
            .unwrap_or_default();
        self.main.clone().overlay(own)
    }

    /// Configured credentials with environment overrides applied.
    pub fn credentials(&self) -> Credentials {
        self.credentials.clone().with_env()
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
