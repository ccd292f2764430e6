use std::path::PathBuf;

use crate::error::CoreError;
use crate::platform::Platform;
use crate::source::SourceKind;

/// Upper bound on worker threads.
pub const MAX_THREADS: usize = 8;
/// Upper bound on the document field length.
pub const MAX_FIELD_LENGTH: usize = 10_000;

/// Fully resolved settings for one scrape run.
///
/// Built once (the CLI layers config file sections and flags on top of
/// [`ScrapeConfig::new`]) and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub platform: Platform,
    pub source: SourceKind,
    /// Folder holding the ROM files.
    pub input_dir: PathBuf,
    /// Requested worker count. Clamped by the orchestrator.
    pub threads: usize,
    /// Minimum candidate score (0-100) for a match.
    pub min_match: u8,
    /// Longest description written into the output document.
    pub max_length: usize,
    /// Keep bracket notes from the file name in the displayed title.
    pub keep_brackets: bool,
    /// Also write missed files into the output document.
    pub include_skipped: bool,
    pub include_video: bool,
    /// Dry run: scrape but write neither cache, media nor document.
    pub pretend: bool,
    pub local_cache: bool,
    /// Keep entries already present in the output document and skip their files.
    pub skip_existing: bool,
    /// Descend into subdirectories of `input_dir`.
    pub subdirs: bool,
    pub region: String,
    pub language: String,
    /// Root of all platform caches.
    pub cache_dir: PathBuf,
    pub media_dir: PathBuf,
    /// Frontend document (gamelist/romlist) to write.
    pub document_path: PathBuf,
    pub miss_log: PathBuf,
    /// Attract-Mode emulator name written into the romlist.
    pub emulator: Option<String>,
}

impl ScrapeConfig {
    /// Defaults for scraping `input_dir` as `platform` with the platform's default source.
    pub fn new(platform: Platform, input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        let source = platform.default_source();
        Self {
            platform,
            source,
            threads: 4,
            min_match: 65,
            max_length: 2500,
            keep_brackets: false,
            include_skipped: false,
            include_video: false,
            pretend: false,
            local_cache: true,
            skip_existing: false,
            subdirs: true,
            region: "us".to_string(),
            language: "en".to_string(),
            cache_dir: input_dir.join(".cache"),
            media_dir: input_dir.join("media"),
            document_path: input_dir.join("gamelist.xml"),
            miss_log: PathBuf::from(miss_log_name(platform, source)),
            emulator: None,
            input_dir,
        }
    }

    /// Switch source, keeping the miss log name in step.
    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self.miss_log = self
            .miss_log
            .with_file_name(miss_log_name(self.platform, source));
        self
    }

    /// Check ranges and option combinations that cannot be run.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.min_match > 100 {
            return Err(CoreError::config(format!(
                "minimum match must be 0-100, got {}",
                self.min_match
            )));
        }
        if self.max_length > MAX_FIELD_LENGTH {
            return Err(CoreError::config(format!(
                "max length must be 0-{MAX_FIELD_LENGTH}, got {}",
                self.max_length
            )));
        }
        if self.source == SourceKind::LocalDb && !self.local_cache {
            return Err(CoreError::config(
                "the localdb source needs the local cache, remove the option disabling it",
            ));
        }
        if !self.platform.supports(self.source) {
            return Err(CoreError::config(format!(
                "source '{}' does not support platform '{}'",
                self.source, self.platform
            )));
        }
        Ok(())
    }

    /// Cache folder of the configured platform.
    pub fn platform_cache_dir(&self) -> PathBuf {
        self.cache_dir.join(self.platform.short_name())
    }
}

/// File name of the miss log for a platform/source pair.
pub fn miss_log_name(platform: Platform, source: SourceKind) -> String {
    format!("skipped-{}-{}.txt", platform.short_name(), source.name())
}
