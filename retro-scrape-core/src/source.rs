/// Identifier of a metadata source, as used on the command line, in config
/// files, in cache provenance and in the priority table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceKind {
    /// TheGamesDB web API.
    TheGamesDb,
    /// ScreenScraper, queried by ROM file name.
    ScreenScraper,
    /// Arcade Database (adb.arcadeitalia.net), queried by MAME rom name.
    ArcadeDb,
    /// Resolves entries from the local cache only.
    LocalDb,
    /// Resolves entries from a user-supplied definitions file.
    Import,
}

const ALL_SOURCES: &[SourceKind] = &[
    SourceKind::TheGamesDb,
    SourceKind::ScreenScraper,
    SourceKind::ArcadeDb,
    SourceKind::LocalDb,
    SourceKind::Import,
];

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TheGamesDb => "thegamesdb",
            Self::ScreenScraper => "screenscraper",
            Self::ArcadeDb => "arcadedb",
            Self::LocalDb => "localdb",
            Self::Import => "import",
        }
    }

    /// Hard ceiling on concurrent workers imposed by the source's API terms.
    pub fn max_threads(&self) -> Option<usize> {
        match self {
            Self::ArcadeDb => Some(1),
            _ => None,
        }
    }

    /// Whether the source resolves files by direct lookup instead of
    /// search + candidate selection.
    pub fn is_direct(&self) -> bool {
        matches!(self, Self::LocalDb | Self::Import)
    }

    /// Whether a long run of misses from this source indicates the wrong
    /// source was picked for the platform.
    ///
    /// Direct sources are exempt: their misses mean the local data is
    /// genuinely absent.
    pub fn detects_mismatch(&self) -> bool {
        !self.is_direct()
    }

    pub fn all() -> &'static [SourceKind] {
        ALL_SOURCES
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string is not a known source name.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown scraping source: '{0}'")]
pub struct SourceParseError(pub String);

impl std::str::FromStr for SourceKind {
    type Err = SourceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "tgdb" => return Ok(Self::TheGamesDb),
            "ss" => return Ok(Self::ScreenScraper),
            _ => {}
        }
        ALL_SOURCES
            .iter()
            .find(|k| k.name() == lower)
            .copied()
            .ok_or_else(|| SourceParseError(s.to_string()))
    }
}
