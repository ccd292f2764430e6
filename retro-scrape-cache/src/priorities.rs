//! Source precedence used when two sources contribute the same field.
//!
//! Loaded from a human-edited `priorities.yaml`:
//!
//! ```yaml
//! default: [screenscraper, thegamesdb, arcadedb]
//! platforms:
//!   arcade: [arcadedb, screenscraper]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CacheError;

/// File name of the priority table inside the cache base directory.
pub const PRIORITIES_FILE: &str = "priorities.yaml";

/// Per-platform ordered lists of source names, highest priority first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriorityTable {
    /// Order applied to every platform after its own list.
    #[serde(default)]
    pub default: Vec<String>,
    #[serde(default)]
    pub platforms: BTreeMap<String, Vec<String>>,
}

impl PriorityTable {
    /// Load a table from `path`. A missing file yields an empty table.
    pub fn load(path: &Path) -> Result<Self, CacheError> {
        if !path.exists() {
            log::debug!("No priority table at {}, all sources rank equally", path.display());
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| CacheError::io(path, e))?;
        Self::parse(&contents).map_err(|source| CacheError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse(contents: &str) -> Result<Self, serde_yml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yml::from_str(contents)
    }

    /// Rank of `source` for `platform`; lower is stronger.
    ///
    /// The platform's own list comes first, then the default list. Sources
    /// listed in neither share the weakest rank.
    pub fn rank(&self, platform: &str, source: &str) -> usize {
        let own = self.platforms.get(platform).map(Vec::as_slice).unwrap_or(&[]);
        if let Some(pos) = own.iter().position(|s| s == source) {
            return pos;
        }
        match self.default.iter().position(|s| s == source) {
            Some(pos) => own.len() + pos,
            None => usize::MAX,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_empty() && self.platforms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
default: [screenscraper, thegamesdb]
platforms:
  arcade: [arcadedb]
";

    #[test]
    fn platform_list_beats_default_list() {
        let table = PriorityTable::parse(SAMPLE).unwrap();
        assert_eq!(table.rank("arcade", "arcadedb"), 0);
        assert_eq!(table.rank("arcade", "screenscraper"), 1);
        assert_eq!(table.rank("arcade", "thegamesdb"), 2);
        assert_eq!(table.rank("snes", "screenscraper"), 0);
        assert_eq!(table.rank("snes", "arcadedb"), usize::MAX);
    }

    #[test]
    fn unlisted_sources_rank_equally() {
        let table = PriorityTable::default();
        assert_eq!(table.rank("nes", "import"), table.rank("nes", "thegamesdb"));
    }

    #[test]
    fn empty_document_is_empty_table() {
        assert!(PriorityTable::parse("").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let table = PriorityTable::load(&dir.path().join(PRIORITIES_FILE)).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PRIORITIES_FILE);
        std::fs::write(&path, "default: {not: [a list").unwrap();
        assert!(matches!(
            PriorityTable::load(&path),
            Err(CacheError::Yaml { .. })
        ));
    }
}
