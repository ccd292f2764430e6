//! Bulk import of hand-written metadata.
//!
//! The definitions file is a CSV with a header row:
//!
//! ```text
//! filename,title,description,release_date,developer,publisher,players,rating,tags,cover,screenshot,video
//! Super Metroid (USA).sfc,Super Metroid,Samus returns.,19940418,Nintendo,Nintendo,1,0.9,Action,covers/sm.png,,
//! ```
//!
//! `filename` is matched against input files by base name, case-insensitively.
//! Media columns are paths relative to the definitions file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use retro_scrape_core::{GameEntry, identity_of};

use crate::error::SourceError;

#[derive(Debug, Clone, Default, Deserialize)]
struct Definition {
    filename: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    developer: Option<String>,
    #[serde(default)]
    publisher: Option<String>,
    #[serde(default)]
    players: Option<String>,
    #[serde(default)]
    rating: Option<f32>,
    #[serde(default)]
    tags: Option<String>,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    screenshot: Option<String>,
    #[serde(default)]
    video: Option<String>,
}

/// Import source backed by a definitions file loaded once at startup.
pub struct Import {
    base_dir: PathBuf,
    definitions: HashMap<String, Definition>,
}

impl Import {
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let contents = std::fs::read_to_string(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        let import = Self::parse(&contents, base_dir)?;
        log::info!(
            "Loaded {} import definitions from {}",
            import.definitions.len(),
            path.display()
        );
        Ok(import)
    }

    fn parse(contents: &str, base_dir: PathBuf) -> Result<Self, SourceError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(contents.as_bytes());

        let mut definitions = HashMap::new();
        for result in reader.deserialize::<Definition>() {
            let definition = match result {
                Ok(d) => d,
                Err(e) => {
                    log::warn!("Skipping malformed import row: {e}");
                    continue;
                }
            };
            if definition.filename.is_empty() {
                continue;
            }
            let identity = identity_of(Path::new(&definition.filename));
            definitions.insert(identity, definition);
        }
        Ok(Self {
            base_dir,
            definitions,
        })
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Entry for `path` if the definitions mention it.
    ///
    /// Unreadable media files are skipped with a warning; the metadata is
    /// still returned.
    pub fn lookup(&self, path: &Path) -> Result<Option<GameEntry>, SourceError> {
        let Some(def) = self.definitions.get(&identity_of(path)) else {
            return Ok(None);
        };
        let non_empty = |v: &Option<String>| v.clone().filter(|s| !s.is_empty());

        let mut entry = GameEntry::new(path);
        entry.title = non_empty(&def.title);
        entry.description = non_empty(&def.description);
        entry.release_date = non_empty(&def.release_date);
        entry.developer = non_empty(&def.developer);
        entry.publisher = non_empty(&def.publisher);
        entry.players = non_empty(&def.players);
        entry.rating = def.rating.map(|r| r.clamp(0.0, 1.0));
        entry.tags = non_empty(&def.tags);
        entry.cover = self.read_media(&def.cover);
        entry.screenshot = self.read_media(&def.screenshot);
        entry.video = self.read_media(&def.video);
        if entry.video.is_some() {
            entry.video_format = def
                .video
                .as_deref()
                .and_then(|v| Path::new(v).extension())
                .map(|ext| ext.to_string_lossy().to_lowercase());
        }
        entry.found = true;
        entry.search_match = 100;
        Ok(Some(entry))
    }

    fn read_media(&self, relative: &Option<String>) -> Option<Vec<u8>> {
        let relative = relative.as_deref().filter(|r| !r.is_empty())?;
        let path = self.base_dir.join(relative);
        std::fs::read(&path)
            .map_err(|e| log::warn!("Cannot read import media {}: {e}", path.display()))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFS: &str = "\
filename,title,description,release_date,developer,publisher,players,rating,tags,cover,screenshot,video
Super Metroid (USA).sfc,Super Metroid,Samus returns.,19940418,Nintendo R&D1,Nintendo,1,0.9,Action,covers/sm.png,,
Broken Row
,No File Name,,,,,,,,,,
Zelda.sfc, Zelda ,,,,,,,,,,
";

    #[test]
    fn parses_rows_and_skips_bad_ones() {
        let import = Import::parse(DEFS, PathBuf::new()).unwrap();
        assert_eq!(import.len(), 2);
    }

    #[test]
    fn lookup_is_case_insensitive_on_base_name() {
        let import = Import::parse(DEFS, PathBuf::new()).unwrap();
        let entry = import
            .lookup(Path::new("/roms/SUPER METROID (USA).zip"))
            .unwrap()
            .unwrap();
        assert!(entry.found);
        assert_eq!(entry.title.as_deref(), Some("Super Metroid"));
        assert_eq!(entry.rating, Some(0.9));
        assert!(import.lookup(Path::new("/roms/Other.sfc")).unwrap().is_none());
    }

    #[test]
    fn values_are_trimmed() {
        let import = Import::parse(DEFS, PathBuf::new()).unwrap();
        let entry = import.lookup(Path::new("Zelda.sfc")).unwrap().unwrap();
        assert_eq!(entry.title.as_deref(), Some("Zelda"));
        assert!(entry.description.is_none());
    }

    #[test]
    fn media_is_read_relative_to_definitions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("covers")).unwrap();
        std::fs::write(dir.path().join("covers/sm.png"), [0x89, b'P', b'N', b'G']).unwrap();
        let defs = dir.path().join("definitions.csv");
        std::fs::write(&defs, DEFS).unwrap();

        let import = Import::load(&defs).unwrap();
        let entry = import
            .lookup(Path::new("Super Metroid (USA).sfc"))
            .unwrap()
            .unwrap();
        assert_eq!(entry.cover.as_deref(), Some(&[0x89, b'P', b'N', b'G'][..]));
        assert!(entry.screenshot.is_none());
    }
}
