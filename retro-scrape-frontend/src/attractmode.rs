use std::fs;
use std::path::{Path, PathBuf};

use retro_scrape_core::GameEntry;

use crate::{Frontend, FrontendError, title_order, truncate_chars};

pub const DOCUMENT_NAME: &str = "romlist.txt";

const HEADER: &str = "#Name;Title;Emulator;CloneOf;Year;Manufacturer;Category;Players;Rotation;Control;Status;DisplayCount;DisplayType;AltRomname;AltTitle;Extra;Buttons";
const COLUMNS: usize = 17;

/// Attract-Mode romlist: one `;`-separated line per game.
///
/// Romlists carry no artwork paths; Attract-Mode finds artwork by rom
/// name in the emulator's artwork folders.
pub struct AttractMode {
    base_dir: PathBuf,
    /// Attract-Mode emulator the romlist belongs to. Falls back to each
    /// entry's platform name.
    emulator: Option<String>,
}

impl AttractMode {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            emulator: None,
        }
    }

    pub fn with_emulator(mut self, emulator: Option<String>) -> Self {
        self.emulator = emulator.filter(|e| !e.trim().is_empty());
        self
    }

    fn line(&self, entry: &GameEntry, max_length: usize) -> String {
        let year = entry
            .release_date
            .as_deref()
            .map(|d| d.chars().take(4).collect::<String>())
            .unwrap_or_default();
        let description = entry
            .description
            .as_deref()
            .map(|d| truncate_chars(d, max_length))
            .unwrap_or_default();

        let mut columns = vec![String::new(); COLUMNS];
        columns[0] = clean(&entry.base_name);
        columns[1] = clean(entry.display_title());
        let emulator = self.emulator.as_deref().or(entry.platform.as_deref());
        columns[2] = clean(emulator.unwrap_or_default());
        columns[4] = year;
        columns[5] = clean(entry.developer.as_deref().unwrap_or_default());
        columns[6] = clean(entry.tags.as_deref().unwrap_or_default());
        columns[7] = clean(entry.players.as_deref().unwrap_or_default());
        columns[11] = "1".to_string();
        columns[15] = clean(description);
        columns.join(";")
    }
}

/// Separators and line breaks would split the record.
fn clean(value: &str) -> String {
    value
        .replace(';', ",")
        .replace(['\r', '\n'], " ")
        .trim()
        .to_string()
}

impl Frontend for AttractMode {
    fn name(&self) -> &'static str {
        "Attract-Mode"
    }

    fn default_document_name(&self) -> &'static str {
        DOCUMENT_NAME
    }

    fn sort_entries(&self, entries: &mut [GameEntry]) {
        entries.sort_by(title_order);
    }

    fn assemble_document(
        &self,
        entries: &[GameEntry],
        max_length: usize,
    ) -> Result<Vec<u8>, FrontendError> {
        let mut out = String::from(HEADER);
        out.push('\n');
        for entry in entries {
            out.push_str(&self.line(entry, max_length));
            out.push('\n');
        }
        Ok(out.into_bytes())
    }

    fn read_existing(&self, path: &Path) -> Result<Vec<GameEntry>, FrontendError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(path)?;
        let mut entries = Vec::new();
        for line in contents.lines() {
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }
            let columns: Vec<&str> = line.split(';').collect();
            let Some(name) = columns.first().map(|n| n.trim()).filter(|n| !n.is_empty()) else {
                continue;
            };
            let column = |i: usize| {
                columns
                    .get(i)
                    .map(|v| v.trim())
                    .filter(|v| !v.is_empty())
                    .map(str::to_string)
            };

            // the rom name has no extension, so the base name is set directly
            let mut entry = GameEntry::new(self.base_dir.join(name));
            entry.base_name = name.to_string();
            entry.title = column(1);
            entry.platform = column(2);
            entry.release_date = column(4);
            entry.developer = column(5);
            entry.tags = column(6);
            entry.players = column(7);
            entry.description = column(15);
            entry.found = true;
            entry.search_match = 100;
            entries.push(entry);
        }
        Ok(entries)
    }
}
