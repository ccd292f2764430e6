use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use retro_scrape_core::GameEntry;

use crate::{
    Frontend, FrontendError, display_path, resolve_path, title_order, truncate_chars,
};

pub const DOCUMENT_NAME: &str = "gamelist.xml";

/// EmulationStation `gamelist.xml`.
pub struct EmulationStation {
    base_dir: PathBuf,
}

impl EmulationStation {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn write_game(&self, xml: &mut String, entry: &GameEntry, max_length: usize) {
        xml.push_str("  <game>\n");
        write_tag(xml, "path", &display_path(&entry.path, &self.base_dir));
        write_tag(xml, "name", entry.display_title());

        if let Some(ref desc) = entry.description {
            write_tag(xml, "desc", truncate_chars(desc, max_length));
        }
        for (tag, media) in [
            ("image", &entry.cover_path),
            ("thumbnail", &entry.screenshot_path),
            ("video", &entry.video_path),
        ] {
            if let Some(path) = media {
                write_tag(xml, tag, &display_path(path, &self.base_dir));
            }
        }
        if let Some(rating) = entry.rating {
            write_tag(xml, "rating", &format!("{:.1}", rating));
        }
        if let Some(ref date) = entry.release_date {
            write_tag(xml, "releasedate", &format_es_date(date));
        }
        if let Some(ref dev) = entry.developer {
            write_tag(xml, "developer", dev);
        }
        if let Some(ref publisher) = entry.publisher {
            write_tag(xml, "publisher", publisher);
        }
        if let Some(ref genre) = entry.tags {
            write_tag(xml, "genre", genre);
        }
        if let Some(ref players) = entry.players {
            write_tag(xml, "players", players);
        }
        xml.push_str("  </game>\n");
    }

    fn entry_from_tags(&self, tags: &HashMap<String, String>) -> Option<GameEntry> {
        let path = tags.get("path").filter(|p| !p.is_empty())?;
        let mut entry = GameEntry::new(resolve_path(path, &self.base_dir));
        let text = |name: &str| tags.get(name).filter(|v| !v.is_empty()).cloned();
        let media = |name: &str| text(name).map(|v| resolve_path(&v, &self.base_dir));

        entry.title = text("name");
        entry.description = text("desc");
        entry.cover_path = media("image");
        entry.screenshot_path = media("thumbnail");
        entry.video_path = media("video");
        entry.rating = text("rating").and_then(|r| r.parse().ok());
        entry.release_date = text("releasedate").map(|d| match d.split_once('T') {
            Some((date, _)) => date.to_string(),
            None => d,
        });
        entry.developer = text("developer");
        entry.publisher = text("publisher");
        entry.tags = text("genre");
        entry.players = text("players");
        entry.found = true;
        entry.search_match = 100;
        Some(entry)
    }
}

impl Frontend for EmulationStation {
    fn name(&self) -> &'static str {
        "EmulationStation"
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
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\"?>\n");
        xml.push_str("<gameList>\n");
        for entry in entries {
            self.write_game(&mut xml, entry, max_length);
        }
        xml.push_str("</gameList>\n");
        Ok(xml.into_bytes())
    }

    fn read_existing(&self, path: &Path) -> Result<Vec<GameEntry>, FrontendError> {
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(path)?;
        let mut xml = Reader::from_str(&contents);
        xml.config_mut().trim_text(true);

        let mut entries = Vec::new();
        let mut current_tag = String::new();
        let mut current_game: Option<HashMap<String, String>> = None;
        let mut saw_root = false;

        loop {
            match xml.read_event()? {
                Event::Start(ref e) => {
                    let tag_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                    match tag_name.as_str() {
                        "gameList" => saw_root = true,
                        "game" => current_game = Some(HashMap::new()),
                        _ => current_tag = tag_name,
                    }
                }
                Event::Text(ref e) => {
                    if let Some(ref mut game) = current_game {
                        if !current_tag.is_empty() {
                            game.insert(current_tag.clone(), e.unescape()?.to_string());
                        }
                    }
                }
                Event::End(ref e) => {
                    if e.name().as_ref() == b"game" {
                        if let Some(tags) = current_game.take() {
                            match self.entry_from_tags(&tags) {
                                Some(entry) => entries.push(entry),
                                None => log::debug!("Ignoring gamelist entry without a path"),
                            }
                        }
                    }
                    current_tag.clear();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !saw_root {
            return Err(FrontendError::invalid_document(format!(
                "{} has no <gameList> element",
                path.display()
            )));
        }
        Ok(entries)
    }
}

fn write_tag(xml: &mut String, tag: &str, value: &str) {
    xml.push_str("    <");
    xml.push_str(tag);
    xml.push('>');
    xml.push_str(&escape_xml(value));
    xml.push_str("</");
    xml.push_str(tag);
    xml.push_str(">\n");
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// `YYYYMMDD`, `YYYY-MM-DD` or a bare year to `YYYYMMDDT000000`.
fn format_es_date(date: &str) -> String {
    let digits: String = date.chars().filter(char::is_ascii_digit).take(8).collect();
    let padded = match digits.len() {
        4 => format!("{digits}0101"),
        6 => format!("{digits}01"),
        _ => digits,
    };
    format!("{padded}T000000")
}

#[cfg(test)]
#[path = "tests/emulationstation_tests.rs"]
mod tests;
