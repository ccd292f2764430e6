use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use retro_scrape_core::{FieldKind, GameEntry};

/// Subdirectory of the media folder for a media field.
pub fn media_subdir(kind: FieldKind) -> Option<&'static str> {
    match kind {
        FieldKind::Cover => Some("covers"),
        FieldKind::Screenshot => Some("screenshots"),
        FieldKind::Video => Some("videos"),
        _ => None,
    }
}

/// Image extension from the payload's magic bytes, `png` when unknown.
fn image_extension(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "jpg",
        [b'G', b'I', b'F', b'8', ..] => "gif",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "webp",
        _ => "png",
    }
}

/// Writes media payloads to `<root>/{covers,screenshots,videos}/<base name>.<ext>`.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist every payload of `entry` and record where it went.
    ///
    /// A payload that cannot be written is dropped with a warning, so the
    /// entry never points at a missing file.
    pub fn persist(&self, entry: &mut GameEntry) {
        let base = entry.base_name.clone();
        if let Some(bytes) = entry.cover.as_deref() {
            let ext = image_extension(bytes);
            entry.cover_path = self.write(FieldKind::Cover, &base, ext, bytes);
        }
        if let Some(bytes) = entry.screenshot.as_deref() {
            let ext = image_extension(bytes);
            entry.screenshot_path = self.write(FieldKind::Screenshot, &base, ext, bytes);
        }
        if let Some(bytes) = entry.video.as_deref() {
            let ext = entry.video_format.as_deref().unwrap_or("mp4");
            entry.video_path = self.write(FieldKind::Video, &base, ext, bytes);
        }
    }

    fn write(&self, kind: FieldKind, base: &str, ext: &str, bytes: &[u8]) -> Option<PathBuf> {
        let subdir = self.root.join(media_subdir(kind)?);
        let dest = subdir.join(format!("{base}.{ext}"));
        let result: io::Result<()> = fs::create_dir_all(&subdir).and_then(|_| fs::write(&dest, bytes));
        match result {
            Ok(()) => Some(dest),
            Err(e) => {
                log::warn!("Failed to write {}: {e}", dest.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_image_types() {
        assert_eq!(image_extension(&[0xFF, 0xD8, 0xFF, 0xE0]), "jpg");
        assert_eq!(image_extension(b"GIF89a"), "gif");
        assert_eq!(image_extension(b"RIFF\0\0\0\0WEBPVP8"), "webp");
        assert_eq!(image_extension(&[0x89, b'P', b'N', b'G']), "png");
        assert_eq!(image_extension(&[]), "png");
    }

    #[test]
    fn persists_payloads_under_media_subdirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());
        let mut entry = GameEntry::new("/roms/Axelay (USA).sfc");
        entry.cover = Some(vec![0xFF, 0xD8, 0xFF, 0xE0]);
        entry.video = Some(vec![1, 2, 3]);
        entry.video_format = Some("webm".to_string());

        store.persist(&mut entry);

        let cover = dir.path().join("covers/Axelay (USA).jpg");
        assert_eq!(entry.cover_path.as_deref(), Some(cover.as_path()));
        assert_eq!(fs::read(&cover).unwrap(), vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(
            entry.video_path.as_deref(),
            Some(dir.path().join("videos/Axelay (USA).webm").as_path())
        );
        assert!(entry.screenshot_path.is_none());
    }
}
