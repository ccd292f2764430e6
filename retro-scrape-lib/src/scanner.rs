//! Input directory scanner.
//!
//! Collects the files to scrape: everything under the input folder with an
//! accepted extension, optionally descending into subdirectories. Hidden
//! entries and excluded folders (the media and cache folders when they
//! live inside the input) are skipped.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// What to collect from the input folder.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Lowercase extensions without the dot.
    pub extensions: HashSet<String>,
    pub subdirs: bool,
    /// Directories never descended into.
    pub exclude: Vec<PathBuf>,
}

impl ScanOptions {
    pub fn new(extensions: &[&str], subdirs: bool) -> Self {
        Self {
            extensions: extension_set(extensions),
            subdirs,
            exclude: Vec::new(),
        }
    }

    pub fn exclude(mut self, dir: impl Into<PathBuf>) -> Self {
        self.exclude.push(dir.into());
        self
    }
}

/// Build the extension set from a platform's extension list.
pub fn extension_set(extensions: &[&str]) -> HashSet<String> {
    extensions
        .iter()
        .map(|e| e.trim_start_matches("*.").trim_start_matches('.').to_lowercase())
        .collect()
}

/// Files under `folder` matching `options`, sorted by path.
pub fn scan_input(folder: &Path, options: &ScanOptions) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect(folder, options, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect(dir: &Path, options: &ScanOptions, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in std::fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let hidden = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with('.'));
        if hidden {
            continue;
        }
        if path.is_dir() {
            if options.subdirs && !options.exclude.iter().any(|ex| ex == &path) {
                // an unreadable subfolder should not sink the whole scan
                if let Err(e) = collect(&path, options, files) {
                    log::warn!("Skipping {}: {e}", path.display());
                }
            }
        } else if has_matching_extension(&path, &options.extensions) {
            files.push(path);
        }
    }
    Ok(())
}

/// Check if a path has an extension in the allowed set.
fn has_matching_extension(path: &Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.contains(&e.to_lowercase()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn layout() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("b.sfc"), b"").unwrap();
        fs::write(root.join("A.SMC"), b"").unwrap();
        fs::write(root.join("notes.txt"), b"").unwrap();
        fs::write(root.join(".hidden.sfc"), b"").unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::write(root.join("sub/c.zip"), b"").unwrap();
        fs::create_dir_all(root.join("media/covers")).unwrap();
        fs::write(root.join("media/covers/x.zip"), b"").unwrap();
        dir
    }

    #[test]
    fn filters_by_extension_case_insensitively() {
        let dir = layout();
        let options = ScanOptions::new(&["sfc", "smc"], false);
        let files = scan_input(dir.path(), &options).unwrap();
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_owned()).collect();
        assert_eq!(names, ["A.SMC", "b.sfc"]);
    }

    #[test]
    fn descends_into_subdirs_except_excluded() {
        let dir = layout();
        let options = ScanOptions::new(&["zip", "sfc"], true).exclude(dir.path().join("media"));
        let files = scan_input(dir.path(), &options).unwrap();
        assert_eq!(files, vec![dir.path().join("b.sfc"), dir.path().join("sub/c.zip")]);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let options = ScanOptions::new(&["zip"], true);
        assert!(scan_input(&dir.path().join("nope"), &options).is_err());
    }

    #[test]
    fn extension_set_accepts_globs() {
        let set = extension_set(&["*.ZIP", ".7z", "nes"]);
        assert!(set.contains("zip") && set.contains("7z") && set.contains("nes"));
    }
}
