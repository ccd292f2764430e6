use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub const HEADER: &str = "--- The following is a list of skipped games ---";

/// List of files the run could not match, one line per miss.
///
/// The file is truncated when the run starts, so it only ever describes
/// the latest run for its platform and source.
pub struct MissLog {
    path: PathBuf,
    writer: BufWriter<File>,
    lines: usize,
}

impl MissLog {
    pub fn create(path: &Path) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "{HEADER}")?;
        writer.flush()?;
        Ok(Self {
            path: path.to_path_buf(),
            writer,
            lines: 0,
        })
    }

    /// Record a miss. `closest` is the best candidate title, if any.
    pub fn record(&mut self, base_name: &str, closest: Option<&str>) -> io::Result<()> {
        writeln!(self.writer, "{}", line(base_name, closest))?;
        self.writer.flush()?;
        self.lines += 1;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines == 0
    }
}

pub fn line(base_name: &str, closest: Option<&str>) -> String {
    match closest {
        Some(title) => format!("'{base_name}', Closest match was '{title}'"),
        None => format!("'{base_name}', No returned matches"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_both_kinds_of_miss() {
        assert_eq!(line("Axelay (USA)", None), "'Axelay (USA)', No returned matches");
        assert_eq!(
            line("Zelda", Some("Zelda II")),
            "'Zelda', Closest match was 'Zelda II'"
        );
    }

    #[test]
    fn truncates_previous_run() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skipped-snes-thegamesdb.txt");
        std::fs::write(&path, "old content\n").unwrap();

        let mut log = MissLog::create(&path).unwrap();
        log.record("A", None).unwrap();
        log.record("B", Some("Bee")).unwrap();
        assert_eq!(log.len(), 2);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            format!("{HEADER}\n'A', No returned matches\n'B', Closest match was 'Bee'\n")
        );
    }
}
