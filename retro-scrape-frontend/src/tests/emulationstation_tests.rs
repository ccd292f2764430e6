use super::*;
use std::path::PathBuf;

fn make_entry(base_dir: &Path, file: &str, title: Option<&str>) -> GameEntry {
    let mut entry = GameEntry::new(base_dir.join(file));
    entry.title = title.map(str::to_string);
    entry.found = true;
    entry
}

#[test]
fn test_format_es_date() {
    assert_eq!(format_es_date("1996-06-23"), "19960623T000000");
    assert_eq!(format_es_date("19960623"), "19960623T000000");
    assert_eq!(format_es_date("1996"), "19960101T000000");
}

#[test]
fn test_escape_xml() {
    assert_eq!(escape_xml("Tom & Jerry"), "Tom &amp; Jerry");
    assert_eq!(escape_xml("a < b"), "a &lt; b");
}

#[test]
fn sorts_by_title_ignoring_case() {
    let base = Path::new("/roms/snes");
    let es = EmulationStation::new(base);
    let mut entries = vec![
        make_entry(base, "z.sfc", Some("zelda")),
        make_entry(base, "b.sfc", Some("Axelay")),
        make_entry(base, "m.sfc", None),
    ];
    es.sort_entries(&mut entries);
    let names: Vec<&str> = entries.iter().map(|e| e.display_title()).collect();
    assert_eq!(names, ["Axelay", "m", "zelda"]);
}

#[test]
fn assembles_relative_paths_and_truncates() {
    let base = Path::new("/roms/snes");
    let es = EmulationStation::new(base);
    let mut entry = make_entry(base, "Super Metroid (USA).sfc", Some("Super Metroid"));
    entry.description = Some("Samus & the baby metroid".to_string());
    entry.cover_path = Some(base.join("media/covers/Super Metroid (USA).png"));
    entry.rating = Some(0.9);
    entry.release_date = Some("19940418".to_string());

    let xml = String::from_utf8(es.assemble_document(&[entry], 7).unwrap()).unwrap();
    assert!(xml.starts_with("<?xml version=\"1.0\"?>\n<gameList>\n"));
    assert!(xml.contains("<path>./Super Metroid (USA).sfc</path>"));
    assert!(xml.contains("<desc>Samus &amp;</desc>"));
    assert!(xml.contains("<image>./media/covers/Super Metroid (USA).png</image>"));
    assert!(xml.contains("<rating>0.9</rating>"));
    assert!(xml.contains("<releasedate>19940418T000000</releasedate>"));
    assert!(!xml.contains("<thumbnail>"));
}

#[test]
fn empty_document_is_still_valid() {
    let es = EmulationStation::new("/roms");
    let xml = String::from_utf8(es.assemble_document(&[], 100).unwrap()).unwrap();
    assert_eq!(xml, "<?xml version=\"1.0\"?>\n<gameList>\n</gameList>\n");
}

#[test]
fn reads_back_what_it_writes() {
    let dir = tempfile::tempdir().unwrap();
    let es = EmulationStation::new(dir.path());
    let mut entry = make_entry(dir.path(), "Axelay (USA).sfc", Some("Axelay <Konami>"));
    entry.developer = Some("Konami".to_string());
    entry.screenshot_path = Some(dir.path().join("media/screenshots/Axelay (USA).png"));
    entry.release_date = Some("19920911".to_string());

    let doc = dir.path().join(DOCUMENT_NAME);
    std::fs::write(&doc, es.assemble_document(&[entry], 2500).unwrap()).unwrap();

    let existing = es.read_existing(&doc).unwrap();
    assert_eq!(existing.len(), 1);
    let read = &existing[0];
    assert_eq!(read.path, dir.path().join("Axelay (USA).sfc"));
    assert_eq!(read.title.as_deref(), Some("Axelay <Konami>"));
    assert_eq!(read.developer.as_deref(), Some("Konami"));
    assert_eq!(read.release_date.as_deref(), Some("19920911"));
    assert_eq!(
        read.screenshot_path,
        Some(PathBuf::from(dir.path().join("media/screenshots/Axelay (USA).png")))
    );
    assert!(read.found);
}

#[test]
fn missing_document_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let es = EmulationStation::new(dir.path());
    assert!(es.read_existing(&dir.path().join(DOCUMENT_NAME)).unwrap().is_empty());
}

#[test]
fn document_without_root_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let doc = dir.path().join(DOCUMENT_NAME);
    std::fs::write(&doc, "<romList></romList>").unwrap();
    let es = EmulationStation::new(dir.path());
    assert!(matches!(
        es.read_existing(&doc),
        Err(FrontendError::InvalidDocument(_))
    ));
}
