use super::*;

fn full_entry() -> GameEntry {
    let mut entry = GameEntry::new("/roms/snes/Super Metroid (USA).sfc");
    entry.title = Some("Super Metroid".into());
    entry.description = Some("Samus returns.".into());
    entry.release_date = Some("19940318".into());
    entry.developer = Some("Nintendo R&D1".into());
    entry.publisher = Some("Nintendo".into());
    entry.players = Some("1".into());
    entry.rating = Some(0.9);
    entry.tags = Some("Action, Platform".into());
    entry.cover = Some(vec![1, 2, 3]);
    entry.screenshot = Some(vec![4, 5]);
    entry
}

#[test]
fn new_derives_base_name() {
    let entry = GameEntry::new("/roms/snes/Super Metroid (USA).sfc");
    assert_eq!(entry.base_name, "Super Metroid (USA)");
    assert!(!entry.found);
    assert_eq!(entry.search_match, 0);
}

#[test]
fn identity_is_lowercased_base_name() {
    assert_eq!(
        identity_of(Path::new("/a/b/Super Metroid (USA).sfc")),
        "super metroid (usa)"
    );
}

#[test]
fn empty_entry_has_zero_completeness() {
    let entry = GameEntry::new("x.nes");
    assert_eq!(entry.completeness(false), 0.0);
    assert_eq!(entry.completeness(true), 0.0);
}

#[test]
fn video_only_counts_when_requested() {
    let entry = full_entry();
    assert_eq!(entry.completeness(false), 100.0);
    // video weight 2 out of 15
    let with_video = entry.completeness(true);
    assert!((with_video - 13.0 * 100.0 / 15.0).abs() < 1e-9);
}

#[test]
fn persisted_paths_count_as_media() {
    let mut entry = full_entry();
    entry.cover_path = Some(PathBuf::from("media/covers/x.png"));
    entry.strip_media();
    assert!(entry.cover.is_none());
    assert!(entry.screenshot.is_none());
    // cover still counts via its path, screenshot is gone
    let expected = 11.0 * 100.0 / 13.0;
    assert!((entry.completeness(false) - expected).abs() < 1e-9);
}

#[test]
fn blank_strings_do_not_count() {
    let mut entry = GameEntry::new("x.nes");
    entry.title = Some("   ".into());
    assert_eq!(entry.completeness(false), 0.0);
}

#[test]
fn field_accessors_round_trip_strings() {
    let mut entry = GameEntry::new("x.nes");
    entry.set_field(FieldKind::Rating, "0.75".into());
    assert_eq!(entry.rating, Some(0.75));
    assert_eq!(entry.field(FieldKind::Rating).as_deref(), Some("0.75"));

    entry.set_field(FieldKind::Cover, "media/covers/x.png".into());
    assert_eq!(entry.cover_path, Some(PathBuf::from("media/covers/x.png")));

    entry.set_field(FieldKind::Rating, "n/a".into());
    assert_eq!(entry.rating, None);
}

#[test]
fn stamp_source_keeps_existing_provenance() {
    let mut entry = full_entry();
    entry.sources.insert(FieldKind::Title, "import".into());
    entry.stamp_source("thegamesdb");
    assert_eq!(entry.sources[&FieldKind::Title], "import");
    assert_eq!(entry.sources[&FieldKind::Publisher], "thegamesdb");
    assert!(!entry.sources.contains_key(&FieldKind::Video));
}
