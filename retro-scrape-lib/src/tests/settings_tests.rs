use super::*;

const SAMPLE: &str = r#"
[main]
threads = 6
min_match = 70
include_video = true
cache_dir = "/data/cache"

[snes]
source = "screenscraper"
min_match = 85

[megadrive]
threads = 2

[screenscraper]
user = "me"
password = "secret"

[thegamesdb]
api_key = "abc"
"#;

#[test]
fn platform_section_overrides_main() {
    let settings = FileSettings::parse(SAMPLE).unwrap();
    let snes = settings.section(Platform::Snes);
    assert_eq!(snes.threads, Some(6));
    assert_eq!(snes.min_match, Some(85));
    assert_eq!(snes.source.as_deref(), Some("screenscraper"));

    let nes = settings.section(Platform::Nes);
    assert_eq!(nes.min_match, Some(70));
    assert_eq!(nes.source, None);
}

#[test]
fn platform_sections_accept_aliases() {
    let settings = FileSettings::parse("[\"sega mega drive\"]\nthreads = 3\n").unwrap();
    assert_eq!(settings.section(Platform::MegaDrive).threads, Some(3));
}

#[test]
fn credential_sections_are_combined() {
    let settings = FileSettings::parse(SAMPLE).unwrap();
    assert_eq!(settings.credentials.user.as_deref(), Some("me"));
    assert_eq!(settings.credentials.password.as_deref(), Some("secret"));
    assert_eq!(settings.credentials.api_key.as_deref(), Some("abc"));
}

#[test]
fn unknown_sections_and_keys_are_rejected() {
    let err = FileSettings::parse("[dreamcastle]\nthreads = 1\n").unwrap_err();
    assert!(err.contains("dreamcastle"));

    let err = FileSettings::parse("[main]\nthread = 1\n").unwrap_err();
    assert!(err.contains("[main]"));
}

#[test]
fn apply_writes_only_set_keys() {
    let settings = FileSettings::parse(SAMPLE).unwrap();
    let mut config = ScrapeConfig::new(Platform::Snes, "/roms/snes");
    settings.section(Platform::Snes).apply(&mut config).unwrap();

    assert_eq!(config.source, SourceKind::ScreenScraper);
    assert_eq!(config.threads, 6);
    assert_eq!(config.min_match, 85);
    assert!(config.include_video);
    assert!(!config.keep_brackets);
    assert_eq!(config.cache_dir, PathBuf::from("/data/cache"));
    assert_eq!(config.language, "en");
    assert_eq!(
        config.miss_log,
        PathBuf::from("skipped-snes-screenscraper.txt")
    );
}

#[test]
fn pretend_and_emulator_overlay_like_other_keys() {
    let settings = FileSettings::parse(
        "[main]\npretend = true\nemulator = \"retroarch\"\n\n[snes]\npretend = false\n",
    )
    .unwrap();

    let mut snes = ScrapeConfig::new(Platform::Snes, "/roms/snes");
    settings.section(Platform::Snes).apply(&mut snes).unwrap();
    assert!(!snes.pretend);
    assert_eq!(snes.emulator.as_deref(), Some("retroarch"));

    let mut nes = ScrapeConfig::new(Platform::Nes, "/roms/nes");
    settings.section(Platform::Nes).apply(&mut nes).unwrap();
    assert!(nes.pretend);
}

#[test]
fn apply_rejects_unknown_source() {
    let section = SectionSettings {
        source: Some("nowhere".to_string()),
        ..Default::default()
    };
    let mut config = ScrapeConfig::new(Platform::Snes, "/roms/snes");
    assert!(section.apply(&mut config).is_err());
}

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let settings = FileSettings::load(&dir.path().join("config.toml")).unwrap();
    assert_eq!(settings.section(Platform::Snes), SectionSettings::default());
}

#[test]
fn malformed_file_names_the_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[main\n").unwrap();
    match FileSettings::load(&path) {
        Err(ScrapeError::Settings { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected settings error, got {other:?}"),
    }
}

#[test]
fn default_locations_are_namespaced() {
    assert!(config_path().ends_with("retro-scrape/config.toml"));
    assert!(default_cache_dir().ends_with("retro-scrape/cache"));
}
