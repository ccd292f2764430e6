use super::*;
use std::path::PathBuf;

fn config(source: SourceKind) -> ScrapeConfig {
    ScrapeConfig::new(Platform::Snes, "/roms/snes").with_source(source)
}

fn hit(name: &str, score: u8) -> ScrapeOutcome {
    let mut entry = GameEntry::new(PathBuf::from(format!("/roms/snes/{name}.sfc")));
    entry.title = Some(name.to_string());
    entry.found = true;
    entry.search_match = score;
    ScrapeOutcome {
        entry,
        closest: None,
        from_cache: false,
    }
}

fn miss(name: &str) -> ScrapeOutcome {
    ScrapeOutcome::miss(
        GameEntry::new(PathBuf::from(format!("/roms/snes/{name}.sfc"))),
        None,
    )
}

#[test]
fn aborts_when_the_first_window_all_misses() {
    let mut agg = Aggregator::new(&config(SourceKind::TheGamesDb), 40);
    for i in 0..ABORT_WINDOW - 1 {
        agg.record(miss(&format!("game {i}"))).unwrap();
    }
    let err = agg.record(miss("last")).unwrap_err();
    assert!(err.is_mismatch());
    assert_eq!(agg.processed(), ABORT_WINDOW);
}

#[test]
fn small_runs_use_the_whole_list_as_window() {
    let mut agg = Aggregator::new(&config(SourceKind::ScreenScraper), 3);
    agg.record(miss("a")).unwrap();
    agg.record(miss("b")).unwrap();
    assert!(matches!(
        agg.record(miss("c")),
        Err(ScrapeError::SystemicMismatch { processed: 3, .. })
    ));
}

#[test]
fn one_hit_in_the_window_prevents_abort() {
    let mut agg = Aggregator::new(&config(SourceKind::TheGamesDb), 40);
    agg.record(hit("Axelay", 90)).unwrap();
    for i in 0..39 {
        agg.record(miss(&format!("game {i}"))).unwrap();
    }
    assert_eq!(agg.stats().not_found, 39);
}

#[test]
fn misses_after_the_window_never_abort() {
    let mut agg = Aggregator::new(&config(SourceKind::TheGamesDb), 60);
    for _ in 0..ABORT_WINDOW - 1 {
        agg.record(miss("m")).unwrap();
    }
    agg.record(hit("h", 100)).unwrap();
    for _ in 0..ABORT_WINDOW {
        agg.record(miss("m")).unwrap();
    }
}

#[test]
fn direct_sources_are_exempt() {
    for source in [SourceKind::Import, SourceKind::LocalDb] {
        let mut agg = Aggregator::new(&config(source), 30);
        for i in 0..30 {
            agg.record(miss(&format!("game {i}"))).unwrap();
        }
        assert_eq!(agg.stats().not_found, 30);
    }
}

#[test]
fn means_only_cover_found_entries() {
    let mut agg = Aggregator::new(&config(SourceKind::Import), 3);
    assert_eq!(agg.stats().mean_match, None);

    agg.record(hit("a", 80)).unwrap();
    agg.record(hit("b", 100)).unwrap();
    agg.record(miss("c")).unwrap();
    let stats = agg.stats();
    assert_eq!(stats.found, 2);
    assert_eq!(stats.not_found, 1);
    assert_eq!(stats.mean_match, Some(90.0));
    assert!(stats.mean_completeness.is_some());
}

#[test]
fn skipped_entries_are_kept_only_when_asked() {
    let mut agg = Aggregator::new(&config(SourceKind::Import), 2);
    agg.record(hit("a", 100)).unwrap();
    agg.record(miss("b")).unwrap();
    assert_eq!(agg.finish().0.len(), 1);

    let mut with_skipped = config(SourceKind::Import);
    with_skipped.include_skipped = true;
    let mut agg = Aggregator::new(&with_skipped, 2);
    agg.record(hit("a", 100)).unwrap();
    agg.record(miss("b")).unwrap();
    let (results, _, _) = agg.finish();
    assert_eq!(results.len(), 2);
    assert!(!results[1].found);
}

#[test]
fn media_payloads_are_dropped_from_results() {
    let mut agg = Aggregator::new(&config(SourceKind::Import), 1);
    let mut outcome = hit("a", 100);
    outcome.entry.cover = Some(vec![1, 2, 3]);
    outcome.entry.cover_path = Some(PathBuf::from("/media/covers/a.png"));
    agg.record(outcome).unwrap();

    let (results, stats, _) = agg.finish();
    assert!(results[0].cover.is_none());
    assert!(results[0].cover_path.is_some());
    assert!(stats.mean_completeness.unwrap() > 0.0);
}

#[test]
fn found_entries_update_the_cache_unless_they_came_from_it() {
    let dir = tempfile::tempdir().unwrap();
    let cache = LocalCache::open(dir.path(), Platform::Snes).unwrap();
    let mut agg = Aggregator::new(&config(SourceKind::Import), 3).with_cache(Some(cache));

    agg.record(hit("Axelay", 100)).unwrap();
    let mut cached = hit("Contra", 100);
    cached.from_cache = true;
    agg.record(cached).unwrap();
    agg.record(miss("Missing")).unwrap();

    let (_, _, cache) = agg.finish();
    let cache = cache.unwrap();
    assert_eq!(cache.len(), 1);
    assert!(cache.get("axelay").is_some());
}

#[test]
fn misses_go_to_the_miss_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("skipped.txt");
    let log = MissLog::create(&path).unwrap();
    let mut agg = Aggregator::new(&config(SourceKind::Import), 2).with_miss_log(Some(log));

    agg.record(miss("Nothing")).unwrap();
    agg.record(ScrapeOutcome::miss(
        GameEntry::new("/roms/snes/Zelda.sfc"),
        Some("Zelda II".to_string()),
    ))
    .unwrap();
    drop(agg);

    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("'Nothing', No returned matches"));
    assert!(contents.contains("'Zelda', Closest match was 'Zelda II'"));
}

#[test]
fn brackets_are_appended_after_caching() {
    let dir = tempfile::tempdir().unwrap();
    let cache = LocalCache::open(dir.path(), Platform::Snes).unwrap();
    let mut keep = config(SourceKind::Import);
    keep.keep_brackets = true;
    let mut agg = Aggregator::new(&keep, 1).with_cache(Some(cache));

    let mut outcome = hit("Axelay (USA)", 100);
    outcome.entry.title = Some("Axelay".to_string());
    agg.record(outcome).unwrap();

    let (results, _, cache) = agg.finish();
    assert_eq!(results[0].title.as_deref(), Some("Axelay (USA)"));
    let cache = cache.unwrap();
    assert_eq!(
        cache.get("axelay (usa)").unwrap().get(retro_scrape_core::FieldKind::Title),
        Some("Axelay")
    );
}

#[test]
fn progress_events_are_emitted_per_file() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut agg = Aggregator::new(&config(SourceKind::Import), 2).with_events(Some(tx));
    agg.record(hit("a", 100)).unwrap();
    agg.record(miss("b")).unwrap();

    let mut indices = Vec::new();
    while let Ok(ScrapeEvent::Processed(p)) = rx.try_recv() {
        indices.push((p.index, p.found));
    }
    assert_eq!(indices, vec![(1, true), (2, false)]);
}
