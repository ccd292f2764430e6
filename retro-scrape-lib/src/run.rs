//! The scrape run: setup, sharded workers, aggregation and finalization.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;

use retro_scrape_cache::LocalCache;
use retro_scrape_core::{GameEntry, ScrapeConfig, SourceKind, base_name_of, identity_of};
use retro_scrape_frontend::Frontend;
use retro_scrape_sources::{Query, Source, SourceSettings};

use crate::aggregate::{Aggregator, RunStats, ScrapeOutcome};
use crate::error::ScrapeError;
use crate::matcher;
use crate::media::MediaStore;
use crate::miss_log::MissLog;
use crate::progress::ScrapeEvent;
use crate::scanner::{ScanOptions, scan_input};
use crate::shard::{partition, resolve_threads};
use crate::worker_pool::{ShardPool, WorkerMessage};

/// What a finished run produced.
#[derive(Debug)]
pub struct RunReport {
    pub stats: RunStats,
    pub threads: usize,
    /// Entries written to (or, when pretending, assembled for) the document.
    pub entries: usize,
    /// Entries carried over from the existing document.
    pub preserved: usize,
    pub document_path: PathBuf,
    /// Why the document could not be saved. Scraping itself succeeded.
    pub document_error: Option<String>,
    pub pretend: bool,
}

impl RunReport {
    pub fn document_saved(&self) -> bool {
        !self.pretend && self.document_error.is_none()
    }
}

/// Per-run state shared by every worker.
struct WorkerContext {
    config: Arc<ScrapeConfig>,
    source: Source,
    files: Vec<PathBuf>,
    media: MediaStore,
}

impl WorkerContext {
    async fn process(&self, index: usize) -> ScrapeOutcome {
        let path = &self.files[index];
        if self.source.kind().is_direct() {
            return self.resolve_direct(path);
        }
        self.resolve_by_search(path).await
    }

    fn resolve_direct(&self, path: &Path) -> ScrapeOutcome {
        match self.source.lookup(path) {
            Ok(Some(entry)) => {
                let from_cache = self.source.kind() == SourceKind::LocalDb;
                ScrapeOutcome {
                    entry: self.finish_entry(entry, path, 100),
                    closest: None,
                    from_cache,
                }
            }
            Ok(None) => ScrapeOutcome::miss(GameEntry::new(path), None),
            Err(e) => {
                log::warn!("{} lookup failed for {}: {e}", self.source.name(), path.display());
                ScrapeOutcome::miss(GameEntry::new(path), None)
            }
        }
    }

    async fn resolve_by_search(&self, path: &Path) -> ScrapeOutcome {
        let platform = self.config.platform;
        let title = matcher::normalize(&base_name_of(path));
        let query = Query { title: &title, path };

        let candidates = match self.source.search(&query, platform).await {
            Ok(candidates) => candidates,
            Err(e) => {
                log::debug!("{} search failed for '{title}': {e}", self.source.name());
                Vec::new()
            }
        };
        let selection = matcher::select(&title, &candidates, platform, self.config.min_match);
        let Some(chosen) = selection.index else {
            self.source.discard(&candidates);
            let mut entry = GameEntry::new(path);
            entry.search_match = selection.score;
            return ScrapeOutcome::miss(entry, selection.closest);
        };

        let fetched = self.source.fetch(&candidates[chosen], platform).await;
        self.source.discard(&candidates);
        match fetched {
            Ok(entry) => ScrapeOutcome {
                entry: self.finish_entry(entry, path, selection.score),
                closest: None,
                from_cache: false,
            },
            Err(e) => {
                log::warn!(
                    "{} fetch failed for '{}': {e}",
                    self.source.name(),
                    candidates[chosen].title
                );
                let mut entry = GameEntry::new(path);
                entry.search_match = selection.score;
                ScrapeOutcome::miss(entry, selection.closest)
            }
        }
    }

    /// Tie a source record to the input file and persist its media.
    fn finish_entry(&self, mut entry: GameEntry, path: &Path, score: u8) -> GameEntry {
        entry.path = path.to_path_buf();
        entry.base_name = base_name_of(path);
        entry.found = true;
        entry.search_match = score;
        if !self.config.pretend {
            self.media.persist(&mut entry);
        }
        entry
    }
}

/// Open the platform cache and load its records and priorities.
fn open_cache(config: &ScrapeConfig) -> Result<LocalCache, retro_scrape_cache::CacheError> {
    let mut cache = LocalCache::open(&config.cache_dir, config.platform)?;
    let records = cache.read()?;
    if let Err(e) = cache.read_priorities() {
        log::warn!("Ignoring source priorities: {e}");
    }
    log::info!("Loaded {records} cached record(s) from {}", cache.root().display());
    Ok(cache)
}

/// Input files for the run, with those already in the document removed
/// when skipping existing entries.
fn collect_inputs(
    config: &ScrapeConfig,
    frontend: &dyn Frontend,
) -> Result<(Vec<PathBuf>, Vec<GameEntry>), ScrapeError> {
    let options = ScanOptions::new(&config.platform.extensions(), config.subdirs)
        .exclude(&config.media_dir)
        .exclude(&config.cache_dir);
    let mut files = scan_input(&config.input_dir, &options)?;

    let mut preserved = Vec::new();
    if config.skip_existing {
        preserved = match frontend.read_existing(&config.document_path) {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Cannot read {}: {e}", config.document_path.display());
                Vec::new()
            }
        };
        let existing: HashSet<String> = preserved
            .iter()
            .map(|e| e.base_name.trim().to_lowercase())
            .collect();
        let before = files.len();
        files.retain(|f| !existing.contains(&identity_of(f)));
        log::info!(
            "Skipping {} file(s) already in {}",
            before - files.len(),
            config.document_path.display()
        );
    }
    Ok((files, preserved))
}

fn write_document(path: &Path, document: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, document)
}

/// Scrape every input file of `config` and write the frontend document.
///
/// `settings` carries credentials and the import file; region, language,
/// video and the cache snapshot are filled in from `config`. Progress is
/// sent to `events` when given.
pub async fn run_scrape(
    config: Arc<ScrapeConfig>,
    mut settings: SourceSettings,
    frontend: &dyn Frontend,
    events: Option<mpsc::UnboundedSender<ScrapeEvent>>,
) -> Result<RunReport, ScrapeError> {
    config.validate()?;
    if !config.input_dir.is_dir() {
        return Err(ScrapeError::InputMissing(config.input_dir.clone()));
    }

    let cache = if config.local_cache {
        match open_cache(&config) {
            Ok(cache) => Some(cache),
            Err(e) if config.source == SourceKind::LocalDb => {
                return Err(ScrapeError::CacheUnavailable(e));
            }
            Err(e) => {
                log::warn!("Local cache disabled for this run: {e}");
                None
            }
        }
    } else {
        None
    };

    settings.region = config.region.clone();
    settings.language = config.language.clone();
    settings.include_video = config.include_video;
    if config.source == SourceKind::LocalDb {
        settings.cache = cache.as_ref().map(LocalCache::snapshot);
    }
    let source = Source::build(config.source, settings)?;

    let (files, preserved) = collect_inputs(&config, frontend)?;
    let total = files.len();
    let threads = resolve_threads(config.threads, config.source);
    let shards = partition(total, threads);
    log::info!(
        "Scraping {total} file(s) for '{}' from '{}' with {} worker(s)",
        config.platform,
        source.name(),
        shards.len()
    );

    let miss_log = match MissLog::create(&config.miss_log) {
        Ok(log) => Some(log),
        Err(e) => {
            log::warn!("Cannot create {}: {e}", config.miss_log.display());
            None
        }
    };
    let mut aggregator = Aggregator::new(&config, total)
        .with_cache(cache)
        .with_miss_log(miss_log)
        .with_events(events.clone());

    if let Some(tx) = &events {
        let _ = tx.send(ScrapeEvent::Started {
            total,
            threads: shards.len(),
            preserved: preserved.len(),
        });
    }

    if !shards.is_empty() {
        let context = Arc::new(WorkerContext {
            media: MediaStore::new(&config.media_dir),
            config: Arc::clone(&config),
            source,
            files,
        });
        let mut pool = ShardPool::start(shards, move |index| {
            let context = Arc::clone(&context);
            async move { context.process(index).await }
        });

        let mut done = 0;
        while done < pool.shard_count() {
            match pool.recv().await {
                Some(WorkerMessage::Entry(outcome)) => {
                    if let Err(e) = aggregator.record(outcome) {
                        pool.abort();
                        return Err(e);
                    }
                }
                Some(WorkerMessage::ShardDone { shard }) => {
                    log::debug!("Shard {shard} finished");
                    done += 1;
                }
                None => {
                    log::warn!("Workers stopped before finishing their shards");
                    break;
                }
            }
        }
        pool.join().await;
    }

    if let Some(tx) = &events {
        let _ = tx.send(ScrapeEvent::Finalizing);
    }
    finalize(&config, frontend, aggregator, preserved, threads)
}

fn finalize(
    config: &ScrapeConfig,
    frontend: &dyn Frontend,
    aggregator: Aggregator,
    preserved: Vec<GameEntry>,
    threads: usize,
) -> Result<RunReport, ScrapeError> {
    let (mut entries, stats, cache) = aggregator.finish();
    let preserved_count = preserved.len();
    entries.extend(preserved);

    if let Some(cache) = &cache {
        if config.pretend {
            log::info!("Pretend mode, cache left untouched");
        } else if let Err(e) = cache.write() {
            log::warn!("Failed to write the local cache: {e}");
        }
    }

    frontend.sort_entries(&mut entries);
    let document = frontend.assemble_document(&entries, config.max_length)?;
    let document_error = if config.pretend {
        None
    } else {
        match write_document(&config.document_path, &document) {
            Ok(()) => {
                log::info!(
                    "Wrote {} entries to {}",
                    entries.len(),
                    config.document_path.display()
                );
                None
            }
            Err(e) => {
                log::error!("Failed to write {}: {e}", config.document_path.display());
                Some(e.to_string())
            }
        }
    };

    Ok(RunReport {
        stats,
        threads,
        entries: entries.len(),
        preserved: preserved_count,
        document_path: config.document_path.clone(),
        document_error,
        pretend: config.pretend,
    })
}
