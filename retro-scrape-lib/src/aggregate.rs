//! The single point where worker results are folded into run state.
//!
//! Counters, the result list, the miss log and the cache index are owned
//! by one [`Aggregator`] and only touched while handling a worker message.

use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use retro_scrape_cache::LocalCache;
use retro_scrape_core::{GameEntry, Platform, ScrapeConfig, SourceKind};

use crate::error::ScrapeError;
use crate::matcher;
use crate::miss_log::MissLog;
use crate::progress::{FileProgress, ScrapeEvent, estimate_remaining, format_hms};

/// Number of leading files that all missing means the run is mismatched.
pub const ABORT_WINDOW: usize = 30;

/// What a worker produced for one file.
#[derive(Debug, Clone)]
pub struct ScrapeOutcome {
    pub entry: GameEntry,
    /// Best candidate title when nothing matched well enough.
    pub closest: Option<String>,
    /// Resolved from the local cache, so not written back to it.
    pub from_cache: bool,
}

impl ScrapeOutcome {
    pub fn miss(entry: GameEntry, closest: Option<String>) -> Self {
        Self {
            entry,
            closest,
            from_cache: false,
        }
    }
}

/// Totals for the summary printed after a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub total: usize,
    pub processed: usize,
    pub found: usize,
    pub not_found: usize,
    /// Mean search match of found files; `None` when nothing was found.
    pub mean_match: Option<f64>,
    /// Mean completeness of found files; `None` when nothing was found.
    pub mean_completeness: Option<f64>,
    pub elapsed: Duration,
}

impl RunStats {
    pub fn elapsed_hms(&self) -> String {
        format_hms(self.elapsed)
    }
}

pub struct Aggregator {
    total: usize,
    abort_window: usize,
    processed: usize,
    found: usize,
    not_found: usize,
    match_sum: u64,
    completeness_sum: f64,
    source: SourceKind,
    platform: Platform,
    include_skipped: bool,
    include_video: bool,
    keep_brackets: bool,
    results: Vec<GameEntry>,
    miss_log: Option<MissLog>,
    cache: Option<LocalCache>,
    events: Option<mpsc::UnboundedSender<ScrapeEvent>>,
    started: Instant,
}

impl Aggregator {
    pub fn new(config: &ScrapeConfig, total: usize) -> Self {
        Self {
            total,
            abort_window: ABORT_WINDOW.min(total),
            processed: 0,
            found: 0,
            not_found: 0,
            match_sum: 0,
            completeness_sum: 0.0,
            source: config.source,
            platform: config.platform,
            include_skipped: config.include_skipped,
            include_video: config.include_video,
            keep_brackets: config.keep_brackets,
            results: Vec::with_capacity(total),
            miss_log: None,
            cache: None,
            events: None,
            started: Instant::now(),
        }
    }

    pub fn with_cache(mut self, cache: Option<LocalCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_miss_log(mut self, miss_log: Option<MissLog>) -> Self {
        self.miss_log = miss_log;
        self
    }

    pub fn with_events(mut self, events: Option<mpsc::UnboundedSender<ScrapeEvent>>) -> Self {
        self.events = events;
        self
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Fold one worker result into the run.
    ///
    /// Fails with [`ScrapeError::SystemicMismatch`] when the file just
    /// recorded completes a leading window of misses.
    pub fn record(&mut self, outcome: ScrapeOutcome) -> Result<(), ScrapeError> {
        let ScrapeOutcome {
            mut entry,
            closest,
            from_cache,
        } = outcome;
        self.processed += 1;
        let completeness = entry.completeness(self.include_video);

        let shown_title = if entry.found {
            self.found += 1;
            self.match_sum += u64::from(entry.search_match);
            self.completeness_sum += completeness;

            entry.strip_media();
            if !from_cache {
                if let Some(cache) = self.cache.as_mut() {
                    let changed = cache.upsert(&entry, self.source.name());
                    log::debug!("Cached {changed} field(s) for '{}'", entry.base_name);
                }
            }
            if let Some(title) = entry.title.as_deref() {
                entry.title = Some(matcher::display_title(
                    title,
                    &entry.base_name,
                    self.keep_brackets,
                ));
            }
            log::debug!(
                "Found '{}' as '{}' ({}%)",
                entry.base_name,
                entry.display_title(),
                entry.search_match
            );
            entry.title.clone()
        } else {
            self.not_found += 1;
            if let Some(log) = self.miss_log.as_mut() {
                if let Err(e) = log.record(&entry.base_name, closest.as_deref()) {
                    log::warn!("Failed to write to {}: {e}", log.path().display());
                }
            }
            log::debug!("No match for '{}'", entry.base_name);
            closest
        };

        self.emit_progress(&entry, shown_title, completeness);
        if entry.found || self.include_skipped {
            entry.strip_media();
            self.results.push(entry);
        }
        self.check_mismatch()
    }

    fn emit_progress(&self, entry: &GameEntry, title: Option<String>, completeness: f64) {
        let Some(events) = &self.events else {
            return;
        };
        let elapsed = self.started.elapsed();
        let _ = events.send(ScrapeEvent::Processed(FileProgress {
            index: self.processed,
            total: self.total,
            base_name: entry.base_name.clone(),
            found: entry.found,
            title,
            search_match: entry.search_match,
            completeness,
            elapsed,
            remaining: estimate_remaining(elapsed, self.processed, self.total),
        }));
    }

    fn check_mismatch(&self) -> Result<(), ScrapeError> {
        if self.processed == self.abort_window
            && self.not_found == self.abort_window
            && self.source.detects_mismatch()
        {
            log::error!(
                "First {} files all missed on '{}', aborting",
                self.abort_window,
                self.source
            );
            return Err(ScrapeError::SystemicMismatch {
                processed: self.processed,
                backend: self.source.name().to_string(),
                platform: self.platform.short_name().to_string(),
            });
        }
        Ok(())
    }

    pub fn stats(&self) -> RunStats {
        let mean = |sum: f64| (self.found > 0).then(|| sum / self.found as f64);
        RunStats {
            total: self.total,
            processed: self.processed,
            found: self.found,
            not_found: self.not_found,
            mean_match: mean(self.match_sum as f64),
            mean_completeness: mean(self.completeness_sum),
            elapsed: self.started.elapsed(),
        }
    }

    /// Results in arrival order, the final totals and the cache handed back
    /// for writing.
    pub fn finish(self) -> (Vec<GameEntry>, RunStats, Option<LocalCache>) {
        let stats = self.stats();
        (self.results, stats, self.cache)
    }
}

#[cfg(test)]
#[path = "tests/aggregate_tests.rs"]
mod tests;
