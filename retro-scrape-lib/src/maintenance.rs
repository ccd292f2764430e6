//! Cache upkeep outside a scrape run.

use std::collections::HashSet;
use std::path::Path;

use retro_scrape_cache::{LocalCache, MergeStats};
use retro_scrape_core::{ScrapeConfig, identity_of};

use crate::error::ScrapeError;
use crate::scanner::{ScanOptions, scan_input};

fn load(config: &ScrapeConfig) -> Result<LocalCache, ScrapeError> {
    let mut cache = LocalCache::open(&config.cache_dir, config.platform)?;
    cache.read()?;
    if let Err(e) = cache.read_priorities() {
        log::warn!("Ignoring source priorities: {e}");
    }
    Ok(cache)
}

/// Remove cached records for files that are no longer in the input folder.
///
/// Returns the number of records removed.
pub fn clean_cache(config: &ScrapeConfig) -> Result<usize, ScrapeError> {
    if !config.input_dir.is_dir() {
        return Err(ScrapeError::InputMissing(config.input_dir.clone()));
    }
    let mut cache = load(config)?;
    let options = ScanOptions::new(&config.platform.extensions(), config.subdirs)
        .exclude(&config.media_dir)
        .exclude(&config.cache_dir);
    let identities: HashSet<String> = scan_input(&config.input_dir, &options)?
        .iter()
        .map(|p| identity_of(p))
        .collect();

    let removed = cache.clean(&identities);
    cache.write()?;
    log::info!(
        "Removed {removed} stale record(s) from {}, {} left",
        cache.root().display(),
        cache.len()
    );
    Ok(removed)
}

/// Merge the cache at `from` into the configured platform cache.
///
/// Returns `None` when `from` holds no cache; the merge is skipped with a
/// warning in that case.
pub fn merge_cache(
    config: &ScrapeConfig,
    from: &Path,
    update_existing: bool,
) -> Result<Option<MergeStats>, ScrapeError> {
    let mut other = match LocalCache::open_existing(from, config.platform) {
        Ok(other) => other,
        Err(e) => {
            log::warn!("Not merging from {}: {e}", from.display());
            return Ok(None);
        }
    };
    other.read()?;

    let mut cache = load(config)?;
    let stats = cache.merge(&other, update_existing);
    if stats.foreign > 0 {
        log::warn!(
            "Skipped {} record(s) from {} that belong to another platform than '{}'",
            stats.foreign,
            from.display(),
            config.platform
        );
    }
    cache.write()?;
    log::info!(
        "Merged {} into {}: {} inserted, {} updated, {} kept",
        from.display(),
        cache.root().display(),
        stats.inserted,
        stats.updated,
        stats.kept
    );
    Ok(Some(stats))
}
