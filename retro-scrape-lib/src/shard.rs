//! Static partitioning of the input list across workers.

use std::ops::Range;

use retro_scrape_core::{MAX_THREADS, SourceKind};

/// Worker count for a run: the request clamped to `1..=MAX_THREADS`, then
/// capped by the source's own concurrency limit.
pub fn resolve_threads(requested: usize, source: SourceKind) -> usize {
    let threads = requested.clamp(1, MAX_THREADS);
    match source.max_threads() {
        Some(max) if threads > max => {
            log::warn!(
                "Source '{source}' allows at most {max} thread(s), using {max} instead of {threads}"
            );
            max
        }
        _ => threads,
    }
}

/// Split `total` items into contiguous shards for `workers` workers.
///
/// Every shard holds `total / workers` items and the last one also takes
/// the remainder. With fewer items than workers there is one item per
/// shard; with no items there are no shards.
pub fn partition(total: usize, workers: usize) -> Vec<Range<usize>> {
    if total == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, total);
    let base = total / workers;
    (0..workers)
        .map(|i| {
            let start = i * base;
            let end = if i + 1 == workers { total } else { start + base };
            start..end
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(shards: &[Range<usize>], total: usize) {
        let mut next = 0;
        for shard in shards {
            assert_eq!(shard.start, next, "shards must be contiguous");
            assert!(!shard.is_empty());
            next = shard.end;
        }
        assert_eq!(next, total);
    }

    #[test]
    fn last_shard_takes_remainder() {
        let shards = partition(10, 3);
        assert_eq!(shards, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn fewer_items_than_workers() {
        let shards = partition(3, 8);
        assert_eq!(shards, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn no_items_no_shards() {
        assert!(partition(0, 4).is_empty());
    }

    #[test]
    fn every_split_covers_all_items_once() {
        for total in 1..=50 {
            for workers in 1..=MAX_THREADS {
                let shards = partition(total, workers);
                assert_eq!(shards.len(), workers.min(total));
                assert_covers(&shards, total);
            }
        }
    }

    #[test]
    fn threads_are_clamped() {
        assert_eq!(resolve_threads(0, SourceKind::TheGamesDb), 1);
        assert_eq!(resolve_threads(64, SourceKind::TheGamesDb), MAX_THREADS);
        assert_eq!(resolve_threads(4, SourceKind::Import), 4);
    }

    #[test]
    fn arcadedb_runs_single_threaded() {
        assert_eq!(resolve_threads(6, SourceKind::ArcadeDb), 1);
    }
}
