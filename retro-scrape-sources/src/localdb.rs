use std::path::Path;

use retro_scrape_cache::CacheSnapshot;
use retro_scrape_core::GameEntry;

/// Cache-only source: answers from what earlier runs stored, never from the network.
pub struct LocalDb {
    snapshot: CacheSnapshot,
}

impl LocalDb {
    pub fn new(snapshot: CacheSnapshot) -> Self {
        if snapshot.is_empty() {
            log::warn!("The local cache is empty, every file will be reported as missing");
        }
        Self { snapshot }
    }

    pub fn lookup(&self, path: &Path) -> Option<GameEntry> {
        self.snapshot.lookup(path)
    }
}
