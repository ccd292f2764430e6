use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use retro_scrape_core::{FieldKind, GameEntry, Platform, identity_of};

use crate::error::CacheError;
use crate::priorities::{PRIORITIES_FILE, PriorityTable};
use crate::record::{CacheKey, CacheRecord, CachedField};

/// Cache format version. Documents written with another version are ignored.
const CACHE_VERSION: u32 = 1;

/// Name of the record document inside a platform cache folder.
pub const DB_FILE: &str = "db.json";

/// On-disk form of a platform cache.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheDocument {
    #[serde(default)]
    version: u32,
    #[serde(default)]
    records: Vec<CacheRecord>,
}

/// Counts reported by [`LocalCache::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    pub inserted: usize,
    pub updated: usize,
    pub kept: usize,
    /// Records of another platform, left out of the merge.
    pub foreign: usize,
}

/// Persistent store of previously scraped entries for one platform.
#[derive(Debug)]
pub struct LocalCache {
    root: PathBuf,
    platform: String,
    index: BTreeMap<CacheKey, CacheRecord>,
    priorities: PriorityTable,
}

impl LocalCache {
    /// Open the cache of `platform` under `base`, creating its folder if needed.
    ///
    /// Nothing is loaded yet; call [`LocalCache::read`] and
    /// [`LocalCache::read_priorities`] before use.
    pub fn open(base: &Path, platform: Platform) -> Result<Self, CacheError> {
        let root = base.join(platform.short_name());
        fs::create_dir_all(&root).map_err(|e| CacheError::io(&root, e))?;
        Ok(Self::at(root, platform.short_name()))
    }

    /// Open an existing cache folder without creating anything.
    ///
    /// `path` may be the folder or its `db.json`. Used for merge sources.
    pub fn open_existing(path: &Path, platform: Platform) -> Result<Self, CacheError> {
        let root = if path.is_file() {
            path.parent().map(Path::to_path_buf).unwrap_or_default()
        } else {
            path.to_path_buf()
        };
        if !root.join(DB_FILE).is_file() {
            return Err(CacheError::not_found(format!(
                "no {DB_FILE} in {}",
                root.display()
            )));
        }
        Ok(Self::at(root, platform.short_name()))
    }

    fn at(root: PathBuf, platform: &str) -> Self {
        Self {
            root,
            platform: platform.to_string(),
            index: BTreeMap::new(),
            priorities: PriorityTable::default(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE)
    }

    /// Load the persisted records into memory, returning how many were read.
    ///
    /// A missing document is an empty cache. A document from another cache
    /// version is discarded with a warning.
    pub fn read(&mut self) -> Result<usize, CacheError> {
        let path = self.db_path();
        self.index.clear();
        if !path.exists() {
            return Ok(0);
        }
        let contents = fs::read_to_string(&path).map_err(|e| CacheError::io(&path, e))?;
        let doc: CacheDocument =
            serde_json::from_str(&contents).map_err(|e| CacheError::json(&path, e))?;
        if doc.version != CACHE_VERSION {
            log::warn!(
                "Ignoring cache {} (version {}, expected {CACHE_VERSION})",
                path.display(),
                doc.version
            );
            return Ok(0);
        }
        for record in doc.records {
            self.index.insert(record.key(), record);
        }
        log::debug!("Read {} cached records from {}", self.index.len(), path.display());
        Ok(self.index.len())
    }

    /// Load the priority table from `priorities.yaml` next to the platform folders.
    pub fn read_priorities(&mut self) -> Result<&PriorityTable, CacheError> {
        let path = self
            .root
            .parent()
            .map(|base| base.join(PRIORITIES_FILE))
            .unwrap_or_else(|| PathBuf::from(PRIORITIES_FILE));
        self.priorities = PriorityTable::load(&path)?;
        Ok(&self.priorities)
    }

    pub fn set_priorities(&mut self, priorities: PriorityTable) {
        self.priorities = priorities;
    }

    pub fn priorities(&self) -> &PriorityTable {
        &self.priorities
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(&self, identity: &str) -> Option<&CacheRecord> {
        self.index.get(&CacheKey::new(&self.platform, identity))
    }

    pub fn records(&self) -> impl Iterator<Item = &CacheRecord> {
        self.index.values()
    }

    /// Insert or update the record for `entry`, one field at a time.
    ///
    /// Fields the entry attributes to a source keep that provenance; the
    /// rest are attributed to `source`. Absent fields never erase cached
    /// values. Returns the number of fields that changed.
    pub fn upsert(&mut self, entry: &GameEntry, source: &str) -> usize {
        let key = CacheKey::new(&self.platform, identity_of(&entry.path));
        let record = self
            .index
            .entry(key)
            .or_insert_with_key(CacheRecord::new);

        let mut changed = 0;
        for &kind in FieldKind::ALL {
            let Some(value) = entry.field(kind) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            let contributor = entry.sources.get(&kind).map(String::as_str).unwrap_or(source);
            if record.offer(kind, CachedField::new(value, contributor), &self.priorities) {
                changed += 1;
            }
        }
        changed
    }

    /// Fold the records of `other` into this cache.
    ///
    /// Keys missing here are inserted. Shared keys are left alone unless
    /// `update_existing` is set, in which case each field of `other` is
    /// offered through the priority table with its original provenance.
    /// Records only present here are never removed, and records of
    /// another platform are never taken.
    pub fn merge(&mut self, other: &LocalCache, update_existing: bool) -> MergeStats {
        let mut stats = MergeStats::default();
        for (key, incoming) in &other.index {
            if key.platform != self.platform {
                stats.foreign += 1;
                continue;
            }
            match self.index.get_mut(key) {
                None => {
                    self.index.insert(key.clone(), incoming.clone());
                    stats.inserted += 1;
                }
                Some(existing) if update_existing => {
                    let mut changed = false;
                    for (&kind, field) in &incoming.fields {
                        changed |= existing.offer(kind, field.clone(), &self.priorities);
                    }
                    if changed {
                        stats.updated += 1;
                    } else {
                        stats.kept += 1;
                    }
                }
                Some(_) => stats.kept += 1,
            }
        }
        stats
    }

    /// Drop every record of this platform whose identity is not in `identities`.
    ///
    /// Returns the number of records removed.
    pub fn clean(&mut self, identities: &HashSet<String>) -> usize {
        let before = self.index.len();
        let platform = self.platform.clone();
        self.index
            .retain(|key, _| key.platform != platform || identities.contains(&key.identity));
        before - self.index.len()
    }

    /// Persist all records, replacing the document atomically.
    pub fn write(&self) -> Result<(), CacheError> {
        fs::create_dir_all(&self.root).map_err(|e| CacheError::io(&self.root, e))?;
        let doc = CacheDocument {
            version: CACHE_VERSION,
            records: self.index.values().cloned().collect(),
        };
        let path = self.db_path();
        let serialized = serde_json::to_string_pretty(&doc).map_err(|e| CacheError::json(&path, e))?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serialized).map_err(|e| CacheError::io(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| CacheError::io(&path, e))?;
        log::debug!("Wrote {} cached records to {}", self.index.len(), path.display());
        Ok(())
    }

    /// Read-only copy of this platform's records, shareable across workers.
    pub fn snapshot(&self) -> CacheSnapshot {
        let records = self
            .index
            .values()
            .filter(|r| r.platform == self.platform)
            .map(|r| (r.identity.clone(), r.clone()))
            .collect();
        CacheSnapshot {
            records: Arc::new(records),
        }
    }
}

/// Immutable view of a platform cache taken before workers start.
#[derive(Debug, Clone, Default)]
pub struct CacheSnapshot {
    records: Arc<HashMap<String, CacheRecord>>,
}

impl CacheSnapshot {
    /// Cached entry for the file at `path`, if any.
    pub fn lookup(&self, path: &Path) -> Option<GameEntry> {
        self.records
            .get(&identity_of(path))
            .map(|record| record.to_entry(path))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
