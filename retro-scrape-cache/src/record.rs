use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use retro_scrape_core::{FieldKind, GameEntry};

use crate::priorities::PriorityTable;

/// Unique key of a cached record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey {
    pub platform: String,
    pub identity: String,
}

impl CacheKey {
    pub fn new(platform: impl Into<String>, identity: impl Into<String>) -> Self {
        Self {
            platform: platform.into(),
            identity: identity.into(),
        }
    }
}

/// One field value together with where and when it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedField {
    pub value: String,
    pub source: String,
    /// RFC 3339 timestamp of the scrape that produced the value.
    pub updated: String,
}

impl CachedField {
    pub fn new(value: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            source: source.into(),
            updated: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Everything cached for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheRecord {
    pub platform: String,
    pub identity: String,
    #[serde(default)]
    pub fields: BTreeMap<FieldKind, CachedField>,
}

impl CacheRecord {
    pub fn new(key: &CacheKey) -> Self {
        Self {
            platform: key.platform.clone(),
            identity: key.identity.clone(),
            fields: BTreeMap::new(),
        }
    }

    pub fn key(&self) -> CacheKey {
        CacheKey::new(&self.platform, &self.identity)
    }

    pub fn get(&self, kind: FieldKind) -> Option<&str> {
        self.fields.get(&kind).map(|f| f.value.as_str())
    }

    /// Offer `incoming` for field `kind`, keeping whichever value the
    /// priority table prefers. Returns `true` when the record changed.
    ///
    /// - an empty slot always takes the incoming value
    /// - an identical value from the same source is left untouched
    /// - the same source may always update its own value
    /// - otherwise the stronger-ranked source wins, and equal rank lets the
    ///   incoming value win
    pub fn offer(
        &mut self,
        kind: FieldKind,
        incoming: CachedField,
        priorities: &PriorityTable,
    ) -> bool {
        let Some(existing) = self.fields.get(&kind) else {
            self.fields.insert(kind, incoming);
            return true;
        };

        if existing.source == incoming.source {
            if existing.value == incoming.value {
                return false;
            }
            self.fields.insert(kind, incoming);
            return true;
        }

        let current_rank = priorities.rank(&self.platform, &existing.source);
        let incoming_rank = priorities.rank(&self.platform, &incoming.source);
        if incoming_rank <= current_rank {
            self.fields.insert(kind, incoming);
            true
        } else {
            false
        }
    }

    /// Rebuild a found entry for `path` from the cached fields.
    pub fn to_entry(&self, path: &Path) -> GameEntry {
        let mut entry = GameEntry::new(path);
        for (&kind, field) in &self.fields {
            entry.set_field(kind, field.value.clone());
            entry.sources.insert(kind, field.source.clone());
        }
        entry.platform = Some(self.platform.clone());
        entry.found = true;
        entry.search_match = 100;
        entry
    }
}
