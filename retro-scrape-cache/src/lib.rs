//! Persistent per-platform cache of scraped game metadata.
//!
//! Records are keyed by platform and file identity and remember which
//! source contributed each field, so later scrapes and merges can decide
//! field by field which value to keep using a [`PriorityTable`].

pub mod error;
pub mod priorities;
pub mod record;
pub mod store;

pub use error::CacheError;
pub use priorities::{PRIORITIES_FILE, PriorityTable};
pub use record::{CacheKey, CacheRecord, CachedField};
pub use store::{CacheSnapshot, DB_FILE, LocalCache, MergeStats};
