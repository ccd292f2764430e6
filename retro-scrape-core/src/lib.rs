//! Shared data model for retro-scrape: platforms, sources, scraped entries
//! and the resolved run configuration.

pub mod config;
pub mod entry;
pub mod error;
pub mod platform;
pub mod source;

pub use config::{MAX_FIELD_LENGTH, MAX_THREADS, ScrapeConfig, miss_log_name};
pub use entry::{Candidate, FieldKind, GameEntry, base_name_of, identity_of};
pub use error::CoreError;
pub use platform::{Platform, PlatformParseError};
pub use source::{SourceKind, SourceParseError};
