//! Metadata sources for retro-scrape.
//!
//! A [`Source`] is chosen once per run from a [`SourceKind`](retro_scrape_core::SourceKind).
//! Searching sources (TheGamesDB, ScreenScraper, Arcade Database) go through
//! search, candidate selection and fetch; direct sources (the local cache and
//! bulk import) resolve a file in one lookup.

pub mod arcadedb;
pub mod credentials;
pub mod error;
pub mod http;
pub mod import;
pub mod localdb;
pub mod screenscraper;
pub mod source;
pub mod systems;
pub mod thegamesdb;

pub use credentials::Credentials;
pub use error::SourceError;
pub use source::{Query, Source, SourceSettings};
