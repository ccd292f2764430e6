pub(crate) mod cache;
pub(crate) mod list;
pub(crate) mod scrape;
