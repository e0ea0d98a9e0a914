//! Indexer query component.
//!
//! Sends a search term to the configured aggregator, deduplicates the raw
//! hits by Guid and hands back the candidate list. Ranking happens later, in
//! the registry.

mod dedup;
mod jackett;
mod types;

pub use dedup::deduplicate_by_guid;
pub use jackett::{JackettIndexer, SEARCH_CATEGORIES};
pub use types::*;
