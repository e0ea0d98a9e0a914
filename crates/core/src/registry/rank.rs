//! Ranking of candidates before they get codes.

use crate::indexer::Candidate;

/// Most entries a result set can hold.
pub const MAX_RESULTS: usize = 20;

/// Sort by seeders (descending, stable), keep the top `limit`, then drop
/// entries without seeders.
///
/// The zero-seed filter runs after truncation: dead torrents inside the top
/// `limit` shrink the result rather than making room for other entries.
pub fn rank_candidates(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.seeders.cmp(&a.seeders));
    candidates.truncate(limit);
    candidates.retain(|c| c.seeders >= 1);
    candidates
}
