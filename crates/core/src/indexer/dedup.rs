//! Deduplication of indexer hits by Guid.

use std::collections::HashMap;

use super::Candidate;

/// Keep one candidate per distinct Guid.
///
/// When a Guid repeats, the last occurrence in response order wins and
/// takes the position of that last occurrence. Everything else keeps its
/// relative order.
pub fn deduplicate_by_guid(raw: Vec<Candidate>) -> Vec<Candidate> {
    let mut last_index: HashMap<&str, usize> = HashMap::with_capacity(raw.len());
    for (index, candidate) in raw.iter().enumerate() {
        last_index.insert(candidate.guid.as_str(), index);
    }

    let keep: Vec<bool> = raw
        .iter()
        .enumerate()
        .map(|(index, candidate)| last_index.get(candidate.guid.as_str()) == Some(&index))
        .collect();

    raw.into_iter()
        .zip(keep)
        .filter_map(|(candidate, keep)| keep.then_some(candidate))
        .collect()
}
