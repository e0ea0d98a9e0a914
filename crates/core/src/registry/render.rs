//! Chat listing for a registered result set.

use std::fmt;

use super::ReferenceCode;
use crate::indexer::Candidate;

const BYTES_PER_GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Size in binary gigabytes with two decimals, e.g. "2.71".
pub fn format_size_gib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_GIB)
}

/// What a registration produced: the coded entries in insertion order and
/// the candidate count before ranking.
#[derive(Debug, Clone)]
pub struct Listing {
    pub entries: Vec<(ReferenceCode, Candidate)>,
    pub total: usize,
}

impl Listing {
    pub fn kept(&self) -> usize {
        self.entries.len()
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Results ({}/{})", self.kept(), self.total)?;

        for (code, candidate) in &self.entries {
            write!(
                f,
                "\n\n/get{} - {}, Seeds: {}, Peers: {}, Size: {} GB\n{}",
                code,
                candidate.tracker,
                candidate.seeders,
                candidate.peers,
                format_size_gib(candidate.size_bytes),
                candidate.title
            )?;
        }

        Ok(())
    }
}
