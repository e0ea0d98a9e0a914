//! Per-user result sets.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::rank::{rank_candidates, MAX_RESULTS};
use super::{CodeGenerator, Listing, RandomCodes, ReferenceCode};
use crate::auth::UserId;
use crate::indexer::Candidate;
use crate::metrics::{REGISTRATIONS_TOTAL, REGISTRY_USERS};

/// Draws allowed per entry before a registration gives up.
pub const MAX_CODE_ATTEMPTS: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Could not find a free reference code after {attempts} attempts")]
    CodesExhausted { attempts: usize },
}

impl RegistryError {
    pub fn user_message(&self) -> &'static str {
        match self {
            RegistryError::CodesExhausted { .. } => {
                "Could not assign result codes, please search again"
            }
        }
    }
}

/// One user's current code -> candidate mapping, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    entries: Vec<(ReferenceCode, Candidate)>,
}

impl ResultSet {
    /// Give every candidate a code, lowest rank first, so the best match ends
    /// up last in the listing.
    fn assign(
        ranked: Vec<Candidate>,
        codes: &dyn CodeGenerator,
    ) -> Result<Self, RegistryError> {
        let mut set = ResultSet {
            entries: Vec::with_capacity(ranked.len()),
        };

        for candidate in ranked.into_iter().rev() {
            let code = set.draw_free_code(codes)?;
            set.entries.push((code, candidate));
        }

        Ok(set)
    }

    fn draw_free_code(&self, codes: &dyn CodeGenerator) -> Result<ReferenceCode, RegistryError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = codes.generate();
            if self.get(code).is_none() {
                return Ok(code);
            }
        }
        Err(RegistryError::CodesExhausted {
            attempts: MAX_CODE_ATTEMPTS,
        })
    }

    pub fn get(&self, code: ReferenceCode) -> Option<&Candidate> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, candidate)| candidate)
    }

    pub fn codes(&self) -> impl Iterator<Item = ReferenceCode> + '_ {
        self.entries.iter().map(|(code, _)| *code)
    }

    pub fn entries(&self) -> &[(ReferenceCode, Candidate)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Process-wide store of result sets, one per user.
///
/// A new set is built without holding the lock and swapped in with one short
/// write, so readers see either the complete old set or the complete new
/// one. Entries are never evicted; the map grows with the number of distinct
/// users until restart.
pub struct Registry {
    sets: RwLock<HashMap<UserId, Arc<ResultSet>>>,
    codes: Box<dyn CodeGenerator>,
    max_results: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry with random codes and the default result cap.
    pub fn new() -> Self {
        Self::with_generator(RandomCodes)
    }

    pub fn with_generator(codes: impl CodeGenerator + 'static) -> Self {
        Self {
            sets: RwLock::new(HashMap::new()),
            codes: Box::new(codes),
            max_results: MAX_RESULTS,
        }
    }

    /// Rank `candidates`, give them codes and make them `user`'s result set.
    ///
    /// The user's previous set is dropped even when this fails.
    pub async fn register(
        &self,
        user: UserId,
        candidates: Vec<Candidate>,
    ) -> Result<Listing, RegistryError> {
        let total = candidates.len();
        let ranked = rank_candidates(candidates, self.max_results);
        let assigned = ResultSet::assign(ranked, self.codes.as_ref());

        let mut sets = self.sets.write().await;
        let result = match assigned {
            Ok(set) => {
                let listing = Listing {
                    entries: set.entries.clone(),
                    total,
                };
                sets.insert(user, Arc::new(set));
                Ok(listing)
            }
            Err(e) => {
                sets.remove(&user);
                Err(e)
            }
        };
        REGISTRY_USERS.set(sets.len() as i64);
        drop(sets);

        match &result {
            Ok(listing) => {
                REGISTRATIONS_TOTAL.with_label_values(&["registered"]).inc();
                debug!(user = %user, kept = listing.kept(), total, "Registered result set");
            }
            Err(e) => {
                REGISTRATIONS_TOTAL.with_label_values(&["codes_exhausted"]).inc();
                warn!(user = %user, error = %e, "Result registration aborted");
            }
        }

        result
    }

    /// `register`, rendered as the chat listing.
    pub async fn rank_and_register(
        &self,
        user: UserId,
        candidates: Vec<Candidate>,
    ) -> Result<String, RegistryError> {
        self.register(user, candidates)
            .await
            .map(|listing| listing.to_string())
    }

    /// Look up a code typed by the user. Unknown users, unknown codes and
    /// malformed input all come back as `None`.
    pub async fn resolve(&self, user: UserId, code: &str) -> Option<Candidate> {
        let code: ReferenceCode = code.parse().ok()?;
        self.resolve_code(user, code).await
    }

    pub async fn resolve_code(&self, user: UserId, code: ReferenceCode) -> Option<Candidate> {
        let set = self.sets.read().await.get(&user).cloned()?;
        set.get(code).cloned()
    }

    /// Snapshot of a user's current set.
    pub async fn result_set(&self, user: UserId) -> Option<Arc<ResultSet>> {
        self.sets.read().await.get(&user).cloned()
    }

    /// Number of users holding a result set.
    pub async fn user_count(&self) -> usize {
        self.sets.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::{candidate, shawshank_candidates};
    use crate::testing::ScriptedCodes;
    use std::collections::HashSet;

    const ALICE: UserId = UserId(1);
    const BOB: UserId = UserId(2);

    #[tokio::test]
    async fn test_register_assigns_distinct_codes() {
        let registry = Registry::new();
        let candidates: Vec<_> = (1..=20)
            .map(|s| candidate(&format!("g{}", s), "t", s))
            .collect();

        let listing = registry.register(ALICE, candidates).await.unwrap();
        let codes: HashSet<_> = listing.entries.iter().map(|(c, _)| *c).collect();

        assert_eq!(listing.kept(), 20);
        assert_eq!(codes.len(), 20);
        let stored: HashSet<_> = registry.result_set(ALICE).await.unwrap().codes().collect();
        assert_eq!(stored, codes);
    }

    #[tokio::test]
    async fn test_register_caps_at_twenty() {
        let registry = Registry::new();
        let candidates: Vec<_> = (1..=30)
            .map(|s| candidate(&format!("g{}", s), "t", s))
            .collect();

        let listing = registry.register(ALICE, candidates).await.unwrap();

        assert_eq!(listing.total, 30);
        let mut seeds: Vec<_> = listing.entries.iter().map(|(_, c)| c.seeders).collect();
        seeds.sort();
        assert_eq!(seeds, (11..=30).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_insertion_order_is_reverse_rank() {
        let registry = Registry::with_generator(ScriptedCodes::new([11111, 22222, 33333]));
        let candidates = vec![
            candidate("a", "mid", 50),
            candidate("b", "top", 90),
            candidate("c", "low", 10),
        ];

        let listing = registry.register(ALICE, candidates).await.unwrap();
        let order: Vec<_> = listing
            .entries
            .iter()
            .map(|(code, c)| (code.value(), c.title.as_str()))
            .collect();

        assert_eq!(order, vec![(11111, "low"), (22222, "mid"), (33333, "top")]);
    }

    #[tokio::test]
    async fn test_new_search_replaces_old_codes() {
        let registry = Registry::with_generator(ScriptedCodes::new([11111, 22222, 33333, 44444]));

        registry
            .register(ALICE, vec![candidate("a", "A", 1), candidate("b", "B", 2)])
            .await
            .unwrap();
        assert!(registry.resolve(ALICE, "11111").await.is_some());

        registry
            .register(ALICE, vec![candidate("c", "C", 1), candidate("d", "D", 2)])
            .await
            .unwrap();

        assert!(registry.resolve(ALICE, "11111").await.is_none());
        assert!(registry.resolve(ALICE, "22222").await.is_none());
        assert_eq!(registry.resolve(ALICE, "33333").await.unwrap().title, "C");
        assert_eq!(registry.resolve(ALICE, "44444").await.unwrap().title, "D");
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let registry = Registry::with_generator(ScriptedCodes::new([11111, 11111]));

        registry
            .register(ALICE, vec![candidate("a", "alice's", 5)])
            .await
            .unwrap();
        assert!(registry.resolve(BOB, "11111").await.is_none());

        registry
            .register(BOB, vec![candidate("b", "bob's", 5)])
            .await
            .unwrap();
        assert_eq!(registry.resolve(ALICE, "11111").await.unwrap().title, "alice's");
        assert_eq!(registry.resolve(BOB, "11111").await.unwrap().title, "bob's");
    }

    #[tokio::test]
    async fn test_collision_redraws() {
        let registry = Registry::with_generator(ScriptedCodes::new([11111, 11111, 11111, 22222]));
        let listing = registry
            .register(ALICE, vec![candidate("a", "A", 1), candidate("b", "B", 2)])
            .await
            .unwrap();

        let codes: Vec<_> = listing.entries.iter().map(|(c, _)| c.value()).collect();
        assert_eq!(codes, vec![11111, 22222]);
    }

    #[tokio::test]
    async fn test_collision_exhaustion_aborts_batch() {
        let registry = Registry::with_generator(ScriptedCodes::new([11111]));

        registry
            .register(ALICE, vec![candidate("old", "old", 3)])
            .await
            .unwrap();

        let result = registry
            .register(ALICE, vec![candidate("a", "A", 1), candidate("b", "B", 2)])
            .await;

        assert_eq!(
            result.unwrap_err(),
            RegistryError::CodesExhausted {
                attempts: MAX_CODE_ATTEMPTS
            }
        );
        assert!(registry.result_set(ALICE).await.is_none());
        assert!(registry.resolve(ALICE, "11111").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_unknown_and_malformed() {
        let registry = Registry::with_generator(ScriptedCodes::new([12345]));
        registry
            .register(ALICE, vec![candidate("a", "A", 1)])
            .await
            .unwrap();

        assert!(registry.resolve(BOB, "12345").await.is_none());
        assert!(registry.resolve(ALICE, "54321").await.is_none());
        assert!(registry.resolve(ALICE, "abc").await.is_none());
        assert!(registry.resolve(ALICE, "").await.is_none());
        assert!(registry.resolve(ALICE, "12345").await.is_some());
    }

    #[tokio::test]
    async fn test_rank_and_register_end_to_end() {
        let registry = Registry::with_generator(ScriptedCodes::new([11111, 22222]));

        let output = registry
            .rank_and_register(ALICE, shawshank_candidates())
            .await
            .unwrap();

        assert!(output.starts_with("Results (2/2)"));
        let low = output
            .find("/get11111 - IPTorrents, Seeds: 42, Peers: 0, Size: 2.71 GB")
            .unwrap();
        let high = output
            .find("/get22222 - 1337x, Seeds: 84, Peers: 15, Size: 2.78 GB")
            .unwrap();
        assert!(low < high);
    }

    #[tokio::test]
    async fn test_zero_seed_entries_not_registered() {
        let registry = Registry::new();
        let listing = registry
            .register(
                ALICE,
                vec![candidate("a", "live", 3), candidate("b", "dead", 0)],
            )
            .await
            .unwrap();

        assert_eq!(listing.kept(), 1);
        assert_eq!(listing.total, 2);
        assert!(listing.to_string().starts_with("Results (1/2)"));
    }

    #[tokio::test]
    async fn test_concurrent_registrations_never_mix_sets() {
        let registry = Arc::new(Registry::new());

        let tasks: Vec<_> = (0..16)
            .map(|round| {
                let registry = Arc::clone(&registry);
                tokio::spawn(async move {
                    let tag = format!("round{}", round);
                    let candidates: Vec<_> = (1..=10)
                        .map(|s| candidate(&format!("{}-{}", tag, s), &tag, s))
                        .collect();
                    registry.register(ALICE, candidates).await.unwrap();
                })
            })
            .collect();
        futures::future::join_all(tasks).await;

        let set = registry.result_set(ALICE).await.unwrap();
        assert_eq!(set.len(), 10);
        let first_title = &set.entries()[0].1.title;
        assert!(set.entries().iter().all(|(_, c)| &c.title == first_title));
        assert_eq!(registry.user_count().await, 1);
    }
}
