//! Mock indexer for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::indexer::{Candidate, Indexer, SearchError};

/// Mock implementation of the Indexer trait.
///
/// Returns configurable results, records search terms and can be told to
/// fail the next search.
#[derive(Debug, Default)]
pub struct MockIndexer {
    /// Configured results to return.
    results: Arc<RwLock<Vec<Candidate>>>,
    /// Recorded search terms.
    searches: Arc<RwLock<Vec<String>>>,
    /// If set, the next search will fail with this error.
    next_error: Arc<RwLock<Option<SearchError>>>,
}

impl MockIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(results: Vec<Candidate>) -> Self {
        Self {
            results: Arc::new(RwLock::new(results)),
            ..Self::default()
        }
    }

    pub async fn set_results(&self, results: Vec<Candidate>) {
        *self.results.write().await = results;
    }

    pub async fn set_next_error(&self, error: SearchError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn recorded_searches(&self) -> Vec<String> {
        self.searches.read().await.clone()
    }
}

#[async_trait]
impl Indexer for MockIndexer {
    fn name(&self) -> &str {
        "mock"
    }

    async fn search(&self, term: &str) -> Result<Vec<Candidate>, SearchError> {
        self.searches.write().await.push(term.to_string());

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(self.results.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures::candidate;

    #[tokio::test]
    async fn test_next_error_is_one_shot() {
        let indexer = MockIndexer::with_results(vec![candidate("a", "A", 1)]);
        indexer.set_next_error(SearchError::Timeout).await;

        assert!(matches!(indexer.search("x").await, Err(SearchError::Timeout)));
        assert_eq!(indexer.search("y").await.unwrap().len(), 1);
        assert_eq!(indexer.recorded_searches().await, vec!["x", "y"]);
    }
}
