//! Mock download-link resolver for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::uploader::{FetchError, LinkFetcher, LinkTarget};

/// Mock implementation of the LinkFetcher trait.
///
/// Unregistered URLs fail with HTTP 404.
#[derive(Debug, Default)]
pub struct MockLinkFetcher {
    targets: Arc<RwLock<HashMap<String, LinkTarget>>>,
    fetched: Arc<RwLock<Vec<String>>>,
}

impl MockLinkFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_target(&self, url: impl Into<String>, target: LinkTarget) {
        self.targets.write().await.insert(url.into(), target);
    }

    pub async fn fetched_urls(&self) -> Vec<String> {
        self.fetched.read().await.clone()
    }
}

#[async_trait]
impl LinkFetcher for MockLinkFetcher {
    async fn fetch(&self, url: &str) -> Result<LinkTarget, FetchError> {
        self.fetched.write().await.push(url.to_string());

        self.targets
            .read()
            .await
            .get(url)
            .cloned()
            .ok_or(FetchError::HttpError(404))
    }
}
