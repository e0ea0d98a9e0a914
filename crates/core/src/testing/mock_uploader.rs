//! Mock download client for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::uploader::{TorrentUploader, UploadError, UploadRequest, UploadStatus};

/// Mock implementation of the TorrentUploader trait.
///
/// Records every request and answers with a configurable status token.
#[derive(Debug)]
pub struct MockUploader {
    requests: Arc<RwLock<Vec<UploadRequest>>>,
    token: Arc<RwLock<String>>,
    /// If set, the next upload will fail with this error.
    next_error: Arc<RwLock<Option<UploadError>>>,
}

impl Default for MockUploader {
    fn default() -> Self {
        Self::new()
    }
}

impl MockUploader {
    /// Uploader that reports "Success".
    pub fn new() -> Self {
        Self {
            requests: Arc::new(RwLock::new(Vec::new())),
            token: Arc::new(RwLock::new("Success".to_string())),
            next_error: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn set_token(&self, token: impl Into<String>) {
        *self.token.write().await = token.into();
    }

    pub async fn set_next_error(&self, error: UploadError) {
        *self.next_error.write().await = Some(error);
    }

    pub async fn recorded_requests(&self) -> Vec<UploadRequest> {
        self.requests.read().await.clone()
    }
}

#[async_trait]
impl TorrentUploader for MockUploader {
    fn name(&self) -> &str {
        "mock"
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadStatus, UploadError> {
        self.requests.write().await.push(request);

        if let Some(error) = self.next_error.write().await.take() {
            return Err(error);
        }

        Ok(UploadStatus::new(self.token.read().await.clone()))
    }
}
