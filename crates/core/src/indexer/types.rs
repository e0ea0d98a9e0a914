//! Types for the indexer query component.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a candidate can be handed to the download client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RetrievalMethod {
    /// Magnet URI, uploaded as-is.
    Magnet(String),
    /// HTTP link to a .torrent file (may redirect to a magnet).
    FileLink(String),
    /// The indexer supplied neither.
    None,
}

impl RetrievalMethod {
    /// Pick the retrieval method from the optional indexer fields.
    ///
    /// A magnet wins over a link; empty strings count as absent.
    pub fn from_parts(magnet_uri: Option<String>, link: Option<String>) -> Self {
        match (non_empty(magnet_uri), non_empty(link)) {
            (Some(magnet), _) => RetrievalMethod::Magnet(magnet),
            (None, Some(link)) => RetrievalMethod::FileLink(link),
            (None, None) => RetrievalMethod::None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A single search hit, after deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    /// Indexer-wide origin identifier, the deduplication key.
    pub guid: String,
    pub title: String,
    /// Tracker that listed the torrent, also used as the upload label.
    pub tracker: String,
    pub seeders: u32,
    pub peers: u32,
    pub size_bytes: u64,
    pub retrieval: RetrievalMethod,
}

/// Errors that can occur during a search.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Indexer request timed out")]
    Timeout,

    #[error("Indexer unreachable: {0}")]
    Unreachable(String),

    #[error("Indexer returned HTTP {0}")]
    HttpError(u16),

    #[error("Unexpected indexer failure: {0}")]
    Unexpected(String),
}

impl SearchError {
    /// Short plain-text reply for the chat user.
    ///
    /// `Unexpected` carries operator detail that is never shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            SearchError::Timeout => "Jackett timed out".to_string(),
            SearchError::Unreachable(_) => "Jackett didn't respond".to_string(),
            SearchError::HttpError(status) => format!("Jackett returned an error: {}", status),
            SearchError::Unexpected(_) => "Something went wrong".to_string(),
        }
    }

    /// Label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Timeout => "timeout",
            SearchError::Unreachable(_) => "unreachable",
            SearchError::HttpError(_) => "http_error",
            SearchError::Unexpected(_) => "unexpected",
        }
    }
}

/// Trait for torrent indexer backends.
#[async_trait]
pub trait Indexer: Send + Sync {
    /// Provider name for logging.
    fn name(&self) -> &str;

    /// Run one search. An empty list is a successful search with no hits.
    async fn search(&self, term: &str) -> Result<Vec<Candidate>, SearchError>;
}
