//! Jackett search backend implementation.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::IndexerConfig;
use crate::metrics::{SEARCHES_TOTAL, SEARCH_DURATION};

use super::dedup::deduplicate_by_guid;
use super::{Candidate, Indexer, RetrievalMethod, SearchError};

/// Jackett categories searched on every query: movies (2xxx) and TV (5xxx).
pub const SEARCH_CATEGORIES: [u32; 18] = [
    2000, 2010, 2020, 2030, 2040, 2045, 2050, 2060, 2070, 5000, 5010, 5020, 5030, 5040, 5045,
    5060, 5070, 5080,
];

/// Jackett search backend.
pub struct JackettIndexer {
    client: Client,
    config: IndexerConfig,
}

impl JackettIndexer {
    /// Create a new JackettIndexer with the given configuration.
    pub fn new(config: IndexerConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs as u64))
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| SearchError::Unexpected(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Query string pairs for a search.
    fn query_params(&self, term: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("apikey", self.config.api_key.clone()),
            ("Query", term.to_string()),
        ];
        params.extend(
            SEARCH_CATEGORIES
                .iter()
                .map(|cat| ("Category[]", cat.to_string())),
        );
        params
    }

    async fn fetch(&self, term: &str) -> Result<Vec<Candidate>, SearchError> {
        let response = self
            .client
            .get(&self.config.url)
            .query(&self.query_params(term))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SearchError::Timeout
                } else if e.is_connect() {
                    SearchError::Unreachable(e.to_string())
                } else {
                    SearchError::Unexpected(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::HttpError(status.as_u16()));
        }

        let body: JackettResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                SearchError::Timeout
            } else {
                SearchError::Unexpected(format!("Failed to parse response: {}", e))
            }
        })?;

        let raw: Vec<Candidate> = body
            .results
            .unwrap_or_default()
            .into_iter()
            .map(JackettResult::into_candidate)
            .collect();

        debug!(raw = raw.len(), "Jackett returned results");

        Ok(deduplicate_by_guid(raw))
    }
}

#[async_trait]
impl Indexer for JackettIndexer {
    fn name(&self) -> &str {
        "jackett"
    }

    async fn search(&self, term: &str) -> Result<Vec<Candidate>, SearchError> {
        let start = Instant::now();
        debug!(query = %term, "Searching Jackett");

        let result = self.fetch(term).await;

        let elapsed = start.elapsed().as_secs_f64();
        match &result {
            Ok(candidates) => {
                SEARCHES_TOTAL.with_label_values(&["success"]).inc();
                SEARCH_DURATION.with_label_values(&["success"]).observe(elapsed);
                debug!(results = candidates.len(), elapsed, "Search complete");
            }
            Err(e) => {
                SEARCHES_TOTAL.with_label_values(&[e.kind()]).inc();
                SEARCH_DURATION.with_label_values(&[e.kind()]).observe(elapsed);
                warn!(query = %term, error = %e, "Jackett search failed");
            }
        }

        result
    }
}

// Jackett API response types
#[derive(Debug, Deserialize)]
struct JackettResponse {
    #[serde(rename = "Results", default)]
    results: Option<Vec<JackettResult>>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct JackettResult {
    Guid: Option<String>,
    #[serde(default)]
    Title: Option<String>,
    #[serde(default)]
    Tracker: Option<String>,
    Seeders: Option<i64>,
    Peers: Option<i64>,
    Size: Option<i64>,
    MagnetUri: Option<String>,
    Link: Option<String>,
}

impl JackettResult {
    fn into_candidate(self) -> Candidate {
        let title = self.Title.unwrap_or_default();
        // Entries without a Guid fall back to their download location, so they
        // never collapse into each other.
        let guid = self
            .Guid
            .filter(|g| !g.is_empty())
            .or_else(|| self.MagnetUri.clone())
            .or_else(|| self.Link.clone())
            .unwrap_or_else(|| title.clone());

        Candidate {
            guid,
            title,
            tracker: self.Tracker.unwrap_or_default(),
            seeders: self.Seeders.unwrap_or(0).clamp(0, u32::MAX as i64) as u32,
            peers: self.Peers.unwrap_or(0).clamp(0, u32::MAX as i64) as u32,
            size_bytes: self.Size.unwrap_or(0).max(0) as u64,
            retrieval: RetrievalMethod::from_parts(self.MagnetUri, self.Link),
        }
    }
}
