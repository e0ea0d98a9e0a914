//! Types for uploads to the download client.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while handing a torrent to the download client.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Upload request timed out")]
    Timeout,

    #[error("Download client unreachable: {0}")]
    Unreachable(String),

    #[error("Download client returned HTTP {0}")]
    HttpError(u16),

    /// The redirect target carried no `result[]` token. The upload API
    /// contract changed; never treat this as success.
    #[error("No result[] token in upload response URL: {0}")]
    MissingResultToken(String),

    #[error("Invalid torrent data: {0}")]
    InvalidTorrent(String),

    #[error("Unexpected upload failure: {0}")]
    Unexpected(String),
}

impl UploadError {
    /// Short plain-text reply for the chat user.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::HttpError(status) => format!("Error: {}", status),
            _ => "Something went wrong".to_string(),
        }
    }

    /// Label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::Timeout => "timeout",
            UploadError::Unreachable(_) => "unreachable",
            UploadError::HttpError(_) => "http_error",
            UploadError::MissingResultToken(_) => "missing_result_token",
            UploadError::InvalidTorrent(_) => "invalid_torrent",
            UploadError::Unexpected(_) => "unexpected",
        }
    }

    pub(crate) fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UploadError::Timeout
        } else if e.is_connect() {
            UploadError::Unreachable(e.to_string())
        } else {
            UploadError::Unexpected(e.to_string())
        }
    }
}

/// Request to add a torrent to the download client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadRequest {
    /// Add via magnet URI.
    Magnet { uri: String, label: String },
    /// Add via .torrent file contents.
    TorrentFile { data: Vec<u8>, label: String },
}

impl UploadRequest {
    pub fn magnet(uri: impl Into<String>, label: impl Into<String>) -> Self {
        UploadRequest::Magnet {
            uri: uri.into(),
            label: label.into(),
        }
    }

    pub fn torrent_file(data: Vec<u8>, label: impl Into<String>) -> Self {
        UploadRequest::TorrentFile {
            data,
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            UploadRequest::Magnet { label, .. } | UploadRequest::TorrentFile { label, .. } => label,
        }
    }

    /// Label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            UploadRequest::Magnet { .. } => "magnet",
            UploadRequest::TorrentFile { .. } => "torrent_file",
        }
    }
}

/// Status token the download client reported for an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadStatus {
    token: String,
}

impl UploadStatus {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into().trim().to_string(),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_success(&self) -> bool {
        self.token.eq_ignore_ascii_case("success")
    }
}

impl fmt::Display for UploadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token)
    }
}

/// Trait for download client upload backends.
#[async_trait]
pub trait TorrentUploader: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Upload a magnet or torrent file and report the client's verdict.
    async fn upload(&self, request: UploadRequest) -> Result<UploadStatus, UploadError>;
}

/// What a torrent download link pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkTarget {
    /// The link redirected to a magnet URI.
    Magnet(String),
    /// The link served a .torrent file.
    TorrentFile(Vec<u8>),
}

/// Errors while following a torrent download link.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(String),

    #[error("Link returned HTTP {0}")]
    HttpError(u16),

    #[error("Redirect without a Location header")]
    MissingLocation,
}

/// Resolves an indexer download link into something uploadable.
#[async_trait]
pub trait LinkFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<LinkTarget, FetchError>;
}
