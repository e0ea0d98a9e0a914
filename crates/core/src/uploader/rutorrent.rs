//! ruTorrent upload backend (`php/addtorrent.php`).

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, multipart, Client, Response};
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::config::UploaderConfig;
use crate::metrics::UPLOADS_TOTAL;

use super::metainfo::torrent_display_name;
use super::status::parse_result_token;
use super::{TorrentUploader, UploadError, UploadRequest, UploadStatus};

/// ruTorrent upload client.
///
/// addtorrent.php answers with a redirect whose query string carries the
/// verdict as `result[]=Success|Failure`.
pub struct RuTorrentUploader {
    client: Client,
    config: UploaderConfig,
}

impl RuTorrentUploader {
    pub fn new(config: UploaderConfig) -> Result<Self, UploadError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| UploadError::Unexpected(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn authorization(&self) -> String {
        format!("Basic {}", self.config.token)
    }

    async fn post_magnet(&self, uri: &str, label: &str) -> Result<Response, UploadError> {
        self.client
            .post(&self.config.url)
            .header(AUTHORIZATION, self.authorization())
            .query(&[("label", label)])
            .form(&[("url", uri)])
            .send()
            .await
            .map_err(UploadError::from_reqwest)
    }

    async fn post_torrent_file(&self, data: Vec<u8>, label: &str) -> Result<Response, UploadError> {
        let file_name = torrent_display_name(&data)?;
        debug!(file_name = %file_name, "Uploading torrent file");

        let part = multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str("application/x-bittorrent")
            .map_err(|e| UploadError::InvalidTorrent(e.to_string()))?;
        let form = multipart::Form::new().part("torrent_file", part);

        self.client
            .post(&self.config.url)
            .header(AUTHORIZATION, self.authorization())
            .query(&[("label", label)])
            .multipart(form)
            .send()
            .await
            .map_err(UploadError::from_reqwest)
    }

    async fn send(&self, request: UploadRequest) -> Result<UploadStatus, UploadError> {
        let response = match request {
            UploadRequest::Magnet { uri, label } => self.post_magnet(&uri, &label).await?,
            UploadRequest::TorrentFile { data, label } => {
                self.post_torrent_file(data, &label).await?
            }
        };

        let status = response.status();
        if !status.is_success() {
            return Err(UploadError::HttpError(status.as_u16()));
        }

        parse_result_token(response.url())
    }
}

#[async_trait]
impl TorrentUploader for RuTorrentUploader {
    fn name(&self) -> &str {
        "rutorrent"
    }

    async fn upload(&self, request: UploadRequest) -> Result<UploadStatus, UploadError> {
        let kind = request.kind();
        debug!(kind, label = %request.label(), "Uploading to ruTorrent");

        let result = self.send(request).await;

        match &result {
            Ok(status) => {
                let outcome = if status.is_success() { "success" } else { "failure" };
                UPLOADS_TOTAL.with_label_values(&[kind, outcome]).inc();
                debug!(kind, token = %status, "ruTorrent upload finished");
            }
            Err(e @ UploadError::MissingResultToken(_)) => {
                UPLOADS_TOTAL.with_label_values(&[kind, e.kind()]).inc();
                error!(kind, error = %e, "ruTorrent response did not carry a result token");
            }
            Err(e) => {
                UPLOADS_TOTAL.with_label_values(&[kind, e.kind()]).inc();
                warn!(kind, error = %e, "ruTorrent upload failed");
            }
        }

        result
    }
}
