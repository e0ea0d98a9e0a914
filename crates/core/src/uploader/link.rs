//! Following indexer download links.

use async_trait::async_trait;
use reqwest::{header::LOCATION, redirect, Client};
use std::time::Duration;
use tracing::debug;

use super::{FetchError, LinkFetcher, LinkTarget};

/// Fetches `Link` URLs without following redirects.
///
/// Jackett answers magnet-only trackers with a redirect to the magnet URI,
/// so a redirect is reported as `LinkTarget::Magnet` and a 2xx body as a
/// torrent file.
pub struct HttpLinkFetcher {
    client: Client,
}

impl HttpLinkFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Request(e.to_string()))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl LinkFetcher for HttpLinkFetcher {
    async fn fetch(&self, url: &str) -> Result<LinkTarget, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or(FetchError::MissingLocation)?;
            debug!(status = status.as_u16(), "Download link redirected");
            return Ok(LinkTarget::Magnet(location.to_string()));
        }

        if !status.is_success() {
            return Err(FetchError::HttpError(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;
        debug!(bytes = body.len(), "Downloaded torrent file");

        Ok(LinkTarget::TorrentFile(body.to_vec()))
    }
}
