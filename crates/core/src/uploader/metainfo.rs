//! Torrent metainfo, decoded just far enough to name the upload.
//!
//! Uses librqbit-core to parse the bencoded .torrent data.

use librqbit_core::torrent_metainfo::{torrent_from_bytes, TorrentMetaV1Owned};

use super::UploadError;

/// File name used when the torrent carries no `info.name`.
const FALLBACK_NAME: &str = "upload.torrent";

/// Percent-encoded `info.name` of a .torrent file.
pub fn torrent_display_name(bytes: &[u8]) -> Result<String, UploadError> {
    let torrent: TorrentMetaV1Owned =
        torrent_from_bytes(bytes).map_err(|e| UploadError::InvalidTorrent(e.to_string()))?;

    let name = torrent
        .info
        .name
        .as_ref()
        .map(|b| String::from_utf8_lossy(b.as_ref()).into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    Ok(urlencoding::encode(&name).into_owned())
}
