//! Download client uploads.
//!
//! This module provides a `TorrentUploader` trait for handing magnets and
//! .torrent files to the download client, plus the `LinkFetcher` that turns
//! an indexer download link into one of those.

mod link;
mod metainfo;
mod rutorrent;
mod status;
mod types;

pub use link::HttpLinkFetcher;
pub use metainfo::torrent_display_name;
pub use rutorrent::RuTorrentUploader;
pub use status::{parse_result_token, parse_result_url};
pub use types::*;
