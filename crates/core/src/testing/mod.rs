//! Testing utilities and mock implementations.
//!
//! Mocks for every external service trait, so the bot can be exercised
//! end to end without Jackett or ruTorrent.
//!
//! # Example
//!
//! ```rust,ignore
//! use magpie_core::testing::{fixtures, MockIndexer, MockUploader};
//!
//! let indexer = MockIndexer::with_results(fixtures::shawshank_candidates());
//! let uploader = MockUploader::new();
//! uploader.set_token("Failure").await;
//! ```

mod mock_indexer;
mod mock_link_fetcher;
mod mock_uploader;

pub use mock_indexer::MockIndexer;
pub use mock_link_fetcher::MockLinkFetcher;
pub use mock_uploader::MockUploader;

use std::sync::Mutex;

use crate::registry::{CodeGenerator, ReferenceCode};

/// Code generator that replays a fixed script.
///
/// Yields the scripted values in order, then repeats the last one forever,
/// which makes collision exhaustion easy to provoke.
#[derive(Debug)]
pub struct ScriptedCodes {
    script: Mutex<(Vec<ReferenceCode>, usize)>,
}

impl ScriptedCodes {
    /// Panics on an empty script or a value outside the code range.
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        let codes: Vec<_> = values
            .into_iter()
            .map(|v| ReferenceCode::new(v).expect("scripted code out of range"))
            .collect();
        assert!(!codes.is_empty(), "scripted codes must not be empty");
        Self {
            script: Mutex::new((codes, 0)),
        }
    }
}

impl CodeGenerator for ScriptedCodes {
    fn generate(&self) -> ReferenceCode {
        let mut guard = self.script.lock().expect("scripted codes poisoned");
        let (codes, next) = &mut *guard;
        let code = codes[(*next).min(codes.len() - 1)];
        *next += 1;
        code
    }
}

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::indexer::{Candidate, RetrievalMethod};

    /// A candidate with reasonable defaults.
    pub fn candidate(guid: &str, title: &str, seeders: u32) -> Candidate {
        Candidate {
            guid: guid.to_string(),
            title: title.to_string(),
            tracker: "mock-tracker".to_string(),
            seeders,
            peers: 1,
            size_bytes: 1024 * 1024 * 700,
            retrieval: RetrievalMethod::Magnet(format!("magnet:?xt=urn:btih:{}", guid)),
        }
    }

    /// A candidate only reachable through a download link.
    pub fn link_candidate(guid: &str, title: &str, seeders: u32, link: &str) -> Candidate {
        Candidate {
            retrieval: RetrievalMethod::FileLink(link.to_string()),
            ..candidate(guid, title, seeders)
        }
    }

    /// Two real-world hits for "the shawshank redemption".
    pub fn shawshank_candidates() -> Vec<Candidate> {
        vec![
            Candidate {
                guid: "https://1337x.to/torrent/4467433/".to_string(),
                title: "The Shawshank Redemption 1994 REMASTERED 1080p BluRay H264 AAC R4RBG TGx"
                    .to_string(),
                tracker: "1337x".to_string(),
                seeders: 84,
                peers: 15,
                size_bytes: 2989297152,
                retrieval: RetrievalMethod::FileLink(
                    "http://jackett:9117/dl/1337x/?jackett_apikey=key&path=abc".to_string(),
                ),
            },
            Candidate {
                guid: "https://iptorrents.com/details.php?id=3351231".to_string(),
                title: "The Shawshank Redemption 1994 REMASTERED 1080p BluRay H264 AAC-LAMA"
                    .to_string(),
                tracker: "IPTorrents".to_string(),
                seeders: 42,
                peers: 0,
                size_bytes: 2909840384,
                retrieval: RetrievalMethod::FileLink(
                    "http://jackett:9117/dl/iptorrents/?jackett_apikey=key&path=def".to_string(),
                ),
            },
        ]
    }

    /// Minimal single-file .torrent with the given `info.name`.
    pub fn torrent_file(name: &str) -> Vec<u8> {
        let announce = "http://tracker.example/announce";
        let mut out = Vec::new();
        out.extend_from_slice(format!("d8:announce{}:{}", announce.len(), announce).as_bytes());
        out.extend_from_slice(b"4:infod6:lengthi1048576e");
        out.extend_from_slice(format!("4:name{}:{}", name.len(), name).as_bytes());
        out.extend_from_slice(b"12:piece lengthi262144e6:pieces20:");
        out.extend_from_slice(&[0xab; 20]);
        out.extend_from_slice(b"ee");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_codes_repeat_last() {
        let codes = ScriptedCodes::new([11111, 22222]);
        let drawn: Vec<_> = (0..4).map(|_| codes.generate().value()).collect();
        assert_eq!(drawn, vec![11111, 22222, 22222, 22222]);
    }
}
