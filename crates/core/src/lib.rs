pub mod auth;
pub mod bot;
pub mod config;
pub mod indexer;
pub mod metrics;
pub mod registry;
pub mod testing;
pub mod uploader;

pub use auth::{
    create_gate, ApiKey, AuthError, ChatUser, JsonUserStore, LoginOutcome, MemoryUserStore, Role,
    SharedSecretGate, UserId, UserStore,
};
pub use bot::{Command, Dispatcher, IncomingMessage};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use indexer::{Candidate, Indexer, JackettIndexer, RetrievalMethod, SearchError};
pub use registry::{Listing, ReferenceCode, Registry, RegistryError};
pub use uploader::{
    HttpLinkFetcher, LinkFetcher, LinkTarget, RuTorrentUploader, TorrentUploader, UploadError,
    UploadRequest, UploadStatus,
};
