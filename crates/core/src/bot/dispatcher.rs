//! Routes chat messages to command handlers.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::Command;
use crate::auth::{AuthError, ChatUser, SharedSecretGate};
use crate::indexer::{Indexer, RetrievalMethod};
use crate::metrics::COMMANDS_TOTAL;
use crate::registry::Registry;
use crate::uploader::{LinkFetcher, LinkTarget, TorrentUploader, UploadRequest};

pub const NO_RESULTS: &str = "No results found";
pub const GENERIC_FAILURE: &str = "Something went wrong";
pub const UNAUTHORIZED: &str = "Please authorize first with /auth <password>";
const DOWNLOAD_USAGE: &str = "Usage: /download <magnet>";

/// Default label for `/download` uploads.
pub const DEFAULT_MANUAL_LABEL: &str = "Manual upload";

/// A chat message from any transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub user: ChatUser,
    pub text: String,
}

impl IncomingMessage {
    pub fn new(user: ChatUser, text: impl Into<String>) -> Self {
        Self {
            user,
            text: text.into(),
        }
    }
}

/// Label uploads with the tracker, prefixed by the uploader's username.
pub fn upload_label(user: &ChatUser, tracker: &str) -> String {
    match &user.username {
        Some(username) if !username.is_empty() => format!("{}, {}", username, tracker),
        _ => tracker.to_string(),
    }
}

/// Connects the auth gate, indexer, registry and download client.
pub struct Dispatcher {
    gate: SharedSecretGate,
    indexer: Arc<dyn Indexer>,
    registry: Arc<Registry>,
    uploader: Arc<dyn TorrentUploader>,
    links: Arc<dyn LinkFetcher>,
    manual_label: String,
}

impl Dispatcher {
    pub fn new(
        gate: SharedSecretGate,
        indexer: Arc<dyn Indexer>,
        registry: Arc<Registry>,
        uploader: Arc<dyn TorrentUploader>,
        links: Arc<dyn LinkFetcher>,
    ) -> Self {
        Self {
            gate,
            indexer,
            registry,
            uploader,
            links,
            manual_label: DEFAULT_MANUAL_LABEL.to_string(),
        }
    }

    pub fn with_manual_label(mut self, label: impl Into<String>) -> Self {
        self.manual_label = label.into();
        self
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Handle one message. `None` means the message is not a command and
    /// gets no reply.
    pub async fn handle(&self, message: &IncomingMessage) -> Option<String> {
        let command = Command::parse(&message.text)?;
        let user = &message.user;
        debug!(user = %user.id, command = command.name(), "Handling command");

        let (outcome, reply) = match self.gate.require(command.required_role(), user.id).await {
            Ok(()) => ("handled", self.run(user, command.clone()).await),
            Err(AuthError::NotAuthorized(_)) => ("refused", UNAUTHORIZED.to_string()),
            Err(e) => {
                error!(user = %user.id, error = %e, "Authorization check failed");
                ("error", GENERIC_FAILURE.to_string())
            }
        };

        COMMANDS_TOTAL
            .with_label_values(&[command.name(), outcome])
            .inc();
        Some(reply)
    }

    async fn run(&self, user: &ChatUser, command: Command) -> String {
        match command {
            Command::Auth(password) => self.auth(user, &password).await,
            Command::Search(term) => self.search(user, &term).await,
            Command::Get(code) => self.get(user, &code).await,
            Command::Download(magnet) => self.download(user, &magnet).await,
        }
    }

    async fn auth(&self, user: &ChatUser, password: &str) -> String {
        match self.gate.login(user.id, password).await {
            Ok(outcome) => {
                info!(user = %user.id, outcome = ?outcome, "Login attempt");
                outcome.reply().to_string()
            }
            Err(e) => {
                error!(user = %user.id, error = %e, "Failed to store authorized user");
                GENERIC_FAILURE.to_string()
            }
        }
    }

    async fn search(&self, user: &ChatUser, term: &str) -> String {
        let candidates = match self.indexer.search(term).await {
            Ok(candidates) => candidates,
            Err(e) => return e.user_message(),
        };

        if candidates.is_empty() {
            return NO_RESULTS.to_string();
        }

        match self.registry.rank_and_register(user.id, candidates).await {
            Ok(listing) => listing,
            Err(e) => e.user_message().to_string(),
        }
    }

    async fn get(&self, user: &ChatUser, code: &str) -> String {
        let Some(candidate) = self.registry.resolve(user.id, code).await else {
            debug!(user = %user.id, code, "Unknown result code");
            return NO_RESULTS.to_string();
        };

        let label = upload_label(user, &candidate.tracker);
        match candidate.retrieval {
            RetrievalMethod::Magnet(uri) => self.upload(UploadRequest::magnet(uri, label)).await,
            RetrievalMethod::FileLink(url) => match self.links.fetch(&url).await {
                Ok(LinkTarget::Magnet(uri)) => {
                    self.upload(UploadRequest::magnet(uri, label)).await
                }
                Ok(LinkTarget::TorrentFile(data)) => {
                    self.upload(UploadRequest::torrent_file(data, label)).await
                }
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to fetch torrent link");
                    format!(
                        "Something went wrong downloading torrent file. The url was: {}",
                        url
                    )
                }
            },
            RetrievalMethod::None => {
                warn!(guid = %candidate.guid, "Result has neither magnet nor link");
                GENERIC_FAILURE.to_string()
            }
        }
    }

    async fn download(&self, user: &ChatUser, magnet: &str) -> String {
        if magnet.is_empty() {
            return DOWNLOAD_USAGE.to_string();
        }
        let label = upload_label(user, &self.manual_label);
        self.upload(UploadRequest::magnet(magnet, label)).await
    }

    async fn upload(&self, request: UploadRequest) -> String {
        match self.uploader.upload(request).await {
            Ok(status) if status.token().is_empty() => GENERIC_FAILURE.to_string(),
            Ok(status) => status.to_string(),
            Err(e) => e.user_message(),
        }
    }
}
