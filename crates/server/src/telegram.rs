//! Telegram Bot API transport (long polling).

use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use magpie_core::config::TelegramConfig;
use magpie_core::{ChatUser, Dispatcher, IncomingMessage};

use crate::metrics::TELEGRAM_REQUESTS_TOTAL;

/// Telegram rejects messages longer than this many characters.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Pause after a failed poll.
const RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Request(String),

    #[error("Telegram API error: {0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

impl Message {
    /// Chat id to answer in, plus the dispatcher's view of the message.
    /// `None` for non-text messages.
    pub fn into_incoming(self) -> Option<(i64, IncomingMessage)> {
        let text = self.text?;
        let user = match self.from {
            Some(from) => {
                let user = ChatUser::new(from.id);
                match from.username {
                    Some(name) if !name.is_empty() => user.with_username(name),
                    _ => user,
                }
            }
            None => ChatUser::new(self.chat.id),
        };
        Some((self.chat.id, IncomingMessage::new(user, text)))
    }
}

#[derive(Serialize)]
struct GetUpdates {
    offset: i64,
    timeout: u32,
    allowed_updates: [&'static str; 1],
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

/// Minimal Bot API client: `getUpdates` and `sendMessage`.
pub struct TelegramClient {
    client: Client,
    base_url: String,
    poll_timeout_secs: u32,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        // The HTTP timeout has to outlast the long poll.
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs as u64 + 10))
            .build()
            .map_err(|e| TelegramError::Request(e.to_string()))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/bot{}",
                config.api_url.trim_end_matches('/'),
                config.token
            ),
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    async fn call<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &'static str,
        body: &B,
    ) -> Result<T, TelegramError> {
        let result = self.call_inner(method, body).await;
        let outcome = if result.is_ok() { "ok" } else { "error" };
        TELEGRAM_REQUESTS_TOTAL
            .with_label_values(&[method, outcome])
            .inc();
        result
    }

    async fn call_inner<B: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        body: &B,
    ) -> Result<T, TelegramError> {
        let response: ApiResponse<T> = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(body)
            .send()
            .await
            .map_err(|e| TelegramError::Request(e.without_url().to_string()))?
            .json()
            .await
            .map_err(|e| TelegramError::Request(e.without_url().to_string()))?;

        match (response.ok, response.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(TelegramError::Api(
                response
                    .description
                    .unwrap_or_else(|| format!("{} failed", method)),
            )),
        }
    }

    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: self.poll_timeout_secs,
                allowed_updates: ["message"],
            },
        )
        .await
    }

    /// Send `text`, split into several messages when it is too long.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        for chunk in split_message(text, MAX_MESSAGE_CHARS) {
            let _sent: serde_json::Value = self
                .call("sendMessage", &SendMessage { chat_id, text: chunk })
                .await?;
        }
        Ok(())
    }
}

/// Split `text` into chunks of at most `limit` characters, preferring the
/// blank lines between listing entries as cut points.
pub fn split_message(text: &str, limit: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > limit {
        let hard_cut = rest
            .char_indices()
            .nth(limit)
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let cut = rest[..hard_cut]
            .rfind("\n\n")
            .filter(|&i| i > 0)
            .unwrap_or(hard_cut);

        chunks.push(&rest[..cut]);
        rest = rest[cut..].trim_start_matches('\n');
    }

    if !rest.is_empty() {
        chunks.push(rest);
    }
    chunks
}

/// Poll for updates until `shutdown` fires, handling each message on its
/// own task.
pub async fn run_poller(
    client: Arc<TelegramClient>,
    dispatcher: Arc<Dispatcher>,
    mut shutdown: broadcast::Receiver<()>,
) {
    info!("Telegram poller started");
    let mut offset = 0;

    loop {
        let polled = tokio::select! {
            _ = shutdown.recv() => break,
            polled = client.get_updates(offset) => polled,
        };

        let updates = match polled {
            Ok(updates) => updates,
            Err(e) => {
                warn!(error = %e, "Telegram poll failed, retrying");
                tokio::select! {
                    _ = shutdown.recv() => break,
                    _ = tokio::time::sleep(RETRY_DELAY) => continue,
                }
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            let Some((chat_id, message)) = update.message.and_then(Message::into_incoming) else {
                continue;
            };

            let client = Arc::clone(&client);
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move {
                let Some(reply) = dispatcher.handle(&message).await else {
                    return;
                };
                if let Err(e) = client.send_message(chat_id, &reply).await {
                    warn!(chat_id, error = %e, "Failed to send Telegram reply");
                } else {
                    debug!(chat_id, "Sent Telegram reply");
                }
            });
        }
    }

    info!("Telegram poller stopped");
}
