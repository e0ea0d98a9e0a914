use serde::{Deserialize, Serialize};
use std::fmt;

/// Chat-platform user id (Telegram ids are 64-bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who sent a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    pub id: UserId,
    /// Platform username, used to prefix upload labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl ChatUser {
    pub fn new(id: i64) -> Self {
        Self {
            id: UserId(id),
            username: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }
}

/// Access level a command route requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Anyone who can reach the bot.
    Guest,
    /// Users who passed the shared-secret gate.
    Member,
}

/// Result of an `/auth` attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    AlreadyAuthorized,
    Authorized,
    WrongPassword,
}

impl LoginOutcome {
    pub fn reply(&self) -> &'static str {
        match self {
            LoginOutcome::AlreadyAuthorized => "Already authorized",
            LoginOutcome::Authorized => "Authorized",
            LoginOutcome::WrongPassword => "Wrong password",
        }
    }
}
