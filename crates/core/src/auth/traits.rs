use async_trait::async_trait;
use thiserror::Error;

use super::types::UserId;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication required")]
    NotAuthenticated,

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("User {0} is not authorized")]
    NotAuthorized(UserId),

    #[error("User store error: {0}")]
    Storage(String),
}

/// Persistent set of authorized chat users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether the user passed the gate before.
    async fn contains(&self, user: UserId) -> bool;

    /// Remember the user. Returns false if it was already known.
    async fn insert(&self, user: UserId) -> Result<bool, AuthError>;
}
