//! User stores backing the shared-secret gate.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{AuthError, UserId, UserStore};

/// User store persisted as a JSON array of ids.
///
/// The whole file is rewritten on every new user; writes happen under the
/// write lock so concurrent logins cannot lose each other's ids.
pub struct JsonUserStore {
    path: PathBuf,
    users: RwLock<HashSet<UserId>>,
}

impl JsonUserStore {
    /// Load the store from `path`. A missing file is an empty store.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref().to_path_buf();

        let users: HashSet<UserId> = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let ids: Vec<UserId> = serde_json::from_slice(&bytes).map_err(|e| {
                    AuthError::Storage(format!("Invalid users file {:?}: {}", path, e))
                })?;
                ids.into_iter().collect()
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = ?path, "Users file not found, starting with no authorized users");
                HashSet::new()
            }
            Err(e) => {
                return Err(AuthError::Storage(format!(
                    "Failed to read users file {:?}: {}",
                    path, e
                )))
            }
        };

        debug!(path = ?path, users = users.len(), "Loaded user store");

        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for JsonUserStore {
    async fn contains(&self, user: UserId) -> bool {
        self.users.read().await.contains(&user)
    }

    async fn insert(&self, user: UserId) -> Result<bool, AuthError> {
        let mut users = self.users.write().await;
        if !users.insert(user) {
            return Ok(false);
        }

        let mut ids: Vec<UserId> = users.iter().copied().collect();
        ids.sort();
        let json = serde_json::to_vec(&ids).map_err(|e| AuthError::Storage(e.to_string()))?;

        if let Err(e) = tokio::fs::write(&self.path, json).await {
            users.remove(&user);
            return Err(AuthError::Storage(format!(
                "Failed to write users file {:?}: {}",
                self.path, e
            )));
        }

        info!(user = %user, "Authorized new user");
        Ok(true)
    }
}

/// In-memory user store, for tests and ephemeral deployments.
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashSet<UserId>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = UserId>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().collect()),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn contains(&self, user: UserId) -> bool {
        self.users.read().await.contains(&user)
    }

    async fn insert(&self, user: UserId) -> Result<bool, AuthError> {
        Ok(self.users.write().await.insert(user))
    }
}
