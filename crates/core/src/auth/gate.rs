//! Shared-secret gate for chat commands.

use std::sync::Arc;
use tracing::{debug, warn};

use super::api_key::constant_time_eq;
use super::{AuthError, LoginOutcome, Role, UserId, UserStore};

/// Admits chat users who know the configured password.
pub struct SharedSecretGate {
    password: String,
    store: Arc<dyn UserStore>,
}

impl SharedSecretGate {
    pub fn new(password: impl Into<String>, store: Arc<dyn UserStore>) -> Self {
        Self {
            password: password.into(),
            store,
        }
    }

    /// Handle an `/auth <password>` attempt.
    pub async fn login(&self, user: UserId, argument: &str) -> Result<LoginOutcome, AuthError> {
        if self.store.contains(user).await {
            return Ok(LoginOutcome::AlreadyAuthorized);
        }

        if !constant_time_eq(argument.trim().as_bytes(), self.password.as_bytes()) {
            warn!(user = %user, "Rejected login with wrong password");
            return Ok(LoginOutcome::WrongPassword);
        }

        self.store.insert(user).await?;
        Ok(LoginOutcome::Authorized)
    }

    /// Check that `user` may run a route requiring `role`.
    pub async fn require(&self, role: Role, user: UserId) -> Result<(), AuthError> {
        match role {
            Role::Guest => Ok(()),
            Role::Member => {
                if self.store.contains(user).await {
                    Ok(())
                } else {
                    debug!(user = %user, "Member route refused");
                    Err(AuthError::NotAuthorized(user))
                }
            }
        }
    }
}
