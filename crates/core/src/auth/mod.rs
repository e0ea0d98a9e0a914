mod api_key;
mod gate;
mod store;
mod traits;
mod types;

pub use api_key::ApiKey;
pub use gate::SharedSecretGate;
pub use store::{JsonUserStore, MemoryUserStore};
pub use traits::*;
pub use types::*;

use std::sync::Arc;

use crate::config::AuthConfig;

/// Build the chat gate from config, loading the users file.
pub async fn create_gate(config: &AuthConfig) -> Result<SharedSecretGate, AuthError> {
    let store = JsonUserStore::open(&config.users_file).await?;
    Ok(SharedSecretGate::new(config.password.clone(), Arc::new(store)))
}
