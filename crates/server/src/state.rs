use std::sync::Arc;
use magpie_core::{ApiKey, Config, Dispatcher, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    dispatcher: Arc<Dispatcher>,
    api_key: Option<ApiKey>,
}

impl AppState {
    pub fn new(config: Config, dispatcher: Arc<Dispatcher>) -> Self {
        let api_key = config
            .server
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .map(ApiKey::new);

        Self {
            config,
            dispatcher,
            api_key,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        self.dispatcher.as_ref()
    }

    /// Key guarding the message endpoint, if one is configured.
    pub fn api_key(&self) -> Option<&ApiKey> {
        self.api_key.as_ref()
    }
}
