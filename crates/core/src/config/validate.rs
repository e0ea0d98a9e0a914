use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Password, indexer URL and uploader URL are set
/// - Timeouts are positive
/// - Telegram token is set when the transport is enabled
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(invalid("server.port cannot be 0"));
    }

    if config.auth.password.trim().is_empty() {
        return Err(invalid("auth.password cannot be empty"));
    }

    if config.indexer.url.trim().is_empty() {
        return Err(invalid("indexer.url cannot be empty"));
    }
    if config.indexer.connect_timeout_secs == 0 || config.indexer.timeout_secs == 0 {
        return Err(invalid("indexer timeouts must be greater than 0"));
    }

    if config.uploader.url.trim().is_empty() {
        return Err(invalid("uploader.url cannot be empty"));
    }
    if config.uploader.timeout_secs == 0 {
        return Err(invalid("uploader.timeout_secs must be greater than 0"));
    }

    if let Some(telegram) = &config.telegram {
        if telegram.token.trim().is_empty() {
            return Err(invalid("telegram.token cannot be empty"));
        }
    }

    Ok(())
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::ValidationError(message.to_string())
}
