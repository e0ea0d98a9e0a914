use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    pub indexer: IndexerConfig,
    pub uploader: UploaderConfig,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
}

/// HTTP API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bearer key required by `POST /api/v1/messages` (open when unset)
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            api_key: None,
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    8080
}

/// Shared-secret gate for chat users
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Password users send with `/auth`
    pub password: String,
    /// JSON file holding the ids of authorized users
    #[serde(default = "default_users_file")]
    pub users_file: PathBuf,
}

fn default_users_file() -> PathBuf {
    PathBuf::from("users.json")
}

/// Jackett indexer configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IndexerConfig {
    /// Full results endpoint, e.g. "http://localhost:9117/api/v2.0/indexers/all/results"
    pub url: String,
    /// Jackett API key
    pub api_key: String,
    /// Connect timeout in seconds (default: 3)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u32,
    /// Overall request timeout in seconds (default: 60, Jackett fans out server-side)
    #[serde(default = "default_indexer_timeout")]
    pub timeout_secs: u32,
}

fn default_connect_timeout() -> u32 {
    3
}

fn default_indexer_timeout() -> u32 {
    60
}

/// ruTorrent upload endpoint configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UploaderConfig {
    /// addtorrent.php URL
    pub url: String,
    /// Base64 credentials sent as `Authorization: Basic <token>`
    pub token: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_uploader_timeout")]
    pub timeout_secs: u32,
    /// Label used for `/download` uploads
    #[serde(default = "default_manual_label")]
    pub manual_label: String,
}

fn default_uploader_timeout() -> u32 {
    30
}

fn default_manual_label() -> String {
    "Manual upload".to_string()
}

/// Telegram long-polling transport
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    /// Bot token
    pub token: String,
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    /// getUpdates long-poll timeout in seconds (default: 30)
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u32,
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u32 {
    30
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: SanitizedServerConfig,
    pub indexer: SanitizedIndexerConfig,
    pub uploader: SanitizedUploaderConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telegram: Option<SanitizedTelegramConfig>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub password_configured: bool,
    pub users_file: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub api_key_configured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedIndexerConfig {
    pub url: String,
    pub api_key_configured: bool,
    pub connect_timeout_secs: u32,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedUploaderConfig {
    pub url: String,
    pub token_configured: bool,
    pub timeout_secs: u32,
    pub manual_label: String,
}

/// Telegram config without the bot token
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedTelegramConfig {
    pub api_url: String,
    pub poll_timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                password_configured: !config.auth.password.is_empty(),
                users_file: config.auth.users_file.clone(),
            },
            server: SanitizedServerConfig {
                host: config.server.host,
                port: config.server.port,
                api_key_configured: config.server.api_key.is_some(),
            },
            indexer: SanitizedIndexerConfig {
                url: config.indexer.url.clone(),
                api_key_configured: !config.indexer.api_key.is_empty(),
                connect_timeout_secs: config.indexer.connect_timeout_secs,
                timeout_secs: config.indexer.timeout_secs,
            },
            uploader: SanitizedUploaderConfig {
                url: config.uploader.url.clone(),
                token_configured: !config.uploader.token.is_empty(),
                timeout_secs: config.uploader.timeout_secs,
                manual_label: config.uploader.manual_label.clone(),
            },
            telegram: config.telegram.as_ref().map(|t| SanitizedTelegramConfig {
                api_url: t.api_url.clone(),
                poll_timeout_secs: t.poll_timeout_secs,
            }),
        }
    }
}
