use std::io::Write;
use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use tempfile::{NamedTempFile, TempDir};
use tokio::time::{sleep, timeout};

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a minimal valid config (no Telegram, HTTP API only)
fn minimal_config(port: u16, users_file: &Path, api_key: Option<&str>) -> String {
    let api_key_line = api_key
        .map(|key| format!("api_key = \"{}\"", key))
        .unwrap_or_default();
    format!(
        r#"
[auth]
password = "hunter2"
users_file = "{}"

[server]
host = "127.0.0.1"
port = {}
{}

[indexer]
url = "http://127.0.0.1:9/api/v2.0/indexers/all/results"
api_key = "jackett-key"

[uploader]
url = "http://127.0.0.1:9/php/addtorrent.php"
token = "dXNlcjpwYXNz"
"#,
        users_file.display(),
        port,
        api_key_line
    )
}

struct RunningServer {
    child: tokio::process::Child,
    port: u16,
    _config: NamedTempFile,
    dir: TempDir,
}

impl RunningServer {
    fn url(&self, path: &str) -> String {
        format!("http://127.0.0.1:{}{}", self.port, path)
    }
}

/// Write a config, spawn the server and wait until it answers
async fn start_server(api_key: Option<&str>) -> RunningServer {
    let port = get_available_port();
    let dir = tempfile::tempdir().unwrap();
    let users_file = dir.path().join("users.json");

    let mut config = NamedTempFile::new().unwrap();
    config
        .write_all(minimal_config(port, &users_file, api_key).as_bytes())
        .unwrap();
    config.flush().unwrap();

    let child = tokio::process::Command::new(env!("CARGO_BIN_EXE_magpie"))
        .env("MAGPIE_CONFIG", config.path())
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server");

    let server = RunningServer {
        child,
        port,
        _config: config,
        dir,
    };
    assert!(
        wait_for_server(port, 100).await,
        "Server did not start in time"
    );
    server
}

/// Wait for server to be ready
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if client
            .get(format!("http://127.0.0.1:{}/api/v1/health", port))
            .send()
            .await
            .is_ok()
        {
            return true;
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut server = start_server(None).await;

    let response = Client::new()
        .get(server.url("/api/v1/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let json: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["status"], "ok");

    server.child.kill().await.ok();
}

#[tokio::test]
async fn test_config_endpoint_returns_sanitized() {
    let mut server = start_server(Some("api-secret")).await;

    let response = Client::new()
        .get(server.url("/api/v1/config"))
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());

    let text = response.text().await.unwrap();
    assert!(!text.contains("hunter2"));
    assert!(!text.contains("jackett-key"));
    assert!(!text.contains("api-secret"));

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["server"]["port"], server.port);
    assert_eq!(json["auth"]["password_configured"], true);
    assert_eq!(json["uploader"]["manual_label"], "Manual upload");

    server.child.kill().await.ok();
}

#[tokio::test]
async fn test_auth_over_http_persists_user() {
    let mut server = start_server(Some("api-secret")).await;
    let client = Client::new();

    let response = client
        .post(server.url("/api/v1/messages"))
        .json(&json!({ "user_id": 7, "text": "/auth hunter2" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = client
        .post(server.url("/api/v1/messages"))
        .bearer_auth("api-secret")
        .json(&json!({ "user_id": 7, "text": "/auth hunter2" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["reply"], "Authorized");

    let stored = std::fs::read_to_string(server.dir.path().join("users.json")).unwrap();
    let users: Vec<i64> = serde_json::from_str(&stored).unwrap();
    assert_eq!(users, vec![7]);

    // The indexer address is dead, so a search reports it.
    let response = client
        .post(server.url("/api/v1/messages"))
        .header("X-API-Key", "api-secret")
        .json(&json!({ "user_id": 7, "text": "/search dune" }))
        .send()
        .await
        .unwrap();
    let json: serde_json::Value = response.json().await.unwrap();
    assert_eq!(json["reply"], "Jackett didn't respond");

    server.child.kill().await.ok();
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let mut server = start_server(None).await;

    let text = Client::new()
        .get(server.url("/metrics"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(text.contains("magpie_registry_users"));

    server.child.kill().await.ok();
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_magpie"))
            .env("MAGPIE_CONFIG", "/nonexistent/config.toml")
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_missing_auth_section_exits_with_error() {
    let config_without_auth = r#"
[server]
port = 8080

[indexer]
url = "http://127.0.0.1:9117"
api_key = "k"

[uploader]
url = "http://127.0.0.1/php/addtorrent.php"
token = "t"
"#;

    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(config_without_auth.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_magpie"))
            .env("MAGPIE_CONFIG", temp_file.path())
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}
