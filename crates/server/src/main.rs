mod api;
mod metrics;
mod state;
mod telegram;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use magpie_core::registry::Registry;
use magpie_core::{
    create_gate, load_config, validate_config, Dispatcher, HttpLinkFetcher, JackettIndexer,
    RuTorrentUploader,
};

use api::create_router;
use state::AppState;
use telegram::{run_poller, TelegramClient};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path
    let config_path = std::env::var("MAGPIE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    let config_json = serde_json::to_string(&config).unwrap_or_default();
    let config_hash = format!("{:x}", Sha256::digest(config_json.as_bytes()));
    info!(
        version = VERSION,
        config_hash = &config_hash[..16],
        "Configuration loaded successfully"
    );
    info!("Jackett endpoint: {}", config.indexer.url);
    info!("ruTorrent endpoint: {}", config.uploader.url);

    // Chat gate, with the persisted authorized users
    let gate = create_gate(&config.auth)
        .await
        .with_context(|| format!("Failed to open users file {:?}", config.auth.users_file))?;

    let indexer =
        JackettIndexer::new(config.indexer.clone()).context("Failed to create Jackett client")?;
    let uploader = RuTorrentUploader::new(config.uploader.clone())
        .context("Failed to create ruTorrent client")?;
    let links = HttpLinkFetcher::new(Duration::from_secs(config.indexer.timeout_secs as u64))
        .context("Failed to create download link client")?;

    let dispatcher = Arc::new(
        Dispatcher::new(
            gate,
            Arc::new(indexer),
            Arc::new(Registry::new()),
            Arc::new(uploader),
            Arc::new(links),
        )
        .with_manual_label(config.uploader.manual_label.clone()),
    );

    // Start the Telegram poller if configured
    let (shutdown_tx, _) = broadcast::channel(1);
    let poller = match &config.telegram {
        Some(telegram_config) => {
            let client =
                TelegramClient::new(telegram_config).context("Failed to create Telegram client")?;
            info!("Starting Telegram long polling");
            Some(tokio::spawn(run_poller(
                Arc::new(client),
                Arc::clone(&dispatcher),
                shutdown_tx.subscribe(),
            )))
        }
        None => {
            info!("Telegram not configured, serving the HTTP API only");
            None
        }
    };

    // Create app state and router
    let state = Arc::new(AppState::new(config.clone(), dispatcher));
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutting down...");
    let _ = shutdown_tx.send(());
    if let Some(poller) = poller {
        if let Err(e) = poller.await {
            error!("Telegram poller ended abnormally: {}", e);
        }
    }

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
