mod api;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use remuxarr_core::{
    load_config, validate_config, DiscordNotifier, FfmpegTranscoder, FfprobeProber, FileWatcher,
    TaskPipeline,
};

use api::create_router;
use state::AppState;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
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
    let config_path = std::env::var("REMUXARR_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Library root folder: {:?}", config.library.root_folder);

    // Create media adapters and the notification client
    let prober = FfprobeProber::new(config.media.clone());
    let transcoder = FfmpegTranscoder::new(config.media.clone());

    let webhook_url = config.discord.as_ref().map(|d| d.webhook_url.clone());
    if webhook_url.is_none() {
        warn!("No discord webhook configured, task notifications disabled");
    }
    let notifier = DiscordNotifier::new(webhook_url);

    // Create the pipeline
    let pipeline = Arc::new(TaskPipeline::new(prober, transcoder, notifier));
    info!("Task pipeline initialized");

    // Start the filesystem trigger source. Failing to attach to the root
    // folder is fatal.
    let _watcher = FileWatcher::start(&config.library.root_folder, Arc::clone(&pipeline))
        .context("Failed to start filesystem watcher")?;

    // Create app state and router
    let state = Arc::new(AppState::new(
        Arc::clone(&pipeline),
        config.library.root_folder.clone(),
    ));
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
