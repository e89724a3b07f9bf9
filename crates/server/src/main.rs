use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitconv_core::{
    load_config, load_config_from_env, validate_config, Config, ConversionPipeline, Converter,
    FitCsvToolConverter, ObjectStorage, S3Storage,
};

use fitconv_server::api::create_router;
use fitconv_server::state::AppState;

/// Default configuration file, read only if present.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

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

    let config = resolve_config()?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Scratch directory: {:?}", config.pipeline.scratch_dir);
    info!("Record selection: {:?}", config.pipeline.record_selection);

    let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::from_config(&config.storage).await);
    info!("Using storage backend: {}", storage.backend_name());

    let converter = FitCsvToolConverter::new(config.converter_config());
    if let Err(e) = converter.validate().await {
        warn!("Converter validation failed, conversions will fail: {}", e);
    }
    let converter: Arc<dyn Converter> = Arc::new(converter);

    let pipeline = ConversionPipeline::new(config.pipeline.clone(), storage, converter);
    let state = Arc::new(AppState::new(pipeline));

    // Create router
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

    info!("Server shut down");
    Ok(())
}

/// Loads `FITCONV_CONFIG` if set, else `config.toml` if present, else defaults.
fn resolve_config() -> Result<Config> {
    if let Ok(path) = std::env::var("FITCONV_CONFIG") {
        let path = PathBuf::from(path);
        info!("Loading configuration from {:?}", path);
        return load_config(&path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }

    let path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if path.exists() {
        info!("Loading configuration from {:?}", path);
        load_config(&path).with_context(|| format!("Failed to load config from {:?}", path))
    } else {
        info!("No {} found, using defaults and environment", DEFAULT_CONFIG_PATH);
        load_config_from_env().context("Failed to load config from environment")
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
