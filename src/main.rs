//! PetFinder server: lost-and-found pet listings
//!
//! Main entry point that wires all crates together and starts the server.

use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use petfinder_api::{AppState, build_router};
use petfinder_cache::CacheManager;
use petfinder_core::config::{AppConfig, ENV_VAR};
use petfinder_core::error::AppError;
use petfinder_database::Repositories;
use petfinder_storage::StorageManager;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from files and environment, then validate it
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var(ENV_VAR).unwrap_or_else(|_| "development".to_string());
    let config = AppConfig::load(&env)?;

    for warning in config.validate()? {
        eprintln!("Configuration warning: {warning}");
    }

    Ok(config)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting PetFinder v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Create data directories ──────────────────────────
    create_data_directories(&config).await?;

    // ── Step 2: Database connection + migrations ─────────────────
    tracing::info!(provider = %config.database.provider, "Initializing database...");
    let repos = Repositories::connect(&config.database).await?;

    // ── Step 3: Initialize cache ─────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache...");
    let cache = CacheManager::new(&config.cache).await?;

    // ── Step 4: Initialize storage ───────────────────────────────
    tracing::info!(provider = %config.storage.provider, "Initializing storage...");
    let storage = StorageManager::new(&config.storage, &config.server.public_base_url).await?;

    // ── Step 5: Services and router ──────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let grace = std::time::Duration::from_secs(config.server.shutdown_grace_seconds);
    let state = AppState::new(config, repos.clone(), cache, storage);
    let app = build_router(state);

    // ── Step 6: Bind ─────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("PetFinder server listening on {}", addr);

    // ── Step 7: Serve until a shutdown signal ────────────────────
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        let _ = shutdown_rx.changed().await;
    });
    let mut handle = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut handle => {
            result
                .map_err(|e| AppError::internal(format!("Server task failed: {e}")))?
                .map_err(|e| AppError::internal(format!("Server error: {e}")))?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Shutdown signal received, draining connections...");
            let _ = shutdown_tx.send(true);
            match tokio::time::timeout(grace, handle).await {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(e))) => tracing::error!(error = %e, "Server error during shutdown"),
                Ok(Err(e)) => tracing::error!(error = %e, "Server task failed during shutdown"),
                Err(_) => tracing::warn!(
                    grace_seconds = grace.as_secs(),
                    "Grace period elapsed with connections still open"
                ),
            }
        }
    }

    // ── Step 8: Release resources ────────────────────────────────
    repos.close().await;
    tracing::info!("PetFinder server shut down gracefully");
    Ok(())
}

/// Create required data directories
async fn create_data_directories(config: &AppConfig) -> Result<(), AppError> {
    if config.storage.provider.eq_ignore_ascii_case("local") {
        let root = &config.storage.local.root_path;
        tokio::fs::create_dir_all(root)
            .await
            .map_err(|e| AppError::storage(format!("Failed to create '{root}': {e}")))?;
        tracing::debug!(path = %root, "Upload directory ready");
    }
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
