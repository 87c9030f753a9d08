//! Tournament engine service entry point

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::info;

use pht_common::store::{MemoryStore, SqliteStore};
use pht_common::Store;
use pht_engine::config::{Args, Config};
use pht_engine::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pht_engine=info,tower_http=info".into()),
        )
        .init();

    // Log version information immediately for startup identification
    info!(
        "Starting PHT Tournament Engine (pht-engine) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Config::resolve(args).context("Failed to resolve configuration")?;

    let store: Arc<dyn Store> = if config.memory {
        info!("Using in-memory store; state is lost on exit");
        Arc::new(MemoryStore::new())
    } else {
        info!("Database path: {}", config.db_path.display());
        Arc::new(
            SqliteStore::open(&config.db_path)
                .await
                .context("Failed to open document store")?,
        )
    };

    if config.admin_token.is_none() && config.player_token.is_none() {
        info!("No API tokens configured - auth checking disabled, all callers are admin");
    }

    let state = AppState::new(store, config.auth_tokens());
    let app = build_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("pht-engine listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM so in-flight requests can finish
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
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    info!("Shutdown signal received");
}
