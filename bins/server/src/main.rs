//! Kobo API Server
//!
//! Main entry point for the Kobo reconciliation backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kobo_api::{AppState, create_router};
use kobo_core::custody::HttpCustodyClient;
use kobo_core::fx::CurrencyConverter;
use kobo_core::reconcile::{ReconcileWorker, Reconciler};
use kobo_db::{DbRateFeed, SeaLedgerStore, connect};
use kobo_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kobo=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Wire the reconciliation pipeline
    let store = Arc::new(SeaLedgerStore::new(db.clone()));
    let rates = Arc::new(DbRateFeed::new(db));
    let custody = Arc::new(HttpCustodyClient::new(&config.custody)?);
    let converter = Arc::new(CurrencyConverter::new(rates));
    let reconciler = Arc::new(Reconciler::new(store, custody, converter));

    // One worker drains the lane; webhook handlers only enqueue
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (queue, worker) = ReconcileWorker::new(reconciler, shutdown_rx);
    let worker_handle = tokio::spawn(worker.run());

    // Create application state
    let state = AppState {
        queue: queue.clone(),
        webhooks: Arc::new(config.webhooks.clone()),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // No handler can enqueue once the server has stopped, so the worker
    // can be told to stand down.
    shutdown_tx.send(true).ok();
    worker_handle.await?;

    let remaining = queue.depth();
    if remaining > 0 {
        warn!(
            remaining,
            "stopped with events still queued; providers will redeliver"
        );
    }
    info!("Server stopped");

    Ok(())
}

/// Resolves when the process receives SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
