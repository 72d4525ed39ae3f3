use std::sync::Arc;

use bottle_api::{
    config::{AppConfig, StorageBackend},
    datalayer::{
        CRUD::{BottleStore, InMemoryBottleStore, PgBottleStore},
        DbManager, initialize_database,
    },
    logging::{init_telemetry, shutdown_telemetry},
    routes::create_router,
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables first
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env()?;

    init_telemetry(Some(config.telemetry.clone()))?;

    tracing::info!(storage = ?config.storage, "Starting bottle API");

    // The manager is kept so the pool can be closed after the server stops
    let (store, db_manager): (Arc<dyn BottleStore>, Option<DbManager>) = match config.storage {
        StorageBackend::Postgres => {
            let db_manager = initialize_database(config.database.clone()).await?;
            tracing::info!("Database initialized successfully");
            (
                Arc::new(PgBottleStore::new(db_manager.pool().clone())),
                Some(db_manager),
            )
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, records are lost on exit");
            (Arc::new(InMemoryBottleStore::new()), None)
        }
    };

    let app = create_router(AppState::new(store));

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        address = %addr,
        port = config.port,
        "Server listening and ready to accept connections"
    );

    tracing::info!(
        endpoints = ?vec![
            "POST/GET/PUT/DELETE /api/v1/bottle",
            "GET /api/v1/bottle/:bottle_id",
            "GET /health, /health/live, /health/ready",
        ],
        "Available API endpoints"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(db_manager) = db_manager {
        db_manager.shutdown().await;
    }

    shutdown_telemetry();

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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

    tracing::warn!("Shutdown signal received, cleaning up...");
}
