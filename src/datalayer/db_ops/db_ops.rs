use crate::datalayer::db_ops::constants::DbConfig;
use crate::datalayer::db_ops::db_health::{DatabaseHealth, check_database_health, verify_all_tables};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::{error, info, warn};

/// Embedded schema migrations (./migrations)
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Database connection manager owning the connection pool
#[derive(Clone)]
pub struct DbManager {
    pool: PgPool,
}

impl DbManager {
    /// Creates a new database manager and connects the pool
    pub async fn new(config: DbConfig) -> Result<Self, sqlx::Error> {
        info!(
            max_connections = config.max_connections,
            "Initializing database connection pool..."
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connection_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(config.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| {
                error!("Failed to create database pool: {}", e);
                e
            })?;

        info!("Database connection pool created successfully");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending migrations; safe to run on every start
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        info!("Running database migrations...");
        MIGRATOR.run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Health check - verifies database connectivity
    pub async fn health_check(&self) -> Result<DatabaseHealth, sqlx::Error> {
        check_database_health(&self.pool).await
    }

    /// Graceful shutdown - closes all connections in the pool
    pub async fn shutdown(&self) {
        info!("Shutting down database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }

    /// Test database connection and log pool statistics
    pub async fn test_connection(&self) -> Result<(), sqlx::Error> {
        info!("Testing database connection...");

        let health = self.health_check().await?;

        info!(
            pool_size = health.pool_size,
            idle = health.idle_connections,
            latency_ms = health.latency_ms,
            "Database connection test successful"
        );

        Ok(())
    }
}

/// Initialize database connection at application startup
///
/// Connects, applies migrations, pings the server and checks that the
/// bottles table is in place.
pub async fn initialize_database(config: DbConfig) -> Result<DbManager, sqlx::Error> {
    info!("=== Database Initialization Started ===");

    let db_manager = DbManager::new(config).await?;
    db_manager.run_migrations().await?;
    db_manager.test_connection().await?;

    for table in verify_all_tables(db_manager.pool()).await? {
        if !table.exists {
            warn!(table = %table.table_name, "Table missing after migrations");
        }
    }

    info!("=== Database Initialization Completed ===");

    Ok(db_manager)
}
