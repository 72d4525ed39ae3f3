use sqlx::PgPool;
use tracing::{error, info};

use crate::datalayer::CRUD::types::DBTables;

/// Database health status
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DatabaseHealth {
    pub is_healthy: bool,
    pub latency_ms: u64,
    pub pool_size: u32,
    pub idle_connections: usize,
}

/// Table verification result
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct TableVerification {
    pub table_name: String,
    pub exists: bool,
    pub row_count: Option<i64>,
}

/// Verifies database connectivity and returns pool metrics
pub async fn check_database_health(pool: &PgPool) -> Result<DatabaseHealth, sqlx::Error> {
    let start = std::time::Instant::now();

    // Simple ping query
    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        error!("Database health check failed: {}", e);
        e
    })?;

    let latency = start.elapsed();

    Ok(DatabaseHealth {
        is_healthy: true,
        latency_ms: latency.as_millis() as u64,
        pool_size: pool.size(),
        idle_connections: pool.num_idle(),
    })
}

/// Check if a specific table exists in the database
pub async fn check_table_exists(pool: &PgPool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: (bool,) = sqlx::query_as(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = $1
        )",
    )
    .bind(table_name)
    .fetch_one(pool)
    .await?;

    Ok(result.0)
}

/// Get row count for a specific table
///
/// `table_name` must come from `DBTables`, it is interpolated into the query.
pub async fn get_table_row_count(pool: &PgPool, table_name: &str) -> Result<i64, sqlx::Error> {
    let query = format!("SELECT COUNT(*) FROM {}", table_name);

    let result: (i64,) = sqlx::query_as(&query).fetch_one(pool).await?;

    Ok(result.0)
}

/// Verify a table exists and optionally get its row count
pub async fn verify_table(
    pool: &PgPool,
    table_name: &str,
    include_count: bool,
) -> Result<TableVerification, sqlx::Error> {
    let exists = check_table_exists(pool, table_name).await?;

    let row_count = if exists && include_count {
        match get_table_row_count(pool, table_name).await {
            Ok(count) => Some(count),
            Err(e) => {
                error!("Failed to get row count for table {}: {}", table_name, e);
                None
            }
        }
    } else {
        None
    };

    Ok(TableVerification {
        table_name: table_name.to_string(),
        exists,
        row_count,
    })
}

/// Verify all tables the bottle service needs
pub async fn verify_all_tables(pool: &PgPool) -> Result<Vec<TableVerification>, sqlx::Error> {
    let mut results = Vec::new();

    for table_name in [DBTables::BOTTLES] {
        let verification = verify_table(pool, table_name, true).await?;
        if verification.exists {
            info!(
                table = table_name,
                rows = verification.row_count.unwrap_or(0),
                "Table verified"
            );
        } else {
            error!(table = table_name, "Table does not exist");
        }
        results.push(verification);
    }

    Ok(results)
}
