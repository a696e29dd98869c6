//! Store pool construction and startup schema check.
//!
//! SYSTEM CONTEXT
//! ==============
//! Startup uses this module to build the shared SQLx pool and to confirm the
//! `business_cards` table looks the way the handlers expect. The table is
//! owned by whoever provisions the database: nothing here creates or alters
//! it, and a failed check only logs.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::ServiceConfig;

pub const CARDS_TABLE: &str = "business_cards";

/// Columns the card queries read or write.
pub const EXPECTED_COLUMNS: [&str; 8] = ["id", "full_name", "email", "phone", "company_name", "website", "notes", "dt"];

/// Build the `PostgreSQL` connection pool without connecting.
///
/// Connections are opened on first use, so the service still starts when the
/// store is down; requests made meanwhile fail with a store error.
///
/// # Errors
///
/// Returns an error if the connection string cannot be parsed.
pub fn init_pool(config: &ServiceConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_secs))
        .connect_lazy(&config.database_url)
}

/// Read the card table's columns in ordinal order and log what was found.
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub async fn verify_schema(pool: &PgPool) -> Result<Vec<(String, String)>, sqlx::Error> {
    let columns = sqlx::query_as::<_, (String, String)>(
        "SELECT column_name::text, data_type::text
         FROM information_schema.columns
         WHERE table_name = $1
         ORDER BY ordinal_position",
    )
    .bind(CARDS_TABLE)
    .fetch_all(pool)
    .await?;

    if columns.is_empty() {
        tracing::warn!(table = CARDS_TABLE, "card table not found");
        return Ok(columns);
    }

    tracing::info!(table = CARDS_TABLE, count = columns.len(), "database connection verified");
    for (name, data_type) in &columns {
        tracing::info!(column = %name, %data_type, "card table column");
    }

    let missing = missing_columns(columns.iter().map(|(name, _)| name.as_str()));
    if !missing.is_empty() {
        tracing::warn!(table = CARDS_TABLE, ?missing, "card table is missing expected columns");
    }

    Ok(columns)
}

/// Expected columns absent from `found`, in declaration order.
pub fn missing_columns<'a>(found: impl IntoIterator<Item = &'a str>) -> Vec<&'static str> {
    let found: Vec<&str> = found.into_iter().collect();
    EXPECTED_COLUMNS
        .iter()
        .copied()
        .filter(|expected| !found.contains(expected))
        .collect()
}
