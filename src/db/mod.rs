/// Database layer for the retail API
///
/// Manages the SQLite connection pool, embedded migrations and the column
/// conversions shared by every table (timestamps and decimal amounts).

pub mod models;

use crate::error::{AppError, AppResult};
use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;

/// Storage representation of every timestamp column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Database connection options
#[derive(Debug, Clone)]
pub struct DatabaseOptions {
    pub max_connections: u32,
    pub enable_wal: bool,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            max_connections: 5,
            enable_wal: true,
        }
    }
}

/// Create a SQLite connection pool
pub async fn create_pool(path: &Path, options: DatabaseOptions) -> AppResult<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(options.max_connections)
        .connect_with(
            SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(if options.enable_wal {
                    sqlx::sqlite::SqliteJournalMode::Wal
                } else {
                    sqlx::sqlite::SqliteJournalMode::Delete
                })
                .foreign_keys(true)
                .busy_timeout(std::time::Duration::from_secs(5)),
        )
        .await?;

    Ok(pool)
}

/// Create a single-connection in-memory pool
///
/// Every connection to `:memory:` opens its own database, so the pool is
/// pinned to one connection that never expires.
pub async fn create_memory_pool() -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Run migrations for a database
/// Migrations are embedded at compile time from ./migrations directory
pub async fn run_migrations(pool: &SqlitePool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;

    Ok(())
}

/// Test database connection
pub async fn test_connection(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Format an instant in the storage representation
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a timestamp stored in the storage representation
pub fn parse_timestamp(value: &str) -> AppResult<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| AppError::internal(format!("Invalid stored timestamp {:?}: {}", value, e)))
}

pub(crate) fn timestamp_column(row: &SqliteRow, column: &str) -> AppResult<DateTime<Utc>> {
    let raw: String = row.try_get(column)?;
    parse_timestamp(&raw)
}

pub(crate) fn optional_timestamp_column(
    row: &SqliteRow,
    column: &str,
) -> AppResult<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.try_get(column)?;
    raw.as_deref().map(parse_timestamp).transpose()
}

pub(crate) fn decimal_column(row: &SqliteRow, column: &str) -> AppResult<Decimal> {
    let raw: String = row.try_get(column)?;
    Decimal::from_str(&raw)
        .map_err(|e| AppError::internal(format!("Invalid stored decimal in {}: {}", column, e)))
}

pub(crate) fn optional_decimal_column(row: &SqliteRow, column: &str) -> AppResult<Option<Decimal>> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|value| {
        Decimal::from_str(&value)
            .map_err(|e| AppError::internal(format!("Invalid stored decimal in {}: {}", column, e)))
    })
    .transpose()
}

/// True when the error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// True when the error is a FOREIGN KEY constraint violation
pub(crate) fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_foreign_key_violation())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_uses_storage_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(format_timestamp(at), "2024-03-09 07:05:01");
        assert_eq!(parse_timestamp("2024-03-09 07:05:01").unwrap(), at);
    }

    #[test]
    fn test_garbage_timestamp_is_internal_error() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(AppError::Internal(_))
        ));
    }

    #[tokio::test]
    async fn test_migrations_apply_to_memory_pool() {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        test_connection(&pool).await.unwrap();

        let tables: Vec<String> =
            sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
                .fetch_all(&pool)
                .await
                .unwrap();

        for expected in [
            "products",
            "promotional_products",
            "purchase_details",
            "purchases",
            "users",
        ] {
            assert!(tables.iter().any(|t| t == expected), "missing table {}", expected);
        }
    }

    #[tokio::test]
    async fn test_file_pool_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("retail.sqlite");

        let pool = create_pool(&path, DatabaseOptions::default()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        assert!(path.exists());
        pool.close().await;
    }
}
