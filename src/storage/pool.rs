//! Read-only connection pool for the input store.
//!
//! The store is opened with:
//! - `mode=ro`, so an export can never modify or create it
//! - a single connection, since the export reads strictly sequentially

use std::path::Path;

use log::{debug, error};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::error_handling::ExportError;

/// Opens a read-only pool on an existing SQLite file.
///
/// Fails with `ExportError::StoreNotFound` when the path does not exist, is
/// not a regular file, or cannot be opened as a SQLite database.
pub async fn open_read_only_pool(db_path: &Path) -> Result<SqlitePool, ExportError> {
    let metadata = std::fs::metadata(db_path).map_err(|e| {
        error!("Store {} is not accessible: {e}", db_path.display());
        ExportError::StoreNotFound {
            path: db_path.to_path_buf(),
            detail: e.to_string(),
        }
    })?;
    if !metadata.is_file() {
        return Err(ExportError::StoreNotFound {
            path: db_path.to_path_buf(),
            detail: "not a regular file".to_string(),
        });
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .read_only(true)
        .create_if_missing(false);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to open store {}: {e}", db_path.display());
            ExportError::StoreNotFound {
                path: db_path.to_path_buf(),
                detail: format!("cannot open as SQLite database: {e}"),
            }
        })?;

    debug!("Opened store {} read-only", db_path.display());
    Ok(pool)
}

/// Returns whether `table` exists in the store.
///
/// Also the first real read of the file, so a non-database file fails here.
pub async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool, sqlx::Error> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?")
            .bind(table)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

/// Quotes a table name as an SQL identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
