//! Sequential reader over a sqlitedict-style key-value table.
//!
//! Rows are yielded in `rowid` order, which is the order `sqlitedict` itself
//! iterates in: insertion order, where an overwritten key moves to the end
//! because `sqlitedict` stores with `REPLACE INTO`.

use std::path::{Path, PathBuf};

use futures::stream::BoxStream;
use futures::StreamExt;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::pool::{open_read_only_pool, quote_identifier, table_exists};
use super::record::Record;
use crate::error_handling::ExportError;

/// Read handle on one table of a key-value store.
///
/// The underlying connection is released by [`StoreReader::close`] or, on
/// any other exit path, when the reader is dropped.
pub struct StoreReader {
    pool: SqlitePool,
    path: PathBuf,
    table: String,
    select_sql: String,
    count_sql: String,
}

impl StoreReader {
    /// Opens `table` in the store at `path` for reading.
    ///
    /// # Errors
    ///
    /// `ExportError::StoreNotFound` if the file is missing, is not a SQLite
    /// database, or has no table named `table`.
    pub async fn open(path: &Path, table: &str) -> Result<Self, ExportError> {
        let pool = open_read_only_pool(path).await?;

        let exists = table_exists(&pool, table)
            .await
            .map_err(|e| ExportError::StoreNotFound {
                path: path.to_path_buf(),
                detail: format!("cannot read schema: {e}"),
            })?;
        if !exists {
            pool.close().await;
            return Err(ExportError::StoreNotFound {
                path: path.to_path_buf(),
                detail: format!("no table named {table:?}"),
            });
        }

        let quoted = quote_identifier(table);
        Ok(Self {
            pool,
            path: path.to_path_buf(),
            table: table.to_string(),
            select_sql: format!("SELECT rowid, key, value FROM {quoted} ORDER BY rowid"),
            count_sql: format!("SELECT COUNT(*) FROM {quoted}"),
        })
    }

    /// Path of the open store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the table being read.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Number of rows in the table.
    pub async fn count(&self) -> Result<u64, ExportError> {
        let count: i64 = sqlx::query_scalar(&self.count_sql)
            .fetch_one(&self.pool)
            .await?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    /// Lazily streams every record in store order.
    ///
    /// A row that cannot be decoded yields `ExportError::MalformedRecord` and
    /// the stream continues with the next row, so callers decide whether to
    /// skip or stop.
    pub fn records(&self) -> BoxStream<'_, Result<Record, ExportError>> {
        sqlx::query(&self.select_sql)
            .fetch(&self.pool)
            .map(|row| decode_row(&row?))
            .boxed()
    }

    /// Releases the read handle.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn decode_row(row: &SqliteRow) -> Result<Record, ExportError> {
    let rowid: i64 = row.try_get(0)?;

    let key: String = row
        .try_get(1)
        .map_err(|e| ExportError::MalformedRecord {
            key: format!("<rowid {rowid}>"),
            reason: format!("key is not text: {e}"),
        })?;

    // Values are BLOB in the sqlitedict schema but json.dumps output lands as TEXT
    let value: Option<Vec<u8>> = row.try_get_unchecked(2)?;
    let Some(value) = value else {
        return Err(ExportError::MalformedRecord {
            key,
            reason: "value is NULL".to_string(),
        });
    };

    Record::from_json_bytes(key.clone(), &value).map_err(|e| ExportError::MalformedRecord {
        key,
        reason: format!("value is not valid JSON ({e}); was the store written with a JSON encoder?"),
    })
}
