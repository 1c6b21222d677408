// Shared test helpers for store setup and chunk inspection.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use serde_json::Value;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::Path;

use kv_export::export::list_chunk_files;

/// Creates a sqlitedict-style store at `path` and returns a writable pool on it.
#[allow(dead_code)] // Used by other test files
pub async fn create_store(path: &Path, table: &str) -> SqlitePool {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(options)
        .await
        .expect("Failed to create test store");

    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS \"{table}\" (key TEXT PRIMARY KEY, value BLOB)"
    ))
    .execute(&pool)
    .await
    .expect("Failed to create store table");

    pool
}

/// Inserts `count` JSON records keyed `key-<start + i>`, stored as TEXT the
/// way `json.dumps` output lands in sqlitedict.
#[allow(dead_code)]
pub async fn insert_json_records(pool: &SqlitePool, table: &str, start: usize, count: usize) {
    let sql = format!("INSERT INTO \"{table}\" (key, value) VALUES (?, ?)");
    let mut tx = pool.begin().await.expect("Failed to begin transaction");
    for i in start..start + count {
        sqlx::query(&sql)
            .bind(format!("key-{i}"))
            .bind(format!("{{\"index\":{i},\"host\":\"host-{i}.example\"}}"))
            .execute(&mut *tx)
            .await
            .expect("Failed to insert record");
    }
    tx.commit().await.expect("Failed to commit records");
}

/// Inserts one row with raw value bytes, stored as a BLOB.
#[allow(dead_code)]
pub async fn insert_raw(pool: &SqlitePool, table: &str, key: &str, value: &[u8]) {
    sqlx::query(&format!(
        "INSERT INTO \"{table}\" (key, value) VALUES (?, ?)"
    ))
    .bind(key)
    .bind(value.to_vec())
    .execute(pool)
    .await
    .expect("Failed to insert raw record");
}

/// Builds a closed store holding `count` records in the default table.
#[allow(dead_code)]
pub async fn create_store_with_records(path: &Path, count: usize) {
    let pool = create_store(path, "unnamed").await;
    insert_json_records(&pool, "unnamed", 0, count).await;
    pool.close().await;
}

/// Reads every chunk file under `dir`, in chunk order.
#[allow(dead_code)]
pub fn read_chunks(dir: &Path) -> Vec<Vec<Value>> {
    list_chunk_files(dir)
        .expect("Failed to list chunk files")
        .iter()
        .map(|path| {
            let text = std::fs::read_to_string(path).expect("Failed to read chunk");
            serde_json::from_str(&text).expect("Chunk is not a JSON array")
        })
        .collect()
}

/// Keys of all exported records, in output order.
#[allow(dead_code)]
pub fn exported_keys(dir: &Path) -> Vec<String> {
    read_chunks(dir)
        .into_iter()
        .flatten()
        .map(|record| {
            record["key"]
                .as_str()
                .expect("record key is a string")
                .to_string()
        })
        .collect()
}
