//! kv_export library: export a local key-value store into JSON chunk files
//!
//! This library reads every record from a SQLite key-value store laid out the
//! way `sqlitedict` writes it, and writes the records out as a numbered series
//! of size-bounded JSON array files under an output directory.
//!
//! # Example
//!
//! ```no_run
//! use kv_export::{run_export, Config};
//! use std::path::PathBuf;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     store: PathBuf::from("results.sqlite"),
//!     output_prefix: PathBuf::from("/tmp/results"),
//!     chunk_size: 10_000,
//!     ..Default::default()
//! };
//!
//! let report = run_export(config).await?;
//! println!("Exported {} records into {} chunk files", report.records, report.chunks.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime (the store is read through `sqlx`).
//! The export itself runs as a single task; a current-thread runtime is enough.

#![warn(missing_docs)]

pub mod config;
pub mod error_handling;
pub mod export;
pub mod initialization;
pub mod storage;
pub mod utils;

// Re-export public API
pub use config::{Config, ExistingOutput, LogFormat, LogLevel, MalformedPolicy};
pub use error_handling::{ErrorKind, ExportError};
pub use export::{ChunkedWriter, ExportSummary, WriterConfig};
pub use run::{run_export, ExportReport};
pub use storage::{Record, StoreReader};

// Internal run module (drives the reader into the writer)
mod run {
    use std::path::PathBuf;

    use anyhow::{Context, Result};
    use futures::StreamExt;
    use log::{info, warn};

    use crate::config::{Config, MalformedPolicy, PROGRESS_LOG_INTERVAL};
    use crate::error_handling::ExportError;
    use crate::export::{ChunkedWriter, WriterConfig};
    use crate::storage::StoreReader;
    use crate::utils::ScopedTimer;

    /// Results of an export run.
    #[derive(Debug, Clone)]
    pub struct ExportReport {
        /// Records written to chunk files
        pub records: u64,
        /// Malformed records left out (only with `MalformedPolicy::Skip`)
        pub skipped: u64,
        /// Chunk files in write order
        pub chunks: Vec<PathBuf>,
        /// Directory holding the chunk files
        pub output_prefix: PathBuf,
        /// Elapsed time in seconds
        pub elapsed_seconds: f64,
    }

    /// Exports every record of the configured store into chunk files.
    ///
    /// Records are pulled from the store one at a time and handed to the
    /// writer before the next one is read. The store handle is released on
    /// every exit path.
    ///
    /// # Errors
    ///
    /// The returned error wraps an [`ExportError`]; use
    /// [`crate::error_handling::classify_error`] to recover its kind:
    /// - `StoreNotFound` if the store file or table is missing
    /// - `MalformedRecord` if a value cannot be decoded and the policy is `Abort`
    /// - `OutputWrite` if a chunk cannot be written after retries
    /// - `InvalidConfig` if `config` fails validation
    pub async fn run_export(config: Config) -> Result<ExportReport> {
        let timer = ScopedTimer::start("export");

        config.validate().map_err(ExportError::from)?;

        let reader = StoreReader::open(&config.store, &config.table)
            .await
            .with_context(|| format!("Failed to open store {}", config.store.display()))?;

        let result = drive(&reader, &config).await;
        reader.close().await;
        let (summary, skipped) = result?;

        let elapsed_seconds = timer.elapsed().as_secs_f64();
        info!(
            "Exported {} records ({} skipped) into {} chunk files under {}",
            summary.records,
            skipped,
            summary.chunks.len(),
            config.output_prefix.display()
        );

        Ok(ExportReport {
            records: summary.records,
            skipped,
            chunks: summary.chunks,
            output_prefix: config.output_prefix,
            elapsed_seconds,
        })
    }

    async fn drive(
        reader: &StoreReader,
        config: &Config,
    ) -> Result<(crate::export::ExportSummary, u64)> {
        let total = reader.count().await.context("Failed to count store records")?;
        info!(
            "Exporting {} records from table {:?} of {} (chunk size {})",
            total,
            reader.table(),
            reader.path().display(),
            config.chunk_size
        );

        let mut writer = ChunkedWriter::open(WriterConfig::from(config)).with_context(|| {
            format!(
                "Failed to prepare output directory {}",
                config.output_prefix.display()
            )
        })?;

        let mut records = reader.records();
        let mut read = 0u64;
        let mut skipped = 0u64;

        while let Some(item) = records.next().await {
            read += 1;
            let record = match item {
                Ok(record) => record,
                Err(e @ ExportError::MalformedRecord { .. })
                    if config.on_malformed == MalformedPolicy::Skip =>
                {
                    warn!("Skipping {e}");
                    skipped += 1;
                    continue;
                }
                Err(e) => {
                    return Err(e).with_context(|| format!("Export aborted at record {read}"));
                }
            };

            writer.write(record).await.context("Failed to write chunk")?;

            if read % PROGRESS_LOG_INTERVAL == 0 {
                info!("Progress: {read}/{total} records read");
            }
        }

        let summary = writer.finish().await.context("Failed to write final chunk")?;
        Ok((summary, skipped))
    }
}
