//! Chunked writer.
//!
//! Buffers records in memory and flushes every `chunk_size` of them to the
//! next numbered chunk file. `finish` flushes the remainder.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};

use super::flush::flush_chunk;
use super::layout::{chunk_file_name, list_chunk_files, remove_stale_output};
use super::types::{ExportSummary, WriterConfig};
use crate::config::{ConfigValidationError, ExistingOutput, DEFAULT_CHUNK_SIZE};
use crate::error_handling::ExportError;
use crate::storage::Record;

/// Writes records into `chunk_<N>.json` files under one output directory.
///
/// A writer assumes it is the only writer on its directory for the duration
/// of the run.
pub struct ChunkedWriter {
    config: WriterConfig,
    buffer: Vec<Record>,
    next_index: u64,
    records_written: u64,
    chunks: Vec<PathBuf>,
    finished: bool,
    /// Chunk path whose flush failed after retries; set until `finish` succeeds
    halted_at: Option<PathBuf>,
}

impl ChunkedWriter {
    /// Prepares the output directory and returns an empty writer.
    ///
    /// Creates the directory (with parents) if needed, then applies the
    /// configured `ExistingOutput` policy to chunk files already in it.
    ///
    /// # Errors
    ///
    /// - `ExportError::InvalidConfig` if `chunk_size` is 0
    /// - `ExportError::OutputWrite` if the directory cannot be created or
    ///   cleaned, or holds chunk files under `ExistingOutput::Refuse`
    pub fn open(config: WriterConfig) -> Result<Self, ExportError> {
        if config.chunk_size == 0 {
            return Err(ConfigValidationError {
                field: "chunk_size",
                message: "must be greater than 0".to_string(),
            }
            .into());
        }

        let dir = &config.output_prefix;
        fs::create_dir_all(dir).map_err(|e| ExportError::output_write(dir, e))?;

        match config.existing_output {
            ExistingOutput::Replace => {
                let removed =
                    remove_stale_output(dir).map_err(|e| ExportError::output_write(dir, e))?;
                if removed > 0 {
                    info!(
                        "Removed {} chunk file{} left in {} by an earlier run",
                        removed,
                        if removed == 1 { "" } else { "s" },
                        dir.display()
                    );
                }
            }
            ExistingOutput::Refuse => {
                let existing =
                    list_chunk_files(dir).map_err(|e| ExportError::output_write(dir, e))?;
                if let Some(first) = existing.first() {
                    return Err(ExportError::output_write(
                        first,
                        io::Error::new(
                            io::ErrorKind::AlreadyExists,
                            format!(
                                "output prefix already holds {} chunk file(s)",
                                existing.len()
                            ),
                        ),
                    ));
                }
            }
        }

        debug!(
            "Chunked writer ready: {} (chunk size {})",
            dir.display(),
            config.chunk_size
        );

        let capacity = config.chunk_size.min(DEFAULT_CHUNK_SIZE);
        Ok(Self {
            config,
            buffer: Vec::with_capacity(capacity),
            next_index: 0,
            records_written: 0,
            chunks: Vec::new(),
            finished: false,
            halted_at: None,
        })
    }

    /// Appends a record, flushing a chunk when the buffer reaches `chunk_size`.
    ///
    /// A flush that fails after retries halts the writer: the records already
    /// buffered are kept, and every later `write` is rejected with
    /// `ExportError::WriterHalted` without taking the record. Only `finish`
    /// may then be retried.
    pub async fn write(&mut self, record: Record) -> Result<(), ExportError> {
        if self.finished {
            return Err(ExportError::WriterFinished);
        }
        if let Some(path) = &self.halted_at {
            return Err(ExportError::WriterHalted {
                path: path.clone(),
                key: record.key,
            });
        }
        self.buffer.push(record);
        if self.buffer.len() >= self.config.chunk_size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Flushes any buffered records as the final chunk.
    ///
    /// Calling `finish` again after it succeeded returns the same summary and
    /// writes nothing. If the final flush fails the records stay buffered and
    /// `finish` may be called again. This is also the way to recover a
    /// halted writer.
    pub async fn finish(&mut self) -> Result<ExportSummary, ExportError> {
        if !self.finished {
            if !self.buffer.is_empty() {
                self.flush().await?;
            }
            self.finished = true;
            debug!(
                "Chunked writer finished: {} records in {} chunks",
                self.records_written,
                self.chunks.len()
            );
        }
        Ok(self.summary())
    }

    /// Records waiting for the next flush.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Records already flushed to chunk files.
    pub fn records_written(&self) -> u64 {
        self.records_written
    }

    /// Whether `finish` has completed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether a failed flush stopped the writer from accepting records.
    pub fn is_halted(&self) -> bool {
        self.halted_at.is_some()
    }

    fn summary(&self) -> ExportSummary {
        ExportSummary {
            records: self.records_written,
            chunks: self.chunks.clone(),
        }
    }

    async fn flush(&mut self) -> Result<(), ExportError> {
        let dir = &self.config.output_prefix;
        let path = dir.join(chunk_file_name(self.next_index));

        let chunk = Arc::new(std::mem::take(&mut self.buffer));
        let result = flush_chunk(dir, &path, Arc::clone(&chunk)).await;
        self.buffer = Arc::try_unwrap(chunk).unwrap_or_else(|shared| shared.as_ref().clone());

        let attempts = match result {
            Ok(attempts) => attempts,
            Err(e) => {
                warn!(
                    "Halting chunked writer: {} records stay buffered for {}",
                    self.buffer.len(),
                    path.display()
                );
                self.halted_at = Some(path);
                return Err(e);
            }
        };
        if attempts > 1 {
            info!("Wrote {} after {} attempts", path.display(), attempts);
        }
        debug!("Flushed {} records to {}", self.buffer.len(), path.display());

        self.records_written += self.buffer.len() as u64;
        self.buffer.clear();
        self.chunks.push(path);
        self.next_index += 1;
        self.halted_at = None;
        Ok(())
    }
}

impl Drop for ChunkedWriter {
    fn drop(&mut self) {
        if !self.finished && !self.buffer.is_empty() {
            warn!(
                "Chunked writer for {} dropped with {} unflushed records",
                self.config.output_prefix.display(),
                self.buffer.len()
            );
        }
    }
}
