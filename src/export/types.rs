//! Export types and options.

use std::path::PathBuf;

use crate::config::{Config, ExistingOutput, DEFAULT_CHUNK_SIZE, DEFAULT_OUTPUT_PREFIX};

/// Options for the chunked writer.
#[derive(Clone, Debug)]
pub struct WriterConfig {
    /// Directory that receives chunk files
    pub output_prefix: PathBuf,
    /// Maximum records per chunk file
    pub chunk_size: usize,
    /// Handling of chunk files left by an earlier run
    pub existing_output: ExistingOutput,
}

impl WriterConfig {
    /// Writer options with default chunk size and replace semantics.
    pub fn new(output_prefix: impl Into<PathBuf>) -> Self {
        Self {
            output_prefix: output_prefix.into(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            existing_output: ExistingOutput::Replace,
        }
    }

    /// Set custom chunk size.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set how existing output is handled.
    pub fn with_existing_output(mut self, existing_output: ExistingOutput) -> Self {
        self.existing_output = existing_output;
        self
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_PREFIX)
    }
}

impl From<&Config> for WriterConfig {
    fn from(config: &Config) -> Self {
        Self {
            output_prefix: config.output_prefix.clone(),
            chunk_size: config.chunk_size,
            existing_output: config.existing_output,
        }
    }
}

/// What a finished writer produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Records written across all chunks
    pub records: u64,
    /// Chunk files in write order
    pub chunks: Vec<PathBuf>,
}
