//! Error type definitions.
//!
//! This module defines the error taxonomy of an export run and the coarse
//! error kinds used to pick a process exit code.

use std::io;
use std::path::PathBuf;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors produced by the store reader and the chunked writer.
#[derive(Error, Debug)]
pub enum ExportError {
    /// The input store (or the table inside it) does not exist.
    #[error("store not found: {}: {detail}", path.display())]
    StoreNotFound {
        /// Path that was opened
        path: PathBuf,
        /// What exactly is missing
        detail: String,
    },

    /// A stored row cannot be decoded into a record.
    #[error("malformed record {key:?}: {reason}")]
    MalformedRecord {
        /// Key of the offending row (`<rowid N>` when the key itself is unreadable)
        key: String,
        /// Why decoding failed
        reason: String,
    },

    /// Writing chunk output failed.
    #[error("failed to write {}: {source}", path.display())]
    OutputWrite {
        /// File or directory that could not be written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Any other failure talking to the store.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// The configuration was rejected before any work started.
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigValidationError),

    /// `write` was called after the writer was finished.
    #[error("chunked writer already finished")]
    WriterFinished,

    /// `write` was called after a chunk flush failed for good. The rejected
    /// record was not buffered.
    #[error("chunked writer halted after a failed flush of {}; record {key:?} not written", path.display())]
    WriterHalted {
        /// Chunk file whose flush failed
        path: PathBuf,
        /// Key of the rejected record
        key: String,
    },
}

impl ExportError {
    /// Builds an `OutputWrite` error for `path`.
    pub fn output_write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ExportError::OutputWrite {
            path: path.into(),
            source,
        }
    }

    /// Returns the coarse kind used for exit-code selection.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExportError::StoreNotFound { .. } => ErrorKind::StoreNotFound,
            ExportError::MalformedRecord { .. } => ErrorKind::MalformedRecord,
            ExportError::OutputWrite { .. } => ErrorKind::OutputWrite,
            ExportError::InvalidConfig(_) => ErrorKind::InvalidConfig,
            ExportError::WriterHalted { .. } => ErrorKind::OutputWrite,
            ExportError::Store(_) | ExportError::WriterFinished => ErrorKind::Other,
        }
    }
}

/// Coarse classification of a failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    /// Input store or table missing
    StoreNotFound,
    /// A value could not be decoded
    MalformedRecord,
    /// Chunk output could not be written
    OutputWrite,
    /// Configuration rejected
    InvalidConfig,
    /// Anything else (store I/O, logger setup, ...)
    Other,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorKind {
    /// Human-readable name of the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::StoreNotFound => "Store not found",
            ErrorKind::MalformedRecord => "Malformed record",
            ErrorKind::OutputWrite => "Output write error",
            ErrorKind::InvalidConfig => "Invalid configuration",
            ErrorKind::Other => "Export error",
        }
    }

    /// Process exit code for a run that failed with this kind.
    ///
    /// 2 is left to clap for command-line usage errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::Other => 1,
            ErrorKind::StoreNotFound => 3,
            ErrorKind::MalformedRecord => 4,
            ErrorKind::OutputWrite => 5,
            ErrorKind::InvalidConfig => 6,
        }
    }
}
