//! Error handling for export runs.
//!
//! This module provides:
//! - The error taxonomy shared by the store reader and the chunked writer
//! - Retry strategy configuration for chunk flushes
//! - Error kind extraction from error chains, and exit code mapping
//!
//! Errors are categorized into:
//! - **Store not found**: the input path or table is missing (fatal, never retried)
//! - **Malformed record**: a stored value cannot be decoded (abort or skip, per policy)
//! - **Output write**: a chunk could not be written (retried with backoff, then fatal)

mod categorization;
mod types;

// Re-export public API
pub use categorization::{classify_error, get_flush_retry_strategy, is_transient_io_error};
pub use types::{ErrorKind, ExportError, InitializationError};
