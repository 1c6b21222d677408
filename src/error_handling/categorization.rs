//! Error categorization and retry strategy.
//!
//! This module decides which flush failures are worth retrying and how long to
//! wait between attempts, and maps a failed run back to its error kind.

use std::io;
use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

use super::types::{ErrorKind, ExportError};
use crate::config::{
    FLUSH_RETRY_BASE, FLUSH_RETRY_FACTOR_MS, FLUSH_RETRY_MAX_DELAY, FLUSH_RETRY_MAX_RETRIES,
};

/// Creates the exponential backoff used between chunk flush attempts.
///
/// Yields `FLUSH_RETRY_MAX_RETRIES` delays of `FLUSH_RETRY_FACTOR_MS * 2^n`
/// milliseconds, each capped at `FLUSH_RETRY_MAX_DELAY`.
pub fn get_flush_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(FLUSH_RETRY_BASE)
        .factor(FLUSH_RETRY_FACTOR_MS)
        .max_delay(FLUSH_RETRY_MAX_DELAY)
        .take(FLUSH_RETRY_MAX_RETRIES)
}

/// Determines if a flush failure might succeed on a later attempt.
///
/// Errors that describe the state of the filesystem rather than a momentary
/// condition (permissions, missing directory, bad input) are permanent.
/// Everything else, including disk-full, is retried.
pub fn is_transient_io_error(error: &io::Error) -> bool {
    !matches!(
        error.kind(),
        io::ErrorKind::PermissionDenied
            | io::ErrorKind::NotFound
            | io::ErrorKind::AlreadyExists
            | io::ErrorKind::InvalidInput
            | io::ErrorKind::InvalidData
            | io::ErrorKind::Unsupported
    )
}

/// Finds the error kind of a failed run by walking the error chain.
///
/// Falls back to `ErrorKind::Other` when no `ExportError` is present.
pub fn classify_error(error: &anyhow::Error) -> ErrorKind {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ExportError>())
        .map(ExportError::kind)
        .unwrap_or(ErrorKind::Other)
}
