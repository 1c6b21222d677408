//! Configuration constants.
//!
//! This module defines the defaults and operational parameters used throughout
//! the exporter: chunk sizing, output layout, retry tuning and logging cadence.

use std::time::Duration;

/// Default output directory for chunk files.
pub const DEFAULT_OUTPUT_PREFIX: &str = "/tmp/kv_export";

/// Default table name, matching the table `sqlitedict` writes when none is given.
pub const DEFAULT_TABLE: &str = "unnamed";

/// Default maximum number of records per chunk file.
pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

// Output layout
/// File name prefix of a completed chunk (`chunk_<N>.json`)
pub const CHUNK_FILE_PREFIX: &str = "chunk_";
/// File name suffix of a completed chunk
pub const CHUNK_FILE_SUFFIX: &str = ".json";
/// File name prefix of an in-progress chunk; hidden so readers globbing
/// `chunk_*.json` never see it
pub const CHUNK_TEMP_PREFIX: &str = ".chunk_";
/// File name suffix of an in-progress chunk
pub const CHUNK_TEMP_SUFFIX: &str = ".tmp";

// Flush retry strategy
/// Exponent base for the flush backoff (delay = factor * base^n)
pub const FLUSH_RETRY_BASE: u64 = 2;
/// Millisecond multiplier for the flush backoff.
/// With base 2 this yields 200ms, 400ms, 800ms.
pub const FLUSH_RETRY_FACTOR_MS: u64 = 100;
/// Maximum delay between flush attempts
pub const FLUSH_RETRY_MAX_DELAY: Duration = Duration::from_secs(2);
/// Number of retries after the initial flush attempt
pub const FLUSH_RETRY_MAX_RETRIES: usize = 3;

// Logging
/// Log a progress line every this many records
pub const PROGRESS_LOG_INTERVAL: u64 = 50_000;
