//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::fmt;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_OUTPUT_PREFIX, DEFAULT_TABLE};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// What to do when a stored value cannot be decoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum MalformedPolicy {
    /// Stop the export at the first malformed record (default)
    Abort,
    /// Log the record at warn level and continue without it
    Skip,
}

/// What to do when the output prefix already holds chunk files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExistingOutput {
    /// Remove stale chunk files so the directory reflects only this run (default)
    Replace,
    /// Fail before writing anything
    Refuse,
}

/// Export configuration.
///
/// Built once at process entry (from the command line, or programmatically in
/// library use) and passed explicitly to [`crate::run_export`].
///
/// # Examples
///
/// ```no_run
/// use kv_export::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     store: PathBuf::from("results.sqlite"),
///     chunk_size: 5_000,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "kv_export",
    about = "Exports a sqlitedict-style key-value store into size-bounded JSON chunk files.",
    long_about = None
)]
pub struct Config {
    /// Path to the SQLite key-value store to export
    #[arg(value_parser)]
    pub store: PathBuf,

    /// Table inside the store holding the key/value rows
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// Directory that receives chunk_<N>.json files (created if missing)
    #[arg(long, value_parser, default_value = DEFAULT_OUTPUT_PREFIX)]
    pub output_prefix: PathBuf,

    /// Maximum number of records per chunk file
    #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,

    /// Policy for values that cannot be decoded: abort|skip
    #[arg(long, value_enum, default_value_t = MalformedPolicy::Abort)]
    pub on_malformed: MalformedPolicy,

    /// Policy for chunk files left by an earlier run: replace|refuse
    #[arg(long, value_enum, default_value_t = ExistingOutput::Replace)]
    pub existing_output: ExistingOutput,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store: PathBuf::from("results.sqlite"),
            table: DEFAULT_TABLE.to_string(),
            output_prefix: PathBuf::from(DEFAULT_OUTPUT_PREFIX),
            chunk_size: DEFAULT_CHUNK_SIZE,
            on_malformed: MalformedPolicy::Abort,
            existing_output: ExistingOutput::Replace,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

/// A configuration field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValidationError {
    /// Name of the offending field
    pub field: &'static str,
    /// What is wrong and what is expected
    pub message: String,
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigValidationError {}

impl Config {
    /// Checks the values clap cannot check on its own.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.chunk_size == 0 {
            return Err(ConfigValidationError {
                field: "chunk_size",
                message: "must be greater than 0".to_string(),
            });
        }
        if self.table.trim().is_empty() {
            return Err(ConfigValidationError {
                field: "table",
                message: "must not be empty".to_string(),
            });
        }
        if self.output_prefix.as_os_str().is_empty() {
            return Err(ConfigValidationError {
                field: "output_prefix",
                message: "must not be empty (use '.' for the current directory)".to_string(),
            });
        }
        Ok(())
    }
}
