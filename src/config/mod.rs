//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (chunk sizing, output layout, retry tuning)
//! - CLI option types and parsing
//! - Validation for values the CLI parser cannot check

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{
    Config, ConfigValidationError, ExistingOutput, LogFormat, LogLevel, MalformedPolicy,
};
