//! Process-level initialization.
//!
//! The exporter owns no shared resources beyond its logger; the store handle
//! and the output directory are scoped to a single run.

mod logger;

// Re-export public API
pub use logger::init_logger_with;
