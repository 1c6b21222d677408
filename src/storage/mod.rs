//! Input store access.
//!
//! The store is a SQLite file laid out the way `sqlitedict` writes it: one
//! table (default `unnamed`) with a `key TEXT PRIMARY KEY` column and a
//! `value BLOB` column holding JSON-encoded values.

pub mod pool;
pub mod reader;
pub mod record;

pub use reader::StoreReader;
pub use record::Record;
