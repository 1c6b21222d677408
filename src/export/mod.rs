//! Chunked JSON output.
//!
//! This module turns a stream of records into a numbered series of JSON array
//! files (`chunk_0.json`, `chunk_1.json`, ...), each holding at most
//! `chunk_size` records and each written atomically.

mod flush;
mod layout;
mod types;
mod writer;

pub use flush::serialize_chunk;
pub use layout::{chunk_file_name, list_chunk_files, parse_chunk_index};
pub use types::{ExportSummary, WriterConfig};
pub use writer::ChunkedWriter;
