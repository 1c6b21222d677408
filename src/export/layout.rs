//! Chunk file naming and output directory housekeeping.
//!
//! Completed chunks are named `chunk_<N>.json` with `N` counting from 0.
//! In-progress chunks are hidden `.chunk_*.tmp` files in the same directory,
//! so the final rename never crosses a filesystem.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{CHUNK_FILE_PREFIX, CHUNK_FILE_SUFFIX, CHUNK_TEMP_PREFIX, CHUNK_TEMP_SUFFIX};

/// File name of the chunk with the given index.
pub fn chunk_file_name(index: u64) -> String {
    format!("{CHUNK_FILE_PREFIX}{index}{CHUNK_FILE_SUFFIX}")
}

/// Parses the index out of a completed chunk file name.
pub fn parse_chunk_index(file_name: &str) -> Option<u64> {
    let digits = file_name
        .strip_prefix(CHUNK_FILE_PREFIX)?
        .strip_suffix(CHUNK_FILE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Whether `file_name` is an in-progress (or abandoned) chunk.
pub fn is_temp_chunk(file_name: &str) -> bool {
    file_name.starts_with(CHUNK_TEMP_PREFIX) && file_name.ends_with(CHUNK_TEMP_SUFFIX)
}

/// Lists completed chunk files in `dir`, ordered by index.
pub fn list_chunk_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut chunks = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(index) = name.to_str().and_then(parse_chunk_index) else {
            continue;
        };
        if entry.file_type()?.is_file() {
            chunks.push((index, entry.path()));
        }
    }
    chunks.sort_by_key(|(index, _)| *index);
    Ok(chunks.into_iter().map(|(_, path)| path).collect())
}

/// Removes completed and abandoned chunk files left in `dir` by an earlier run.
///
/// Other files are left alone. Returns the number of files removed.
pub fn remove_stale_output(dir: &Path) -> io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if parse_chunk_index(name).is_none() && !is_temp_chunk(name) {
            continue;
        }
        if !entry.file_type()?.is_file() {
            continue;
        }
        fs::remove_file(entry.path())?;
        log::debug!("Removed stale output file {}", entry.path().display());
        removed += 1;
    }
    Ok(removed)
}
