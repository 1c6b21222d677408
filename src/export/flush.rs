//! Chunk flushing.
//!
//! A chunk is serialized into a temp file inside the output directory,
//! fsynced, and renamed over its final name. Readers therefore see either no
//! file or a complete one. Failed attempts are retried with backoff while the
//! underlying I/O error looks transient.

use std::fs::File;
use std::future::Future;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use tokio_retry::RetryIf;

use crate::config::{CHUNK_TEMP_PREFIX, CHUNK_TEMP_SUFFIX};
use crate::error_handling::{get_flush_retry_strategy, is_transient_io_error, ExportError};
use crate::storage::Record;

/// Writes `records` as a JSON array: one record object per line.
pub fn serialize_chunk<W: Write>(out: &mut W, records: &[Record]) -> io::Result<()> {
    out.write_all(b"[")?;
    for (i, record) in records.iter().enumerate() {
        let separator: &[u8] = if i == 0 { b"\n" } else { b",\n" };
        out.write_all(separator)?;
        serde_json::to_writer(&mut *out, record)?;
    }
    out.write_all(b"\n]\n")
}

/// Makes one attempt at writing `records` to `final_path`.
///
/// On any failure the temp file is removed and `final_path` is untouched.
pub fn write_chunk_file(
    dir: &Path,
    final_path: &Path,
    records: &[Record],
) -> Result<(), ExportError> {
    let mut temp = tempfile::Builder::new()
        .prefix(CHUNK_TEMP_PREFIX)
        .suffix(CHUNK_TEMP_SUFFIX)
        .tempfile_in(dir)
        .map_err(|e| ExportError::output_write(dir, e))?;

    let temp_path = temp.path().to_path_buf();
    write_and_sync(temp.as_file_mut(), records)
        .map_err(|e| ExportError::output_write(&temp_path, e))?;

    temp.persist(final_path)
        .map_err(|e| ExportError::output_write(final_path, e.error))?;

    sync_directory(dir);
    Ok(())
}

fn write_and_sync(file: &mut File, records: &[Record]) -> io::Result<()> {
    let mut out = BufWriter::new(&mut *file);
    serialize_chunk(&mut out, records)?;
    out.flush()?;
    drop(out);
    file.sync_all()
}

/// Flushes a chunk, retrying transient failures.
///
/// Each attempt runs on the blocking thread pool, since it serializes and
/// fsyncs the whole chunk. Returns the number of attempts it took.
pub async fn flush_chunk(
    dir: &Path,
    final_path: &Path,
    records: Arc<Vec<Record>>,
) -> Result<usize, ExportError> {
    retry_flush(final_path, || {
        let dir = dir.to_path_buf();
        let target = final_path.to_path_buf();
        let records = Arc::clone(&records);
        async move {
            let path = target.clone();
            tokio::task::spawn_blocking(move || write_chunk_file(&dir, &target, &records))
                .await
                .map_err(|e| ExportError::output_write(&path, io::Error::other(e)))?
        }
    })
    .await
}

/// Runs `attempt` until it succeeds, fails permanently, or the backoff
/// schedule is exhausted. Returns the number of attempts made.
pub(crate) async fn retry_flush<F, Fut>(
    final_path: &Path,
    mut attempt: F,
) -> Result<usize, ExportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), ExportError>>,
{
    let mut attempts = 0usize;
    let result = RetryIf::start(
        get_flush_retry_strategy(),
        || {
            attempts += 1;
            attempt()
        },
        |e: &ExportError| {
            let retry = matches!(
                e,
                ExportError::OutputWrite { source, .. } if is_transient_io_error(source)
            );
            if retry {
                warn!("Flush of {} failed, retrying: {e}", final_path.display());
            }
            retry
        },
    )
    .await;
    result.map(|()| attempts)
}

/// Persists the rename itself. Failure only weakens crash durability of the
/// directory entry, so it is logged rather than returned.
fn sync_directory(dir: &Path) {
    #[cfg(unix)]
    if let Err(e) = File::open(dir).and_then(|d| d.sync_all()) {
        debug!("Could not fsync directory {}: {e}", dir.display());
    }
    #[cfg(not(unix))]
    let _ = dir;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::layout::{chunk_file_name, list_chunk_files};
    use tempfile::TempDir;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| {
                Record::from_json_bytes(format!("key-{i}"), format!("{{\"n\":{i}}}").as_bytes())
                    .expect("valid JSON")
            })
            .collect()
    }

    #[test]
    fn test_serialize_chunk_is_valid_json_array() {
        let mut out = Vec::new();
        serialize_chunk(&mut out, &records(3)).expect("serialize");
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(
            text,
            "[\n{\"key\":\"key-0\",\"value\":{\"n\":0}},\n{\"key\":\"key-1\",\"value\":{\"n\":1}},\n{\"key\":\"key-2\",\"value\":{\"n\":2}}\n]\n"
        );
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).expect("array");
        assert_eq!(parsed.len(), 3);
    }

    #[test]
    fn test_serialize_empty_chunk() {
        let mut out = Vec::new();
        serialize_chunk(&mut out, &[]).expect("serialize");
        let parsed: Vec<serde_json::Value> =
            serde_json::from_slice(&out).expect("empty array is valid");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_write_chunk_file_leaves_no_temp_files() {
        let dir = TempDir::new().expect("temp dir");
        let final_path = dir.path().join(chunk_file_name(0));
        write_chunk_file(dir.path(), &final_path, &records(5)).expect("write");

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .expect("read dir")
            .map(|e| e.expect("entry").file_name())
            .collect();
        assert_eq!(names.len(), 1);
        assert_eq!(list_chunk_files(dir.path()).expect("list"), vec![final_path]);
    }

    #[test]
    fn test_write_chunk_file_missing_dir_is_output_write() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("gone");
        let err = write_chunk_file(&missing, &missing.join("chunk_0.json"), &records(1))
            .expect_err("missing directory");
        match err {
            ExportError::OutputWrite { path, source } => {
                assert_eq!(path, missing);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_flush_chunk_permanent_error_not_retried() {
        let dir = TempDir::new().expect("temp dir");
        let missing = dir.path().join("gone");
        let started = std::time::Instant::now();
        let err = flush_chunk(&missing, &missing.join("chunk_0.json"), Arc::new(records(1)))
            .await
            .expect_err("missing directory");
        assert!(matches!(err, ExportError::OutputWrite { .. }));
        // No backoff sleep happened
        assert!(started.elapsed() < std::time::Duration::from_millis(200));
    }

    #[tokio::test]
    async fn test_flush_chunk_first_attempt() {
        let dir = TempDir::new().expect("temp dir");
        let final_path = dir.path().join(chunk_file_name(3));
        let attempts = flush_chunk(dir.path(), &final_path, Arc::new(records(2)))
            .await
            .expect("flush");
        assert_eq!(attempts, 1);
        assert!(final_path.is_file());
    }

    #[tokio::test]
    async fn test_transient_failure_is_retried_until_success() {
        let dir = TempDir::new().expect("temp dir");
        let final_path = dir.path().join(chunk_file_name(0));
        let chunk = records(3);
        let mut calls = 0;

        let attempts = retry_flush(&final_path, || {
            calls += 1;
            let result = if calls == 1 {
                Err(ExportError::output_write(
                    dir.path(),
                    io::Error::new(io::ErrorKind::Interrupted, "disk hiccup"),
                ))
            } else {
                write_chunk_file(dir.path(), &final_path, &chunk)
            };
            std::future::ready(result)
        })
        .await
        .expect("second attempt succeeds");

        assert_eq!(attempts, 2);
        let text = std::fs::read_to_string(&final_path).expect("read chunk");
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&text).expect("array");
        assert_eq!(parsed.len(), 3);
        assert_eq!(parsed[2]["key"], "key-2");
    }

    #[tokio::test]
    async fn test_transient_failure_gives_up_after_retries() {
        let dir = TempDir::new().expect("temp dir");
        let final_path = dir.path().join(chunk_file_name(0));
        let mut calls = 0;

        let err = retry_flush(&final_path, || {
            calls += 1;
            std::future::ready(Err(ExportError::output_write(
                dir.path(),
                io::Error::other("device busy"),
            )))
        })
        .await
        .expect_err("every attempt fails");

        assert!(matches!(err, ExportError::OutputWrite { .. }));
        assert_eq!(calls, 1 + crate::config::FLUSH_RETRY_MAX_RETRIES);
        assert!(!final_path.exists());
    }
}
