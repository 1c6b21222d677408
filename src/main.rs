//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `kv_export` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting and exit codes
//!
//! All core functionality is implemented in the library crate.

use std::process;

use clap::Parser;

use kv_export::error_handling::classify_error;
use kv_export::initialization::init_logger_with;
use kv_export::{run_export, Config, ErrorKind};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Config::parse();

    if let Err(e) = init_logger_with(config.log_level.clone().into(), config.log_format.clone())
    {
        eprintln!("kv_export error: {e}");
        process::exit(ErrorKind::Other.exit_code());
    }

    match run_export(config).await {
        Ok(report) => {
            println!(
                "Exported {} record{} into {} chunk file{} in {:.1}s{}",
                report.records,
                if report.records == 1 { "" } else { "s" },
                report.chunks.len(),
                if report.chunks.len() == 1 { "" } else { "s" },
                report.elapsed_seconds,
                if report.skipped > 0 {
                    format!(" ({} malformed skipped)", report.skipped)
                } else {
                    String::new()
                }
            );
            println!("Output written to {}", report.output_prefix.display());
        }
        Err(e) => {
            let kind = classify_error(&e);
            eprintln!("kv_export error ({kind}): {e:#}");
            process::exit(kind.exit_code());
        }
    }
}
