//! Tests for command-line parsing into `Config`.

use clap::Parser;
use kv_export::config::{ExistingOutput, LogFormat, LogLevel, MalformedPolicy};
use kv_export::Config;
use std::path::PathBuf;

#[test]
fn test_cli_defaults() {
    let config = Config::try_parse_from(["kv_export", "results.sqlite"]).expect("Should parse");

    assert_eq!(config.store, PathBuf::from("results.sqlite"));
    assert_eq!(config.table, "unnamed");
    assert_eq!(config.output_prefix, PathBuf::from("/tmp/kv_export"));
    assert_eq!(config.chunk_size, 10_000);
    assert_eq!(config.on_malformed, MalformedPolicy::Abort);
    assert_eq!(config.existing_output, ExistingOutput::Replace);
    assert_eq!(config.log_level, LogLevel::Info);
    assert_eq!(config.log_format, LogFormat::Plain);
}

#[test]
fn test_cli_all_options() {
    let config = Config::try_parse_from([
        "kv_export",
        "/data/scan.sqlite",
        "--table",
        "requests",
        "--output-prefix",
        "/tmp/output/requests",
        "--chunk-size",
        "500",
        "--on-malformed",
        "skip",
        "--existing-output",
        "refuse",
        "--log-level",
        "debug",
        "--log-format",
        "json",
    ])
    .expect("Should parse all options");

    assert_eq!(config.store, PathBuf::from("/data/scan.sqlite"));
    assert_eq!(config.table, "requests");
    assert_eq!(config.output_prefix, PathBuf::from("/tmp/output/requests"));
    assert_eq!(config.chunk_size, 500);
    assert_eq!(config.on_malformed, MalformedPolicy::Skip);
    assert_eq!(config.existing_output, ExistingOutput::Refuse);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.log_format, LogFormat::Json);
    assert!(config.validate().is_ok());
}

#[test]
fn test_cli_requires_store() {
    let result = Config::try_parse_from(["kv_export"]);
    assert!(result.is_err(), "store path is required");
}

#[test]
fn test_cli_rejects_non_numeric_chunk_size() {
    let result = Config::try_parse_from(["kv_export", "s.sqlite", "--chunk-size", "many"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_unknown_policy() {
    let result = Config::try_parse_from(["kv_export", "s.sqlite", "--on-malformed", "ignore"]);
    assert!(result.is_err());
}

#[test]
fn test_cli_zero_chunk_size_parses_but_fails_validation() {
    let config = Config::try_parse_from(["kv_export", "s.sqlite", "--chunk-size", "0"])
        .expect("clap accepts any usize");
    let err = config.validate().expect_err("validation rejects zero");
    assert_eq!(err.field, "chunk_size");
}
