//! Integration tests for logger behavior.

use ir_metrics::logger::{init_file_logging, set_level, set_level_from_str, Level};
use ir_metrics::{debug, error, info, warn};
use tempfile::TempDir;

#[test]
fn level_parse_accepts_valid() {
    assert!(set_level_from_str("error"));
    assert!(set_level_from_str("WARN"));
    assert!(set_level_from_str("info"));
    assert!(set_level_from_str("debug"));
}

#[test]
fn level_parse_rejects_invalid() {
    assert!(!set_level_from_str("invalid"));
    assert!(!set_level_from_str(""));
}

#[test]
fn logs_do_not_panic() {
    set_level(Level::Debug);
    info!("info integration");
    warn!("warn integration");
    error!("error integration {}", 42);
    debug!("debug integration");
}

#[cfg(feature = "file-logging")]
#[test]
fn file_logging_creates_parent_directories() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("nested").join("run.log");
    assert!(init_file_logging(&path));
    error!("written to file");
    let content = std::fs::read_to_string(&path).expect("log file");
    assert!(content.contains("[ERROR] written to file"));
}

#[cfg(not(feature = "file-logging"))]
#[test]
fn file_logging_is_disabled() {
    let dir = TempDir::new().expect("temp dir");
    assert!(!init_file_logging(&dir.path().join("run.log")));
}
