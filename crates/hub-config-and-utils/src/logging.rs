//! Logging initialization.
//!
//! Thin wrapper over the observability crate so binaries only pick a level
//! and a service name.

use crate::Paths;
use observability::{LogConfig, LogSink};

/// Initialize logging for a gamehub binary.
///
/// Writes JSONL to `~/.gamehub/logs/gamehub.jsonl` and, when `also_stderr` is
/// set, compact text to stderr. `RUST_LOG` overrides `level`.
pub fn init_logging(service_name: &str, level: &str, paths: &Paths, also_stderr: bool) {
    let sink = if also_stderr {
        LogSink::Both
    } else {
        LogSink::File
    };

    observability::init_with_config(LogConfig {
        service_name: service_name.into(),
        default_level: parse_level(level).to_string().to_lowercase(),
        log_path: Some(paths.log_file()),
        sink,
    });
}

/// Parse a log level string into a tracing Level.
pub fn parse_level(level: &str) -> tracing::Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" | "warning" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
