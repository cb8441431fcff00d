//! # Observability
//!
//! Centralized tracing setup for the gamehub workspace.
//!
//! Binaries call [`init_with_config`] once at startup and use the standard
//! `tracing` macros everywhere else. Library crates never install a
//! subscriber themselves.
//!
//! Two sinks are available:
//!
//! - a compact human-readable layer on stderr
//! - a JSONL layer appended to a log file (`~/.gamehub/logs/gamehub.jsonl`
//!   unless a path is given)
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "cli".into(),
//!         default_level: "debug".into(),
//!         sink: observability::LogSink::Both,
//!         ..Default::default()
//!     });
//!     tracing::info!("ready");
//! }
//! ```

mod file;
mod json_layer;

use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

pub use file::{default_log_path, FileLogWriter};
pub use json_layer::{JsonLayer, LogEntry};

/// Where log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogSink {
    /// Compact text on stderr only.
    #[default]
    Stderr,
    /// JSONL file only.
    File,
    /// JSONL file plus compact text on stderr.
    Both,
}

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service (e.g. "cli"). Included in every JSONL line.
    pub service_name: String,

    /// Default log level filter (e.g. "debug", "info", "warn").
    /// Overridden by `RUST_LOG` when set.
    pub default_level: String,

    /// Optional custom log file path. Defaults to [`default_log_path`].
    pub log_path: Option<PathBuf>,

    /// Which sinks to install.
    pub sink: LogSink,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            sink: LogSink::Stderr,
        }
    }
}

impl LogConfig {
    /// Resolved log file path, if the configured sink writes to a file.
    pub fn file_path(&self) -> Option<PathBuf> {
        match self.sink {
            LogSink::Stderr => None,
            LogSink::File | LogSink::Both => {
                Some(self.log_path.clone().unwrap_or_else(default_log_path))
            }
        }
    }
}

/// Initialize the observability layer with default settings.
pub fn init(service_name: &str) {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    });
}

/// Initialize the observability layer with custom configuration.
///
/// Calling this more than once is harmless: later calls are ignored. If the
/// log file cannot be opened, logging falls back to stderr.
pub fn init_with_config(config: LogConfig) {
    let filter = || {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_level))
    };

    let file_layer = config.file_path().and_then(|path| {
        match FileLogWriter::new(&path) {
            Ok(writer) => Some(
                JsonLayer::new(config.service_name.clone(), writer).with_filter(filter()),
            ),
            Err(e) => {
                eprintln!("failed to open log file {}: {}", path.display(), e);
                None
            }
        }
    });

    let stderr_enabled = matches!(config.sink, LogSink::Stderr | LogSink::Both)
        || file_layer.is_none();
    let stderr_layer = stderr_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .compact()
            .with_filter(filter())
    });

    let _ = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init();
}

/// Re-export tracing macros for convenience.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export Level for advanced filtering.
pub use tracing::Level;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LogConfig::default();
        assert_eq!(config.service_name, "unknown");
        assert_eq!(config.default_level, "info");
        assert!(config.log_path.is_none());
        assert_eq!(config.sink, LogSink::Stderr);
    }

    #[test]
    fn test_file_path_only_for_file_sinks() {
        let mut config = LogConfig {
            log_path: Some(PathBuf::from("/tmp/gamehub-test.jsonl")),
            ..Default::default()
        };
        assert!(config.file_path().is_none());

        config.sink = LogSink::File;
        assert_eq!(
            config.file_path(),
            Some(PathBuf::from("/tmp/gamehub-test.jsonl"))
        );

        config.sink = LogSink::Both;
        assert!(config.file_path().is_some());
    }

    #[test]
    fn test_file_path_falls_back_to_default() {
        let config = LogConfig {
            sink: LogSink::File,
            ..Default::default()
        };
        assert_eq!(config.file_path(), Some(default_log_path()));
    }
}
