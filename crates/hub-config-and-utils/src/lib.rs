//! Configuration, paths, and logging bootstrap for gamehub.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{
    Config, DEFAULT_AUTH_URL, DEFAULT_LOG_LEVEL, DEFAULT_ORIGIN, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_STATS_URL,
};
pub use error::{CoreError, CoreResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
