//! Errors raised while locating `~/.gamehub` and loading its config file.

use thiserror::Error;

/// Setup failure. The CLI reports these and exits before any session work.
#[derive(Error, Debug)]
pub enum CoreError {
    /// `HOME` could not be resolved, so there is nowhere to keep the session
    #[error("Cannot locate home directory for ~/.gamehub")]
    HomeDirUnavailable,

    /// Reading or writing the config file or creating directories failed
    #[error("Filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// The config file exists but is not valid JSON for [`Config`](crate::Config)
    #[error("Malformed config file: {0}")]
    MalformedConfig(#[from] serde_json::Error),

    /// An endpoint or origin setting does not parse as a URL
    #[error("Invalid URL setting: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The origin parses but cannot carry a path, e.g. `mailto:`
    #[error("Origin must be an http(s) URL, got {0}")]
    UnusableOrigin(String),
}

/// Result alias for config and path setup.
pub type CoreResult<T> = Result<T, CoreError>;
