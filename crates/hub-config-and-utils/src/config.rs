//! Configuration management.

use crate::{CoreError, CoreResult, Paths};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default Auth Endpoint (can be overridden at compile time via GAMEHUB_AUTH_URL).
pub const DEFAULT_AUTH_URL: &str = match option_env!("GAMEHUB_AUTH_URL") {
    Some(url) => url,
    None => "https://functions.poehali.dev/c133b2ca-4363-4e01-b7d2-eb6a29cf1dd8",
};

/// Default Stats Endpoint (can be overridden at compile time via GAMEHUB_STATS_URL).
pub const DEFAULT_STATS_URL: &str = match option_env!("GAMEHUB_STATS_URL") {
    Some(url) => url,
    None => "https://functions.poehali.dev/54956105-fee3-4517-8d4c-2559a22d6234",
};

/// Default site origin used to build the login return URL.
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default HTTP request timeout.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Main configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Auth Endpoint URL (login, callback, verify, logout).
    #[serde(default = "default_auth_url")]
    pub auth_url: String,
    /// Stats Endpoint URL.
    #[serde(default = "default_stats_url")]
    pub stats_url: String,
    /// Site origin; the provider redirects back here after login.
    #[serde(default = "default_origin")]
    pub origin: String,
    /// Per-request timeout for both endpoints.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_stats_url() -> String {
    DEFAULT_STATS_URL.to_string()
}

fn default_origin() -> String {
    DEFAULT_ORIGIN.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            auth_url: default_auth_url(),
            stats_url: default_stats_url(),
            origin: default_origin(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Load configuration from the config file, falling back to defaults.
    /// Environment variables win over the file.
    pub fn load(paths: &Paths) -> CoreResult<Self> {
        let config_path = paths.config_file();

        let mut config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            Self::default()
        };

        config.load_from_env();

        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file.
    pub fn save(&self, paths: &Paths) -> CoreResult<()> {
        paths.ensure_dirs()?;
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(paths.config_file(), content)?;
        Ok(())
    }

    fn load_from_env(&mut self) {
        if let Some(log_level) = env_override("GAMEHUB_LOG_LEVEL") {
            self.log_level = log_level;
        }
        if let Some(auth_url) = env_override("GAMEHUB_AUTH_URL") {
            self.auth_url = auth_url;
        }
        if let Some(stats_url) = env_override("GAMEHUB_STATS_URL") {
            self.stats_url = stats_url;
        }
        if let Some(origin) = env_override("GAMEHUB_ORIGIN") {
            self.origin = origin;
        }
    }

    /// Get the Auth Endpoint as a parsed URL.
    pub fn auth_url(&self) -> CoreResult<Url> {
        Url::parse(&self.auth_url).map_err(CoreError::from)
    }

    /// Get the Stats Endpoint as a parsed URL.
    pub fn stats_url(&self) -> CoreResult<Url> {
        Url::parse(&self.stats_url).map_err(CoreError::from)
    }

    /// Get the site origin as a parsed URL.
    pub fn origin(&self) -> CoreResult<Url> {
        let origin = Url::parse(&self.origin)?;
        if origin.cannot_be_a_base() {
            return Err(CoreError::UnusableOrigin(self.origin.clone()));
        }
        Ok(origin)
    }

    /// Request timeout as a `Duration`.
    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_override(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
        assert_eq!(config.stats_url, DEFAULT_STATS_URL);
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_load_from_file_partial() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.json");

        std::fs::write(
            &config_path,
            r#"{ "log_level": "debug", "origin": "https://arena.example" }"#,
        )
        .unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.origin, "https://arena.example");
        assert_eq!(config.auth_url, DEFAULT_AUTH_URL);
    }

    #[test]
    fn test_config_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config {
            stats_url: "https://stats.example/v1".to_string(),
            request_timeout_secs: 5,
            ..Config::default()
        };
        config.save(&paths).unwrap();

        let loaded = Config::load_from_file(&paths.config_file()).unwrap();
        assert_eq!(loaded.stats_url, "https://stats.example/v1");
        assert_eq!(loaded.request_timeout_secs, 5);
    }

    #[test]
    fn test_config_load_nonexistent_uses_defaults() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());

        let config = Config::load(&paths).unwrap();
        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_config_load_malformed_file_errors() {
        let dir = tempdir().unwrap();
        let paths = Paths::with_base_dir(dir.path().to_path_buf());
        std::fs::write(paths.config_file(), "{ not json").unwrap();

        assert!(matches!(Config::load(&paths), Err(CoreError::MalformedConfig(_))));
    }

    #[test]
    fn test_config_urls_parse() {
        let config = Config::default();
        assert_eq!(config.auth_url().unwrap().scheme(), "https");
        assert_eq!(config.stats_url().unwrap().scheme(), "https");
        assert_eq!(config.origin().unwrap().host_str(), Some("localhost"));
    }

    #[test]
    fn test_config_invalid_urls() {
        let config = Config {
            auth_url: "not a valid url".to_string(),
            origin: "mailto:someone@example.com".to_string(),
            ..Config::default()
        };

        assert!(config.auth_url().is_err());
        assert!(matches!(config.origin(), Err(CoreError::UnusableOrigin(_))));
    }

    #[test]
    fn test_request_timeout() {
        let config = Config {
            request_timeout_secs: 12,
            ..Config::default()
        };
        assert_eq!(config.request_timeout(), std::time::Duration::from_secs(12));
    }
}
