//! CLI command implementations.

mod auth;
mod profile;
mod stats;

pub use auth::{callback, login, logout, status, verify, whoami};
pub use profile::profile;
pub use stats::{stats_show, stats_update};

use crate::browser::BrowserNavigator;
use anyhow::{Context, Result};
use hub_config_and_utils::{Config, Paths};
use std::sync::Arc;
use steam_session::{HttpAuthClient, HttpStatsClient, Navigator, SessionManager, StatsClient};

/// Session and stats clients over the on-disk session store.
pub struct Clients {
    pub session: SessionManager,
    pub stats: StatsClient,
}

/// Build clients that open the system browser for login.
pub fn clients(paths: &Paths, config: &Config) -> Result<Clients> {
    clients_with_navigator(paths, config, Arc::new(BrowserNavigator))
}

/// Build clients with a specific navigator.
pub fn clients_with_navigator(
    paths: &Paths,
    config: &Config,
    navigator: Arc<dyn Navigator>,
) -> Result<Clients> {
    let store = hub_storage::open_file_store(&paths.session_file())
        .with_context(|| format!("Failed to open {}", paths.session_file().display()))?;

    let timeout = config.request_timeout();
    let auth = HttpAuthClient::with_timeout(config.auth_url()?, timeout)?;
    let stats = HttpStatsClient::with_timeout(config.stats_url()?, timeout)?;

    Ok(Clients {
        session: SessionManager::new(store.clone(), Arc::new(auth), navigator, config.origin()?),
        stats: StatsClient::new(store, Arc::new(stats)),
    })
}
