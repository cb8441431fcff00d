//! Stats Endpoint client.

use crate::http::read_json;
use crate::models::{PlayerStatsPatch, SessionToken, StatsSnapshot};
use crate::{AuthError, AuthResult};
use async_trait::async_trait;
use hub_storage::SessionStore;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Stats Endpoint operations.
#[async_trait]
pub trait StatsApi: Send + Sync {
    /// Current stats of the token's player.
    async fn get(&self, token: &SessionToken) -> AuthResult<StatsSnapshot>;

    /// Apply a partial update and return the recomputed stats.
    async fn update(
        &self,
        token: &SessionToken,
        patch: &PlayerStatsPatch,
    ) -> AuthResult<StatsSnapshot>;
}

/// reqwest-backed [`StatsApi`].
#[derive(Clone)]
pub struct HttpStatsClient {
    http_client: Client,
    endpoint: Url,
}

impl HttpStatsClient {
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    /// Create a client whose requests time out after `timeout`.
    pub fn with_timeout(endpoint: Url, timeout: Duration) -> AuthResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(endpoint, client))
    }

    pub fn with_client(endpoint: Url, http_client: Client) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }
}

#[async_trait]
impl StatsApi for HttpStatsClient {
    async fn get(&self, token: &SessionToken) -> AuthResult<StatsSnapshot> {
        debug!("Fetching player stats");
        let response = self
            .http_client
            .get(self.endpoint.clone())
            .header(AUTHORIZATION, token.bearer())
            .send()
            .await?;

        read_json(response).await
    }

    async fn update(
        &self,
        token: &SessionToken,
        patch: &PlayerStatsPatch,
    ) -> AuthResult<StatsSnapshot> {
        debug!("Updating player stats");
        let response = self
            .http_client
            .post(self.endpoint.clone())
            .header(AUTHORIZATION, token.bearer())
            .json(patch)
            .send()
            .await?;

        read_json(response).await
    }
}

/// Reads and updates the signed-in player's stats.
///
/// The token is looked up in the shared store on every call, so a logout
/// through [`SessionManager`](crate::SessionManager) takes effect
/// immediately.
#[derive(Clone)]
pub struct StatsClient {
    store: SessionStore,
    api: Arc<dyn StatsApi>,
}

impl StatsClient {
    pub fn new(store: SessionStore, api: Arc<dyn StatsApi>) -> Self {
        Self { store, api }
    }

    /// Stats for the current session. `None` without a session or on any
    /// failure; no request is made without a session.
    pub async fn fetch_stats(&self) -> Option<StatsSnapshot> {
        match self.try_fetch_stats().await {
            Ok(snapshot) => Some(snapshot),
            Err(AuthError::NotLoggedIn) => {
                debug!("No session, skipping stats fetch");
                None
            }
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "Failed to fetch stats");
                None
            }
        }
    }

    /// Send `patch` and return the refreshed stats. Same gating as
    /// [`fetch_stats`](Self::fetch_stats).
    pub async fn patch_stats(&self, patch: &PlayerStatsPatch) -> Option<StatsSnapshot> {
        match self.try_patch_stats(patch).await {
            Ok(snapshot) => Some(snapshot),
            Err(AuthError::NotLoggedIn) => {
                debug!("No session, skipping stats update");
                None
            }
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "Failed to update stats");
                None
            }
        }
    }

    async fn try_fetch_stats(&self) -> AuthResult<StatsSnapshot> {
        let token = self.require_token()?;
        self.api.get(&token).await
    }

    async fn try_patch_stats(&self, patch: &PlayerStatsPatch) -> AuthResult<StatsSnapshot> {
        let token = self.require_token()?;
        if patch.is_empty() {
            debug!("Sending empty stats patch");
        }
        self.api.update(&token, patch).await
    }

    fn require_token(&self) -> AuthResult<SessionToken> {
        self.store
            .get_token()?
            .map(SessionToken::new)
            .ok_or(AuthError::NotLoggedIn)
    }
}
