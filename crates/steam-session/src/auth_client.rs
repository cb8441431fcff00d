//! Auth Endpoint client.
//!
//! The endpoint is a single URL that picks its behaviour from an `action`
//! query parameter. Callers see four typed operations through [`AuthApi`];
//! [`AuthRequest`] is the tagged form the HTTP transport renders.

use crate::callback::CallbackParams;
use crate::http::read_json;
use crate::models::{CallbackResponse, LoginRedirect, SessionToken, VerifyResponse};
use crate::AuthResult;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// The four Auth Endpoint operations.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Ask for the provider URL to send the browser to.
    async fn begin_login(&self, return_url: &str) -> AuthResult<LoginRedirect>;

    /// Exchange provider callback parameters for a session.
    async fn complete_callback(&self, params: &CallbackParams) -> AuthResult<CallbackResponse>;

    /// Check whether a token is still valid.
    async fn verify(&self, token: &SessionToken) -> AuthResult<VerifyResponse>;

    /// Invalidate a token server-side.
    async fn logout(&self, token: &SessionToken) -> AuthResult<()>;
}

/// One Auth Endpoint call.
#[derive(Debug, Clone, Copy)]
pub enum AuthRequest<'a> {
    Login { return_url: &'a str },
    Callback { params: &'a CallbackParams },
    Verify { token: &'a SessionToken },
    Logout { token: &'a SessionToken },
}

impl<'a> AuthRequest<'a> {
    /// Value of the `action` query parameter; login sends none.
    pub fn action(&self) -> Option<&'static str> {
        match self {
            AuthRequest::Login { .. } => None,
            AuthRequest::Callback { .. } => Some("callback"),
            AuthRequest::Verify { .. } => Some("verify"),
            AuthRequest::Logout { .. } => Some("logout"),
        }
    }

    /// Query pairs to append to the endpoint URL.
    pub fn query_pairs(&self) -> Vec<(&'a str, &'a str)> {
        match *self {
            AuthRequest::Login { return_url } => vec![("return_url", return_url)],
            AuthRequest::Callback { params } => {
                let mut pairs: Vec<(&str, &str)> = params
                    .deduplicated()
                    .into_iter()
                    .filter(|(key, _)| *key != "action")
                    .collect();
                pairs.push(("action", "callback"));
                pairs
            }
            AuthRequest::Verify { .. } => vec![("action", "verify")],
            AuthRequest::Logout { .. } => vec![("action", "logout")],
        }
    }

    /// Bearer credential, for the token-carrying calls.
    pub fn bearer(&self) -> Option<&'a SessionToken> {
        match *self {
            AuthRequest::Verify { token } | AuthRequest::Logout { token } => Some(token),
            AuthRequest::Login { .. } | AuthRequest::Callback { .. } => None,
        }
    }

    /// Full request URL against `endpoint`.
    pub fn url(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in self.query_pairs() {
                query.append_pair(key, value);
            }
        }
        url
    }

    fn name(&self) -> &'static str {
        self.action().unwrap_or("login")
    }
}

/// reqwest-backed [`AuthApi`].
#[derive(Clone)]
pub struct HttpAuthClient {
    http_client: Client,
    endpoint: Url,
}

impl HttpAuthClient {
    /// Create a client with a default reqwest client.
    pub fn new(endpoint: Url) -> Self {
        Self::with_client(endpoint, Client::new())
    }

    /// Create a client whose requests time out after `timeout`.
    pub fn with_timeout(endpoint: Url, timeout: Duration) -> AuthResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(endpoint, client))
    }

    /// Create a client sharing an existing reqwest client.
    pub fn with_client(endpoint: Url, http_client: Client) -> Self {
        Self {
            http_client,
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn send(&self, request: AuthRequest<'_>) -> AuthResult<reqwest::Response> {
        let url = request.url(&self.endpoint);
        debug!(action = request.name(), "Calling auth endpoint");

        let mut builder = self.http_client.get(url);
        if let Some(token) = request.bearer() {
            builder = builder.header(AUTHORIZATION, token.bearer());
        }

        Ok(builder.send().await?)
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn begin_login(&self, return_url: &str) -> AuthResult<LoginRedirect> {
        let response = self.send(AuthRequest::Login { return_url }).await?;
        read_json(response).await
    }

    async fn complete_callback(&self, params: &CallbackParams) -> AuthResult<CallbackResponse> {
        let response = self.send(AuthRequest::Callback { params }).await?;
        read_json(response).await
    }

    async fn verify(&self, token: &SessionToken) -> AuthResult<VerifyResponse> {
        let response = self.send(AuthRequest::Verify { token }).await?;
        read_json(response).await
    }

    async fn logout(&self, token: &SessionToken) -> AuthResult<()> {
        let response = self.send(AuthRequest::Logout { token }).await?;
        crate::http::ensure_success(response).await?;
        Ok(())
    }
}
