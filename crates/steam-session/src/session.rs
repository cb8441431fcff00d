//! Session lifecycle against the Auth Endpoint.
//!
//! `SessionManager` owns the login → callback → verify → logout flow. The
//! token and cached user live in a [`SessionStore`]; the manager additionally
//! tracks a [`SessionState`] in memory so hosts can tell a never-logged-in
//! visitor from one whose session was just rejected.
//!
//! ```text
//!  Anonymous ──check_auth(auth_callback=true)──► PendingCallback
//!      ▲  ▲                                           │
//!      │  └──────────── callback failed ──────────────┤
//!      │                                              │ callback ok
//!   logout                                            ▼
//!      └───────────────────────────────────────── Authenticated
//!                                                     │ verify failed
//!                                                     ▼
//!                                                  Invalid
//! ```
//!
//! Every public operation reports failure as `None`. The underlying
//! [`AuthError`] is logged before it is dropped.

use crate::auth_client::AuthApi;
use crate::callback::CallbackParams;
use crate::models::{SessionToken, User};
use crate::navigator::Navigator;
use crate::{AuthError, AuthResult};
use hub_storage::SessionStore;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No token stored.
    Anonymous,
    /// The page load carries provider callback parameters being exchanged.
    PendingCallback,
    /// Token and user cached.
    Authenticated,
    /// The cached token failed verification and was discarded.
    Invalid,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Anonymous => "anonymous",
            SessionState::PendingCallback => "pending_callback",
            SessionState::Authenticated => "authenticated",
            SessionState::Invalid => "invalid",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`SessionManager::check_auth`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCheck {
    /// The page was a provider callback and the exchange succeeded.
    CallbackCompleted(User),
    /// A stored token was confirmed by the Auth Endpoint.
    Verified(User),
    /// No session resulted.
    Anonymous,
}

impl AuthCheck {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthCheck::CallbackCompleted(user) | AuthCheck::Verified(user) => Some(user),
            AuthCheck::Anonymous => None,
        }
    }

    pub fn into_user(self) -> Option<User> {
        match self {
            AuthCheck::CallbackCompleted(user) | AuthCheck::Verified(user) => Some(user),
            AuthCheck::Anonymous => None,
        }
    }
}

/// Client-side session lifecycle.
pub struct SessionManager {
    store: SessionStore,
    api: Arc<dyn AuthApi>,
    navigator: Arc<dyn Navigator>,
    /// Base the provider redirects back to.
    origin: Url,
    state: Mutex<SessionState>,
}

impl SessionManager {
    /// Create a manager. The starting state is derived from the store.
    pub fn new(
        store: SessionStore,
        api: Arc<dyn AuthApi>,
        navigator: Arc<dyn Navigator>,
        origin: Url,
    ) -> Self {
        let state = match store.has_session() {
            Ok(true) => SessionState::Authenticated,
            Ok(false) => SessionState::Anonymous,
            Err(e) => {
                warn!(error = %e, "Failed to read session from storage");
                SessionState::Anonymous
            }
        };

        Self {
            store,
            api,
            navigator,
            origin,
            state: Mutex::new(state),
        }
    }

    /// Current in-memory state.
    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    /// The backing store, shared with [`StatsClient`](crate::StatsClient).
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Return URL sent with a login request: the origin, no trailing slash.
    pub fn return_url(&self) -> String {
        self.origin.origin().ascii_serialization()
    }

    /// Stored session token.
    pub fn token(&self) -> Option<SessionToken> {
        match self.store.get_token() {
            Ok(token) => token.map(SessionToken::new),
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        }
    }

    /// Whether a session token is stored. Purely local.
    pub fn is_authenticated(&self) -> bool {
        self.store.has_session().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read session token");
            false
        })
    }

    /// Cached user, if present and readable. Purely local.
    pub fn cached_user(&self) -> Option<User> {
        match self.store.get_user::<User>() {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable cached user");
                None
            }
        }
    }

    /// Ask the Auth Endpoint where to log in and send the navigator there.
    ///
    /// Returns the URL navigated to. A response without a redirect URL is a
    /// no-op.
    pub async fn initiate_login(&self) -> Option<Url> {
        match self.try_initiate_login().await {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, transient = e.is_transient(), "Login initiation failed");
                None
            }
        }
    }

    async fn try_initiate_login(&self) -> AuthResult<Option<Url>> {
        let return_url = self.return_url();
        let redirect = self.api.begin_login(&return_url).await?;

        let Some(raw) = redirect.redirect_url.filter(|u| !u.is_empty()) else {
            info!("Auth endpoint returned no redirect URL");
            return Ok(None);
        };

        let url = Url::parse(&raw)?;
        self.navigator.navigate(&url)?;
        info!(host = url.host_str().unwrap_or_default(), "Navigated to identity provider");
        Ok(Some(url))
    }

    /// Exchange provider callback parameters for a session.
    ///
    /// Without `openid.claimed_id` nothing is sent and nothing is written.
    /// On success the token and user are persisted together and the user is
    /// returned. Failures persist nothing.
    pub async fn complete_callback(&self, params: &CallbackParams) -> Option<User> {
        if params.claimed_id().is_none() {
            debug!("Callback has no claimed id, ignoring");
            self.settle_state();
            return None;
        }

        match self.try_complete_callback(params).await {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(
                    error = %e,
                    transient = e.is_transient(),
                    steam_id = params.steam_id().unwrap_or_default(),
                    "Callback exchange failed"
                );
                self.settle_state();
                None
            }
        }
    }

    async fn try_complete_callback(&self, params: &CallbackParams) -> AuthResult<User> {
        let response = self.api.complete_callback(params).await?;
        if !response.success {
            return Err(AuthError::CallbackRejected("success=false".to_string()));
        }

        let token = response
            .session_token
            .ok_or_else(|| AuthError::InvalidResponse("missing session_token".to_string()))?;
        let user = response
            .user
            .ok_or_else(|| AuthError::InvalidResponse("missing user".to_string()))?;

        self.store.set_session(token.as_str(), &user)?;
        self.set_state(SessionState::Authenticated);
        info!(user_id = user.id, steam_id = %user.steam_id, "Session established");
        Ok(user)
    }

    /// Confirm the stored token with the Auth Endpoint.
    ///
    /// No token means no request. On confirmation the cached user is
    /// refreshed and returned; any other outcome discards the local session.
    pub async fn verify(&self) -> Option<User> {
        let Some(token) = self.token() else {
            debug!("No session token, skipping verify");
            if self.state().is_authenticated() {
                self.set_state(SessionState::Anonymous);
            }
            return None;
        };

        match self.try_verify(&token).await {
            Ok(user) => Some(user),
            Err(e) => {
                info!(error = %e, transient = e.is_transient(), "Session verification failed, clearing session");
                if let Err(e) = self.store.clear_session() {
                    warn!(error = %e, "Failed to clear session");
                }
                self.set_state(SessionState::Invalid);
                None
            }
        }
    }

    async fn try_verify(&self, token: &SessionToken) -> AuthResult<User> {
        let response = self.api.verify(token).await?;
        if !response.valid {
            return Err(AuthError::SessionInvalid("valid=false".to_string()));
        }
        let user = response
            .user
            .ok_or_else(|| AuthError::InvalidResponse("missing user".to_string()))?;

        if let Err(e) = self.store.set_user(&user) {
            warn!(error = %e, "Failed to refresh cached user");
        }
        self.set_state(SessionState::Authenticated);
        debug!(user_id = user.id, "Session verified");
        Ok(user)
    }

    /// Drop the session.
    ///
    /// Local state is cleared before this returns, whatever the network
    /// does. If a token was stored, a best-effort server-side logout is
    /// spawned on the current tokio runtime; its handle is returned for
    /// hosts that want to wait for it before exiting.
    pub fn logout(&self) -> Option<JoinHandle<()>> {
        let remote = match self.store.get_token() {
            Ok(Some(token)) => self.spawn_remote_logout(SessionToken::new(token)),
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read session token");
                None
            }
        };

        if let Err(e) = self.store.clear_session() {
            warn!(error = %e, "Failed to clear session");
        }
        self.set_state(SessionState::Anonymous);
        info!("Logged out");
        remote
    }

    fn spawn_remote_logout(&self, token: SessionToken) -> Option<JoinHandle<()>> {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No async runtime, skipping remote logout");
            return None;
        };

        let api = Arc::clone(&self.api);
        Some(handle.spawn(async move {
            match api.logout(&token).await {
                Ok(()) => debug!("Remote logout acknowledged"),
                Err(e) => debug!(error = %e, "Remote logout failed"),
            }
        }))
    }

    /// Resolve the session for a page load.
    ///
    /// A URL carrying `auth_callback=true` completes the provider callback
    /// with its query parameters; any other URL verifies the stored token.
    pub async fn check_auth(&self, page_url: &Url) -> AuthCheck {
        let params = CallbackParams::from_url(page_url);

        if params.is_auth_callback() {
            self.set_state(SessionState::PendingCallback);
            return match self.complete_callback(&params).await {
                Some(user) => AuthCheck::CallbackCompleted(user),
                None => AuthCheck::Anonymous,
            };
        }

        match self.verify().await {
            Some(user) => AuthCheck::Verified(user),
            None => AuthCheck::Anonymous,
        }
    }

    /// Re-derive the state from storage after an operation that changed
    /// nothing.
    fn settle_state(&self) {
        let state = if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        };
        self.set_state(state);
    }

    fn set_state(&self, next: SessionState) {
        let mut state = self.state.lock();
        let prev = *state;
        if prev != next {
            debug!(from = %prev, to = %next, "Session state changed");
            *state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CallbackResponse, LoginRedirect, VerifyResponse};
    use crate::navigator::RecordingNavigator;
    use async_trait::async_trait;
    use hub_storage::memory_store;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pro_gamer() -> User {
        User {
            id: 1,
            steam_id: "76561198000000001".to_string(),
            username: "ProGamer".to_string(),
            avatar_url: "https://avatars.steamstatic.com/a.jpg".to_string(),
        }
    }

    /// Scripted Auth Endpoint that counts calls.
    #[derive(Default)]
    struct FakeAuth {
        calls: AtomicUsize,
        redirect_url: Option<String>,
        callback: Option<CallbackResponse>,
        verify: Option<VerifyResponse>,
    }

    impl FakeAuth {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn unavailable() -> AuthError {
            AuthError::Rejected {
                status: 503,
                body_summary: "len=0".to_string(),
            }
        }
    }

    #[async_trait]
    impl AuthApi for FakeAuth {
        async fn begin_login(&self, _return_url: &str) -> AuthResult<LoginRedirect> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(LoginRedirect {
                redirect_url: self.redirect_url.clone(),
            })
        }

        async fn complete_callback(&self, _params: &CallbackParams) -> AuthResult<CallbackResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.callback.clone().ok_or_else(Self::unavailable)
        }

        async fn verify(&self, _token: &SessionToken) -> AuthResult<VerifyResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.verify.clone().ok_or_else(Self::unavailable)
        }

        async fn logout(&self, _token: &SessionToken) -> AuthResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(Self::unavailable())
        }
    }

    fn manager(store: SessionStore, api: Arc<FakeAuth>) -> (SessionManager, Arc<RecordingNavigator>) {
        let navigator = Arc::new(RecordingNavigator::new());
        let manager = SessionManager::new(
            store,
            api,
            navigator.clone(),
            Url::parse("http://localhost:5173/profile").unwrap(),
        );
        (manager, navigator)
    }

    fn callback_params() -> CallbackParams {
        CallbackParams::from_query(
            "auth_callback=true&openid.claimed_id=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F76561198000000001",
        )
    }

    #[test]
    fn test_initial_state_follows_storage() {
        let store = memory_store();
        let (fresh, _) = manager(store.clone(), Arc::new(FakeAuth::default()));
        assert_eq!(fresh.state(), SessionState::Anonymous);

        store.set_session("abc123", &pro_gamer()).unwrap();
        let (resumed, _) = manager(store, Arc::new(FakeAuth::default()));
        assert_eq!(resumed.state(), SessionState::Authenticated);
        assert!(resumed.is_authenticated());
    }

    #[test]
    fn test_return_url_is_bare_origin() {
        let (manager, _) = manager(memory_store(), Arc::new(FakeAuth::default()));
        assert_eq!(manager.return_url(), "http://localhost:5173");
    }

    #[tokio::test]
    async fn test_initiate_login_navigates() {
        let api = Arc::new(FakeAuth {
            redirect_url: Some("https://steamcommunity.com/openid/login?openid.mode=checkid_setup".to_string()),
            ..Default::default()
        });
        let (manager, navigator) = manager(memory_store(), api);

        let url = manager.initiate_login().await.unwrap();

        assert_eq!(url.host_str(), Some("steamcommunity.com"));
        assert_eq!(navigator.last(), Some(url));
    }

    #[tokio::test]
    async fn test_initiate_login_without_redirect_is_noop() {
        let api = Arc::new(FakeAuth::default());
        let (manager, navigator) = manager(memory_store(), api.clone());

        assert!(manager.initiate_login().await.is_none());
        assert_eq!(api.calls(), 1);
        assert!(navigator.visited().is_empty());
    }

    #[tokio::test]
    async fn test_callback_without_claimed_id_does_nothing() {
        let store = memory_store();
        let api = Arc::new(FakeAuth::default());
        let (manager, _) = manager(store.clone(), api.clone());

        let params = CallbackParams::from_query("auth_callback=true&openid.mode=id_res");
        assert!(manager.complete_callback(&params).await.is_none());

        assert_eq!(api.calls(), 0);
        assert!(!store.has_session().unwrap());
    }

    #[tokio::test]
    async fn test_callback_success_persists_session() {
        let store = memory_store();
        let api = Arc::new(FakeAuth {
            callback: Some(CallbackResponse {
                success: true,
                session_token: Some(SessionToken::new("tok-1")),
                user: Some(pro_gamer()),
            }),
            ..Default::default()
        });
        let (manager, _) = manager(store.clone(), api);

        let user = manager.complete_callback(&callback_params()).await.unwrap();

        assert_eq!(user, pro_gamer());
        assert_eq!(manager.cached_user(), Some(pro_gamer()));
        assert_eq!(manager.token().unwrap().as_str(), "tok-1");
        assert_eq!(manager.state(), SessionState::Authenticated);
    }

    #[tokio::test]
    async fn test_callback_without_token_persists_nothing() {
        let store = memory_store();
        let api = Arc::new(FakeAuth {
            callback: Some(CallbackResponse {
                success: true,
                session_token: None,
                user: Some(pro_gamer()),
            }),
            ..Default::default()
        });
        let (manager, _) = manager(store.clone(), api);

        assert!(manager.complete_callback(&callback_params()).await.is_none());
        assert!(!store.has_session().unwrap());
        assert!(manager.cached_user().is_none());
        assert_eq!(manager.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_verify_without_token_makes_no_call() {
        let api = Arc::new(FakeAuth::default());
        let (manager, _) = manager(memory_store(), api.clone());

        assert!(manager.verify().await.is_none());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn test_verify_refreshes_cached_user() {
        let store = memory_store();
        store.set_session("abc123", &pro_gamer()).unwrap();
        let renamed = User {
            username: "ProGamer2".to_string(),
            ..pro_gamer()
        };
        let api = Arc::new(FakeAuth {
            verify: Some(VerifyResponse {
                valid: true,
                user: Some(renamed.clone()),
            }),
            ..Default::default()
        });
        let (manager, _) = manager(store, api);

        assert_eq!(manager.verify().await, Some(renamed.clone()));
        assert_eq!(manager.cached_user(), Some(renamed));
    }

    #[tokio::test]
    async fn test_verify_invalid_clears_session() {
        let store = memory_store();
        store.set_session("abc123", &pro_gamer()).unwrap();
        let api = Arc::new(FakeAuth {
            verify: Some(VerifyResponse {
                valid: false,
                user: None,
            }),
            ..Default::default()
        });
        let (manager, _) = manager(store.clone(), api.clone());

        assert!(manager.verify().await.is_none());
        assert!(!store.has_session().unwrap());
        assert!(manager.cached_user().is_none());
        assert_eq!(manager.state(), SessionState::Invalid);
        // no follow-up logout request
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_verify_transport_failure_clears_session() {
        let store = memory_store();
        store.set_session("abc123", &pro_gamer()).unwrap();
        let (manager, _) = manager(store.clone(), Arc::new(FakeAuth::default()));

        assert!(manager.verify().await.is_none());
        assert!(!store.has_session().unwrap());
    }

    #[tokio::test]
    async fn test_logout_clears_even_when_remote_fails() {
        let store = memory_store();
        store.set_session("abc123", &pro_gamer()).unwrap();
        let api = Arc::new(FakeAuth::default());
        let (manager, _) = manager(store.clone(), api.clone());

        let remote = manager.logout();

        assert!(!manager.is_authenticated());
        assert!(manager.cached_user().is_none());
        assert_eq!(manager.state(), SessionState::Anonymous);

        remote.unwrap().await.unwrap();
        assert_eq!(api.calls(), 1);
    }

    #[tokio::test]
    async fn test_logout_without_token_skips_remote() {
        let api = Arc::new(FakeAuth::default());
        let (manager, _) = manager(memory_store(), api.clone());

        assert!(manager.logout().is_none());
        assert_eq!(api.calls(), 0);
    }

    #[test]
    fn test_logout_outside_runtime_still_clears() {
        let store = memory_store();
        store.set_session("abc123", &pro_gamer()).unwrap();
        let (manager, _) = manager(store.clone(), Arc::new(FakeAuth::default()));

        assert!(manager.logout().is_none());
        assert!(!store.has_session().unwrap());
    }

    #[test]
    fn test_unreadable_cached_user_is_none() {
        let store = memory_store();
        store.set_session("abc123", &"not a user object").unwrap();
        let (manager, _) = manager(store, Arc::new(FakeAuth::default()));

        assert!(manager.cached_user().is_none());
        assert!(manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_check_auth_routes_callback() {
        let api = Arc::new(FakeAuth {
            callback: Some(CallbackResponse {
                success: true,
                session_token: Some(SessionToken::new("tok-1")),
                user: Some(pro_gamer()),
            }),
            ..Default::default()
        });
        let (manager, _) = manager(memory_store(), api);

        let page = Url::parse(
            "http://localhost:5173/?auth_callback=true&openid.claimed_id=https%3A%2F%2Fsteamcommunity.com%2Fopenid%2Fid%2F76561198000000001",
        )
        .unwrap();
        let check = manager.check_auth(&page).await;

        assert_eq!(check, AuthCheck::CallbackCompleted(pro_gamer()));
        assert_eq!(check.user(), Some(&pro_gamer()));
    }

    #[tokio::test]
    async fn test_check_auth_failed_callback_is_anonymous() {
        let store = memory_store();
        let (manager, _) = manager(store, Arc::new(FakeAuth::default()));

        let page = Url::parse("http://localhost:5173/?auth_callback=true").unwrap();
        assert_eq!(manager.check_auth(&page).await, AuthCheck::Anonymous);
        assert_eq!(manager.state(), SessionState::Anonymous);
    }

    #[tokio::test]
    async fn test_check_auth_plain_page_verifies() {
        let store = memory_store();
        store.set_session("abc123", &pro_gamer()).unwrap();
        let api = Arc::new(FakeAuth {
            verify: Some(VerifyResponse {
                valid: true,
                user: Some(pro_gamer()),
            }),
            ..Default::default()
        });
        let (manager, _) = manager(store, api);

        let page = Url::parse("http://localhost:5173/").unwrap();
        let check = manager.check_auth(&page).await;

        assert_eq!(check.into_user(), Some(pro_gamer()));
    }

    #[test]
    fn test_state_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&SessionState::PendingCallback).unwrap(),
            "\"pending_callback\""
        );
        assert_eq!(SessionState::Invalid.to_string(), "invalid");
    }
}
