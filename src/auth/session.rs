//! Session lifecycle: bootstrap, login, logout.
//!
//! `SessionManager` owns the in-memory answer to "who is logged in right
//! now". On startup it re-establishes a session from stored credentials by
//! asking the backend to verify them; every failure path degrades to an
//! anonymous session with the store purged, never an error surfaced to the
//! caller.

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::models::User;

use super::TokenStore;

/// Per-process session state machine.
///
/// `Unchecked` → `Anonymous` (no stored token)
/// `Unchecked` → `Verifying` → `Authenticated` | `Anonymous`
#[derive(Debug, Clone)]
pub enum SessionState {
    Unchecked,
    Verifying,
    Authenticated(User),
    Anonymous,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }
}

pub struct SessionManager {
    api: ApiClient,
    store: Arc<TokenStore>,
    state: SessionState,
}

impl SessionManager {
    pub fn new(api: ApiClient, store: Arc<TokenStore>) -> Self {
        Self {
            api,
            store,
            state: SessionState::Unchecked,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    pub fn current_user(&self) -> Option<&User> {
        match &self.state {
            SessionState::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    /// Re-establish a session from stored credentials, once per process.
    ///
    /// A raw presence check gates the network call: no stored token means no
    /// verify request. Any verification failure purges the store and lands
    /// on `Anonymous`; nothing escapes as an error.
    pub async fn bootstrap(&mut self) -> &SessionState {
        if !matches!(self.state, SessionState::Unchecked) {
            return &self.state;
        }

        if self.store.raw_access_token().is_none() {
            debug!("No stored credentials, starting anonymous");
            self.state = SessionState::Anonymous;
            return &self.state;
        }

        self.state = SessionState::Verifying;

        match self.api.verify_token().await {
            Ok(response) if response.valid => match response.user {
                Some(user) => {
                    info!(username = %user.username, "Session restored");
                    self.state = SessionState::Authenticated(user);
                }
                None => {
                    warn!("Verify response valid but carried no user, purging session");
                    self.store.clear();
                    self.state = SessionState::Anonymous;
                }
            },
            Ok(_) => {
                info!("Backend reports stored token invalid, purging session");
                self.store.clear();
                self.state = SessionState::Anonymous;
            }
            Err(e) => {
                // A 401 already cleared the store in the request pipeline;
                // clearing again is idempotent.
                warn!(error = %e, "Token verification failed, purging session");
                self.store.clear();
                self.state = SessionState::Anonymous;
            }
        }

        &self.state
    }

    /// Authenticate and persist the issued token pair
    pub async fn login(&mut self, username: &str, password: &str) -> Result<&User> {
        let auth = self.api.login(username, password).await?;
        self.store.save(&auth.token, auth.refresh_token.as_deref());
        self.state = SessionState::Authenticated(auth.user);
        match &self.state {
            SessionState::Authenticated(user) => Ok(user),
            _ => unreachable!(),
        }
    }

    /// Create an account and persist the issued token pair
    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> Result<&User> {
        let auth = self.api.register(username, email, password).await?;
        self.store.save(&auth.token, auth.refresh_token.as_deref());
        self.state = SessionState::Authenticated(auth.user);
        match &self.state {
            SessionState::Authenticated(user) => Ok(user),
            _ => unreachable!(),
        }
    }

    /// End the session. The server call is best-effort; the local purge
    /// happens no matter what.
    pub async fn logout(&mut self) {
        if let Err(e) = self.api.logout().await {
            warn!(error = %e, "Server logout failed, purging locally anyway");
        }
        self.store.clear();
        self.state = SessionState::Anonymous;
    }

    /// Drop the in-memory session after the pipeline reported a 401.
    /// The store is already clear at that point; this makes it idempotent.
    pub fn invalidate(&mut self) {
        self.store.clear();
        self.state = SessionState::Anonymous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::testing::token_with_exp;
    use crate::auth::storage::{MemoryStorage, TokenStorage};
    use crate::auth::store::ACCESS_TOKEN_KEY;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fresh_token() -> String {
        token_with_exp(chrono::Utc::now().timestamp() + 3600)
    }

    fn manager(base_url: &str) -> (SessionManager, Arc<TokenStore>) {
        let store = Arc::new(TokenStore::new(Box::new(MemoryStorage::new())));
        let api = ApiClient::new(base_url, store.clone()).unwrap();
        (SessionManager::new(api, store.clone()), store)
    }

    fn manager_with_stored_token(base_url: &str) -> (SessionManager, Arc<TokenStore>) {
        let backing = Arc::new(MemoryStorage::new());
        backing.set(ACCESS_TOKEN_KEY, &fresh_token()).unwrap();
        let store = Arc::new(TokenStore::new(Box::new(backing)));
        let api = ApiClient::new(base_url, store.clone()).unwrap();
        (SessionManager::new(api, store.clone()), store)
    }

    #[tokio::test]
    async fn test_bootstrap_without_token_skips_network() {
        let server = MockServer::start().await;
        let (mut session, _store) = manager(&server.uri());

        Mock::given(method("GET"))
            .and(path("/auth/verify-token"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        session.bootstrap().await;
        assert!(matches!(session.state(), SessionState::Anonymous));
    }

    #[tokio::test]
    async fn test_bootstrap_restores_session_on_valid_token() {
        let server = MockServer::start().await;
        let (mut session, _store) = manager_with_stored_token(&server.uri());

        Mock::given(method("GET"))
            .and(path("/auth/verify-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "valid": true,
                "user": { "id": 5, "username": "mira" },
            })))
            .mount(&server)
            .await;

        session.bootstrap().await;
        assert_eq!(session.current_user().unwrap().username, "mira");
    }

    #[tokio::test]
    async fn test_bootstrap_purges_on_invalid_verdict() {
        let server = MockServer::start().await;
        let (mut session, store) = manager_with_stored_token(&server.uri());

        Mock::given(method("GET"))
            .and(path("/auth/verify-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "valid": false,
                "user": null,
            })))
            .mount(&server)
            .await;

        session.bootstrap().await;
        assert!(matches!(session.state(), SessionState::Anonymous));
        assert!(store.raw_access_token().is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_purges_on_server_error() {
        let server = MockServer::start().await;
        let (mut session, store) = manager_with_stored_token(&server.uri());

        Mock::given(method("GET"))
            .and(path("/auth/verify-token"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        // Must not panic or surface an error
        session.bootstrap().await;
        assert!(matches!(session.state(), SessionState::Anonymous));
        assert!(store.raw_access_token().is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_runs_once_per_load() {
        let server = MockServer::start().await;
        let (mut session, store) = manager(&server.uri());

        session.bootstrap().await;
        assert!(matches!(session.state(), SessionState::Anonymous));

        // A token appearing later does not re-trigger verification
        store.save(&fresh_token(), None);
        session.bootstrap().await;
        assert!(matches!(session.state(), SessionState::Anonymous));
    }

    #[tokio::test]
    async fn test_login_persists_pair() {
        let server = MockServer::start().await;
        let (mut session, store) = manager(&server.uri());

        let token = fresh_token();
        let refresh = fresh_token();
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": token,
                "refreshToken": refresh,
                "user": { "id": 1, "username": "mira" },
            })))
            .mount(&server)
            .await;

        session.login("mira", "hunter2").await.unwrap();
        assert!(session.is_authenticated());
        assert!(store.has_valid_credential());
        assert_eq!(store.refresh_token().as_deref(), Some(refresh.as_str()));
    }

    #[tokio::test]
    async fn test_logout_purges_even_when_server_fails() {
        let server = MockServer::start().await;
        let (mut session, store) = manager(&server.uri());
        store.save(&fresh_token(), None);

        Mock::given(method("POST"))
            .and(path("/auth/logout"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        session.logout().await;
        assert!(matches!(session.state(), SessionState::Anonymous));
        assert!(store.raw_access_token().is_none());
    }
}
