//! API client for communicating with the LinguaNote REST backend.
//!
//! Every outgoing request asks the token store for a validated access token
//! and attaches it as a bearer credential when one is available; requests go
//! out unauthenticated otherwise, and the backend decides whether the
//! endpoint requires auth. A 401 on any endpoint clears the store before the
//! error reaches the caller, so no stale credential survives a rejection.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::TokenStore;
use crate::models::{
    AuthResponse, DailyPhrase, DashboardSummary, Flashcard, NewFlashcard, NewVocabularyEntry,
    User, VerifyResponse, VocabularyEntry, VocabularyStats,
};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Hosted backend, overridable via config for self-hosted deployments
pub const DEFAULT_BASE_URL: &str = "https://api.linguanote.app";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the LinguaNote backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<TokenStore>,
}

impl ApiClient {
    /// Create a new API client over the given token store
    pub fn new(base_url: impl Into<String>, store: Arc<TokenStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            store,
        })
    }

    pub fn store(&self) -> &TokenStore {
        &self.store
    }

    // ===== Request plumbing =====

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self.client.request(method, &url);

        // Validated read: an expired or corrupted token is purged here and
        // the request simply goes out unauthenticated.
        if let Some(token) = self.store.access_token() {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder
    }

    /// Send a request and apply the shared response policy: a 401 clears the
    /// credential store before surfacing; everything else maps through the
    /// error taxonomy. One shot, no retries.
    async fn execute(&self, builder: RequestBuilder, path: &str) -> Result<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(ApiError::NetworkError)
            .with_context(|| format!("Failed to send request to {}", path))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status.as_u16() == 401 {
            warn!(path, "Backend rejected credentials, clearing token store");
            self.store.clear();
            return Err(ApiError::Unauthorized.into());
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::from_status(status, &body).into())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(self.request(Method::GET, path), path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let builder = self.request(Method::POST, path).json(body);
        let response = self.execute(builder, path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let builder = self.request(Method::PUT, path).json(body);
        let response = self.execute(builder, path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.execute(self.request(Method::DELETE, path), path)
            .await?;
        Ok(())
    }

    // ===== Auth endpoints =====

    /// Exchange credentials for a token pair. Persisting the pair is the
    /// session layer's job.
    pub async fn login(&self, username: &str, password: &str) -> Result<AuthResponse> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
        });
        self.post("/auth/login", &body).await
    }

    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        self.post("/auth/register", &body).await
    }

    /// Server-side logout. Callers treat failure as non-fatal; the local
    /// purge happens regardless.
    pub async fn logout(&self) -> Result<()> {
        let builder = self.request(Method::POST, "/auth/logout");
        self.execute(builder, "/auth/logout").await?;
        Ok(())
    }

    /// Ask the backend whether the stored token still identifies a user
    pub async fn verify_token(&self) -> Result<VerifyResponse> {
        self.get("/auth/verify-token").await
    }

    // ===== Vocabulary =====

    pub async fn fetch_vocabulary(&self) -> Result<Vec<VocabularyEntry>> {
        self.get("/vocabulary").await
    }

    pub async fn create_vocabulary(&self, entry: &NewVocabularyEntry) -> Result<VocabularyEntry> {
        self.post("/vocabulary", entry).await
    }

    pub async fn update_vocabulary(
        &self,
        id: i64,
        entry: &NewVocabularyEntry,
    ) -> Result<VocabularyEntry> {
        self.put(&format!("/vocabulary/{}", id), entry).await
    }

    pub async fn delete_vocabulary(&self, id: i64) -> Result<()> {
        self.delete(&format!("/vocabulary/{}", id)).await
    }

    pub async fn toggle_favorite(&self, id: i64) -> Result<VocabularyEntry> {
        let path = format!("/vocabulary/{}/favorite", id);
        let builder = self.request(Method::PATCH, &path);
        let response = self.execute(builder, &path).await?;
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    pub async fn fetch_vocabulary_stats(&self) -> Result<VocabularyStats> {
        self.get("/vocabulary/stats").await
    }

    // ===== Flashcards =====

    pub async fn fetch_flashcards(&self) -> Result<Vec<Flashcard>> {
        self.get("/flashcards").await
    }

    pub async fn create_flashcard(&self, card: &NewFlashcard) -> Result<Flashcard> {
        self.post("/flashcards", card).await
    }

    pub async fn update_flashcard(&self, id: i64, card: &NewFlashcard) -> Result<Flashcard> {
        self.put(&format!("/flashcards/{}", id), card).await
    }

    pub async fn delete_flashcard(&self, id: i64) -> Result<()> {
        self.delete(&format!("/flashcards/{}", id)).await
    }

    // ===== Dashboard =====

    pub async fn fetch_daily_phrase(&self) -> Result<DailyPhrase> {
        self.get("/daily-phrases/today").await
    }

    pub async fn fetch_profile(&self) -> Result<User> {
        self.get("/users/profile").await
    }

    pub async fn fetch_dashboard(&self) -> Result<DashboardSummary> {
        self.get("/users/dashboard").await
    }

    /// Everything the dashboard view needs, fetched in parallel
    pub async fn fetch_dashboard_overview(
        &self,
    ) -> Result<(DashboardSummary, VocabularyStats, DailyPhrase)> {
        debug!("Fetching dashboard overview");
        futures::try_join!(
            self.fetch_dashboard(),
            self.fetch_vocabulary_stats(),
            self.fetch_daily_phrase(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::testing::token_with_exp;
    use crate::auth::storage::{MemoryStorage, TokenStorage as _};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

    struct NoAuthHeader;

    impl Match for NoAuthHeader {
        fn matches(&self, request: &Request) -> bool {
            !request.headers.contains_key("authorization")
        }
    }

    fn client_with_store(base_url: &str) -> (ApiClient, Arc<TokenStore>) {
        let store = Arc::new(TokenStore::new(Box::new(MemoryStorage::new())));
        let client = ApiClient::new(base_url, store.clone()).unwrap();
        (client, store)
    }

    fn fresh_token() -> String {
        token_with_exp(chrono::Utc::now().timestamp() + 3600)
    }

    #[tokio::test]
    async fn test_bearer_attached_when_token_present() {
        let server = MockServer::start().await;
        let (client, store) = client_with_store(&server.uri());

        let token = fresh_token();
        store.save(&token, None);

        Mock::given(method("GET"))
            .and(path("/vocabulary"))
            .and(header("authorization", format!("Bearer {}", token)))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let entries = client.fetch_vocabulary().await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_request_goes_out_unauthenticated_without_token() {
        let server = MockServer::start().await;
        let (client, _store) = client_with_store(&server.uri());

        Mock::given(method("GET"))
            .and(path("/daily-phrases/today"))
            .and(NoAuthHeader)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 7,
                "phrase": "break a leg",
            })))
            .expect(1)
            .mount(&server)
            .await;

        let phrase = client.fetch_daily_phrase().await.unwrap();
        assert_eq!(phrase.phrase, "break a leg");
    }

    #[tokio::test]
    async fn test_401_clears_store_on_any_endpoint() {
        let server = MockServer::start().await;
        let (client, store) = client_with_store(&server.uri());
        store.save(&fresh_token(), Some(&fresh_token()));

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client.fetch_flashcards().await.unwrap_err();
        let api_err = err.downcast_ref::<ApiError>().unwrap();
        assert!(api_err.is_unauthorized());

        // Storage is empty afterward, both slots
        assert!(store.raw_access_token().is_none());
        assert!(store.refresh_token().is_none());
    }

    #[tokio::test]
    async fn test_non_auth_errors_propagate_without_clearing() {
        let server = MockServer::start().await;
        let (client, store) = client_with_store(&server.uri());
        store.save(&fresh_token(), None);

        Mock::given(method("GET"))
            .and(path("/vocabulary"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let err = client.fetch_vocabulary().await.unwrap_err();
        match err.downcast_ref::<ApiError>().unwrap() {
            ApiError::NotFound(_) => {}
            other => panic!("expected NotFound, got {:?}", other),
        }
        // Credentials survive non-401 failures
        assert!(store.has_valid_credential());
    }

    #[tokio::test]
    async fn test_connection_failure_maps_to_network_error() {
        // Port 1 is never listening; the connect is refused immediately
        let (client, store) = client_with_store("http://127.0.0.1:1");
        store.save(&fresh_token(), None);

        let err = client.fetch_vocabulary().await.unwrap_err();
        match err.downcast_ref::<ApiError>().unwrap() {
            ApiError::NetworkError(_) => {}
            other => panic!("expected NetworkError, got {:?}", other),
        }
        // Transport failure is not an auth failure; credentials survive
        assert!(store.has_valid_credential());
    }

    #[tokio::test]
    async fn test_login_parses_token_pair() {
        let server = MockServer::start().await;
        let (client, _store) = client_with_store(&server.uri());

        let token = fresh_token();
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": token,
                "refreshToken": null,
                "user": { "id": 1, "username": "mira" },
            })))
            .mount(&server)
            .await;

        let auth = client.login("mira", "hunter2").await.unwrap();
        assert_eq!(auth.token, token);
        assert_eq!(auth.user.username, "mira");
        assert!(auth.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_expired_stored_token_sends_unauthenticated() {
        let server = MockServer::start().await;

        // Inject an expired-but-well-formed token directly into storage
        let backing = Arc::new(MemoryStorage::new());
        backing
            .set(
                crate::auth::store::ACCESS_TOKEN_KEY,
                &token_with_exp(chrono::Utc::now().timestamp() - 60),
            )
            .unwrap();
        let store = Arc::new(TokenStore::new(Box::new(backing.clone())));
        let client = ApiClient::new(server.uri(), store.clone()).unwrap();

        Mock::given(method("GET"))
            .and(path("/vocabulary/stats"))
            .and(NoAuthHeader)
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 3,
            })))
            .expect(1)
            .mount(&server)
            .await;

        let stats = client.fetch_vocabulary_stats().await.unwrap();
        assert_eq!(stats.total, 3);
        // The expired token was purged by the outbound read
        assert!(store.raw_access_token().is_none());
    }
}
