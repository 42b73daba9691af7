//! Self-healing credential store.
//!
//! Sole source of truth for whether the client holds a usable bearer token.
//! Every read path validates what it finds and deletes anything corrupted
//! or expired as a side effect, so a bad value can never be returned twice.
//! Nothing in here returns an error to callers: storage failures and
//! malformed material all degrade to "no credential available".

use tracing::{debug, info, warn};

use super::claims;
use super::storage::TokenStorage;

/// Storage key for the bearer token
pub const ACCESS_TOKEN_KEY: &str = "accessToken";

/// Storage key for the (stored but never exchanged) refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Overall store condition, for the debug surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Healthy,
    Empty,
    Corrupted,
}

impl std::fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreStatus::Healthy => write!(f, "healthy"),
            StoreStatus::Empty => write!(f, "empty"),
            StoreStatus::Corrupted => write!(f, "corrupted"),
        }
    }
}

/// Non-destructive store report for the `status` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreHealth {
    pub status: StoreStatus,
    pub access_token: bool,
    pub refresh_token: bool,
    pub corrupted: bool,
}

pub struct TokenStore {
    storage: Box<dyn TokenStorage>,
}

impl TokenStore {
    /// Create a store over the given persistence backend.
    /// Constructed once at startup and shared by reference.
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self { storage }
    }

    /// Persist a token pair issued by the backend.
    ///
    /// Rejects the whole pair (logged no-op) if any supplied token fails the
    /// shape check. Callers that need confirmation re-query the store.
    pub fn save(&self, access_token: &str, refresh_token: Option<&str>) {
        if !claims::is_well_formed(access_token) {
            warn!("Refusing to save structurally invalid access token");
            return;
        }
        if let Some(refresh) = refresh_token {
            if !claims::is_well_formed(refresh) {
                warn!("Refusing to save structurally invalid refresh token");
                return;
            }
        }

        self.write(ACCESS_TOKEN_KEY, access_token);
        match refresh_token {
            Some(refresh) => self.write(REFRESH_TOKEN_KEY, refresh),
            // A pair without a refresh token replaces the pair wholesale;
            // never mix a new access token with an old refresh token.
            None => self.delete(REFRESH_TOKEN_KEY),
        }
    }

    /// Untouched read of the stored bearer token: no validation, no purge.
    ///
    /// Used by validity checks and the bootstrap presence test so they never
    /// recurse into the purging read path.
    pub fn raw_access_token(&self) -> Option<String> {
        self.read(ACCESS_TOKEN_KEY)
    }

    /// The bearer token, if one is stored, well-formed, and unexpired.
    ///
    /// Detecting an invalid or expired value deletes it before returning
    /// `None`.
    pub fn access_token(&self) -> Option<String> {
        self.purge_corrupted();

        let token = self.read(ACCESS_TOKEN_KEY)?;
        if !claims::is_well_formed(&token) {
            warn!("Purging structurally invalid access token");
            self.delete(ACCESS_TOKEN_KEY);
            return None;
        }
        if claims::is_expired(&token) {
            debug!("Stored access token expired, purging");
            self.delete(ACCESS_TOKEN_KEY);
            return None;
        }
        Some(token)
    }

    /// The refresh token, if stored and well-formed. Shape check only; the
    /// client never decodes refresh token expiry.
    pub fn refresh_token(&self) -> Option<String> {
        self.purge_corrupted();

        let token = self.read(REFRESH_TOKEN_KEY)?;
        if !claims::is_well_formed(&token) {
            warn!("Purging structurally invalid refresh token");
            self.delete(REFRESH_TOKEN_KEY);
            return None;
        }
        Some(token)
    }

    /// True iff a raw access token exists, is well-formed, and is unexpired.
    /// Deliberately side-effect free.
    pub fn has_valid_credential(&self) -> bool {
        match self.raw_access_token() {
            Some(token) => claims::is_well_formed(&token) && !claims::is_expired(&token),
            None => false,
        }
    }

    /// Delete both tokens unconditionally.
    pub fn clear(&self) {
        self.delete(ACCESS_TOKEN_KEY);
        self.delete(REFRESH_TOKEN_KEY);
    }

    /// Same effect as `clear`, exposed for manual/debug invocation.
    pub fn force_clear(&self) {
        info!("Force-clearing credential store");
        self.clear();
    }

    /// Non-destructive report of what the store currently holds.
    pub fn health(&self) -> StoreHealth {
        let access = self.raw_access_token();
        let refresh = self.read(REFRESH_TOKEN_KEY);

        let corrupted = access
            .as_deref()
            .map(|t| !claims::is_well_formed(t))
            .unwrap_or(false)
            || refresh
                .as_deref()
                .map(|t| !claims::is_well_formed(t))
                .unwrap_or(false);

        let status = if corrupted {
            StoreStatus::Corrupted
        } else if access.is_none() && refresh.is_none() {
            StoreStatus::Empty
        } else {
            StoreStatus::Healthy
        };

        StoreHealth {
            status,
            access_token: access.is_some(),
            refresh_token: refresh.is_some(),
            corrupted,
        }
    }

    /// Delete any stored token that fails the shape check.
    /// Runs at the top of every validated read.
    fn purge_corrupted(&self) {
        for key in [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY] {
            if let Some(token) = self.read(key) {
                if !claims::is_well_formed(&token) {
                    warn!(key, "Purging corrupted token from storage");
                    self.delete(key);
                }
            }
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Token storage read failed");
                None
            }
        }
    }

    fn write(&self, key: &str, value: &str) {
        if let Err(e) = self.storage.set(key, value) {
            warn!(key, error = %e, "Token storage write failed");
        }
    }

    fn delete(&self, key: &str) {
        if let Err(e) = self.storage.remove(key) {
            warn!(key, error = %e, "Token storage delete failed");
        }
    }
}
