//! Structural token validation.
//!
//! LinguaNote issues JWT-shaped bearer tokens. The client never verifies
//! signatures (the backend is the authority); it only checks that a token
//! has the three-segment shape and an `exp` claim, so that obviously dead
//! or corrupted tokens are never sent over the wire.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClaimsError {
    #[error("token is not a three-segment JWT")]
    Malformed,

    #[error("token payload is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("token payload is not a JSON object with an exp claim")]
    Payload,
}

/// Claims the client cares about. Anything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry instant, seconds since the Unix epoch.
    pub exp: i64,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl TokenClaims {
    /// Expired if `exp` is strictly in the past.
    pub fn is_expired(&self) -> bool {
        self.exp < Utc::now().timestamp()
    }

    /// Expiry as a timestamp, for redacted display in `status` output.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }
}

/// Decode the payload segment of a JWT-shaped token.
///
/// Requires exactly three non-empty dot-separated segments and a base64url
/// payload that parses to a JSON object carrying `exp`. Any failure along
/// the way means the token is structurally invalid.
pub fn decode_claims(token: &str) -> Result<TokenClaims, ClaimsError> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return Err(ClaimsError::Malformed);
    }

    // Tolerate issuers that pad the payload segment.
    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(payload)?;

    serde_json::from_slice(&bytes).map_err(|_| ClaimsError::Payload)
}

/// Shape check only; says nothing about expiry.
pub fn is_well_formed(token: &str) -> bool {
    decode_claims(token).is_ok()
}

/// Expiry check, fail-closed: a token we cannot decode counts as expired.
pub fn is_expired(token: &str) -> bool {
    match decode_claims(token) {
        Ok(claims) => claims.is_expired(),
        Err(_) => true,
    }
}
