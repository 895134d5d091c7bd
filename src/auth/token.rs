//! Signed, time-bound access and refresh tokens.
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token verification failures. An expired-but-validly-signed token is
/// classified distinctly from a corrupt or forged one; both map to 401 at the
/// HTTP boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("token invalid")]
    Invalid,
}

/// The identity claim carried by both token kinds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Owning user id
    pub sub: i64,
    /// Expiry as a unix timestamp
    pub exp: i64,
}

/// Issues and verifies HS256-signed tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    pub fn new(secret: &str, access_ttl_secs: u64, refresh_ttl_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::seconds(access_ttl_secs as i64),
            refresh_ttl: Duration::seconds(refresh_ttl_secs as i64),
        }
    }

    fn issue(&self, user_id: i64, ttl: Duration) -> anyhow::Result<String> {
        let claims = Claims {
            sub: user_id,
            exp: (Utc::now() + ttl).timestamp(),
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok(token)
    }

    /// Issue a short-lived access token
    pub fn issue_access(&self, user_id: i64) -> anyhow::Result<String> {
        self.issue(user_id, self.access_ttl)
    }

    /// Issue a refresh token; the caller persists it on the user row
    pub fn issue_refresh(&self, user_id: i64) -> anyhow::Result<String> {
        self.issue(user_id, self.refresh_ttl)
    }

    /// Full verification: signature plus expiry
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Token lifetimes come from config alone; no expiry leeway.
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    /// Decode claims without verifying signature or expiry.
    ///
    /// Decoding alone is never authentication. The only caller is the refresh
    /// flow, where the trust anchor is the match against the refresh token
    /// stored server-side; this just recovers the candidate user id.
    pub fn decode_unverified(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}
