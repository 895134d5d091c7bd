//! Refresh-token cookie handling.
//!
//! The refresh token travels only in an httpOnly cookie, never in a response
//! body. Built and parsed over the raw `Set-Cookie`/`Cookie` headers.
use axum::http::{header, HeaderMap, HeaderValue};

/// Cookie name carrying the refresh token
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Build the `Set-Cookie` value delivering a refresh token. httpOnly and
/// Secure with SameSite=None so a cross-site frontend can send it back.
pub fn refresh_cookie(token: &str, max_age_secs: u64) -> HeaderValue {
    let value = format!(
        "{REFRESH_COOKIE}={token}; Max-Age={max_age_secs}; Path=/; HttpOnly; Secure; SameSite=None"
    );
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static(""))
}

/// Build the `Set-Cookie` value that clears the refresh cookie
pub fn clear_refresh_cookie() -> HeaderValue {
    HeaderValue::from_static(
        "refreshToken=; Max-Age=0; Path=/; HttpOnly; Secure; SameSite=None",
    )
}

/// Extract the refresh token from a request's `Cookie` header, if present
pub fn extract_refresh_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == REFRESH_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}
