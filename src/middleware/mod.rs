//! Request middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::{error::AppError, AppState};

/// Bearer-token guard for protected routes.
///
/// Extracts the access token from the Authorization header, verifies it, and
/// attaches the caller's [`Identity`](crate::models::Identity) as a request
/// extension. Missing or failed verification is `Unauthorized`, with no
/// fallback.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let bearer = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(AppError::Unauthorized)?;

    let identity = state.auth.authorize(bearer)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
