//! User registration and auth flow handlers.
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::auth::{clear_refresh_cookie, extract_refresh_token, refresh_cookie};
use crate::error::AppError;
use crate::handlers::AppJson;
use crate::models::{AccessTokenResponse, CreateUserRequest, LoginRequest};
use crate::validation;
use crate::AppState;

/// POST /api/users
pub async fn register(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_create_user(&body)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = state.auth.register(body).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    AppJson(body): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_email(&body.email)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    if body.password.is_empty() {
        return Err(AppError::Validation("password must not be empty".to_string()));
    }

    let tokens = state.auth.login(body).await?;

    // The refresh token goes out only in the cookie; the body carries the
    // access token alone.
    let cookie = refresh_cookie(
        &tokens.refresh_token,
        state.settings.refresh_token_ttl_secs,
    );
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AccessTokenResponse {
            access_token: tokens.access_token,
        }),
    ))
}

/// POST /api/users/logout
///
/// A missing cookie is treated as already logged out; the response clears
/// the cookie either way so no stale client state lingers.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let presented = extract_refresh_token(&headers);
    state.auth.logout(presented.as_deref()).await?;

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_refresh_cookie())],
    ))
}

/// GET /api/users/refresh
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AppError> {
    let presented = extract_refresh_token(&headers).ok_or(AppError::Forbidden)?;
    let access_token = state.auth.refresh(&presented).await?;
    Ok(Json(AccessTokenResponse { access_token }))
}
