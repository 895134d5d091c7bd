//! Auth core: login, logout, refresh, and request authorization.
//!
//! Session states per user, conceptually: Anonymous -> Authenticated ->
//! (Refreshed | LoggedOut). All trust decisions live here; handlers only
//! move tokens between HTTP and this service.
use async_trait::async_trait;
use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::{TokenError, TokenService};
use crate::error::AppError;
use crate::models::{CreateUserRequest, Identity, LoginRequest, UserResponse};
use crate::store::{NewUser, Store};

/// Tokens minted by a successful login
#[derive(Debug)]
pub struct LoginTokens {
    pub access_token: String,
    /// Delivered to the client only via the refresh cookie.
    pub refresh_token: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a user with a hashed password and no refresh token
    async fn register(&self, input: CreateUserRequest) -> Result<UserResponse, AppError>;

    /// Verify credentials and mint a fresh token pair, rotating the stored
    /// refresh token
    async fn login(&self, input: LoginRequest) -> Result<LoginTokens, AppError>;

    /// Verify a bearer access token and establish the caller's identity
    fn authorize(&self, bearer: &str) -> Result<Identity, AppError>;

    /// Mint a new access token for the holder of a valid stored refresh token
    async fn refresh(&self, presented: &str) -> Result<String, AppError>;

    /// Invalidate the stored refresh token matching `presented`, if any
    async fn logout(&self, presented: Option<&str>) -> Result<(), AppError>;
}

/// Default auth core over a [`Store`] and a [`TokenService`]
pub struct DefaultAuth {
    store: Arc<dyn Store>,
    tokens: TokenService,
}

impl DefaultAuth {
    pub fn new(store: Arc<dyn Store>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }
}

#[async_trait]
impl AuthService for DefaultAuth {
    async fn register(&self, input: CreateUserRequest) -> Result<UserResponse, AppError> {
        let password_hash =
            hash_password(&input.password).map_err(|e| AppError::Internal(e.to_string()))?;

        let user = self
            .store
            .create_user(NewUser {
                username: input.username,
                email: input.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(user.to_response())
    }

    async fn login(&self, input: LoginRequest) -> Result<LoginTokens, AppError> {
        // Unknown email and wrong password take the same exit so the client
        // cannot enumerate accounts.
        let user = self
            .store
            .user_by_email(&input.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(&user.password_hash, &input.password) {
            tracing::warn!(user_id = user.id, "login rejected");
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self
            .tokens
            .issue_access(user.id)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let refresh_token = self
            .tokens
            .issue_refresh(user.id)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        // Overwrite, not append: this invalidates any refresh token issued
        // by an earlier login.
        self.store
            .set_refresh_token(user.id, Some(&refresh_token))
            .await?;

        tracing::info!(user_id = user.id, "login succeeded");
        Ok(LoginTokens {
            access_token,
            refresh_token,
        })
    }

    fn authorize(&self, bearer: &str) -> Result<Identity, AppError> {
        match self.tokens.verify(bearer) {
            Ok(claims) => Ok(Identity {
                user_id: claims.sub,
            }),
            Err(TokenError::Expired) => {
                tracing::debug!("access token expired");
                Err(AppError::Unauthorized)
            }
            Err(TokenError::Invalid) => {
                tracing::debug!("access token rejected");
                Err(AppError::Unauthorized)
            }
        }
    }

    async fn refresh(&self, presented: &str) -> Result<String, AppError> {
        // Two-step trust model: the decode only recovers the candidate user
        // id. The trust anchor is the match against the token stored
        // server-side, which login rotation and logout both invalidate.
        let claims = self
            .tokens
            .decode_unverified(presented)
            .map_err(|_| AppError::Forbidden)?;

        let user = self
            .store
            .user_by_refresh_token(presented)
            .await?
            .ok_or(AppError::Forbidden)?;

        // Desync defense: the stored token's owner must match the claim.
        if user.id != claims.sub {
            tracing::warn!(
                user_id = user.id,
                claimed = claims.sub,
                "refresh token owner mismatch"
            );
            return Err(AppError::Forbidden);
        }

        // The refresh token itself is not rotated here; only login rotates it.
        let access_token = self
            .tokens
            .issue_access(user.id)
            .map_err(|e| AppError::Internal(e.to_string()))?;
        tracing::info!(user_id = user.id, "access token refreshed");
        Ok(access_token)
    }

    async fn logout(&self, presented: Option<&str>) -> Result<(), AppError> {
        // A missing token means the client is already logged out; the
        // handler still clears the cookie.
        let Some(token) = presented else {
            return Ok(());
        };

        if let Some(user) = self.store.user_by_refresh_token(token).await? {
            self.store.set_refresh_token(user.id, None).await?;
            tracing::info!(user_id = user.id, "logout");
        }
        Ok(())
    }
}
