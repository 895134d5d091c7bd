//! Multi-tenant note-taking backend: users register and authenticate, then
//! manage a private collection of color-tagged notes with archive/search
//! filtering. The auth core issues short-lived access tokens and per-user
//! rotated refresh tokens.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;
pub mod validation;

use std::sync::Arc;

use crate::auth::{AuthService, DefaultAuth, TokenService};
use crate::config::Settings;
use crate::store::Store;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Authentication core
    pub auth: Arc<dyn AuthService>,
    /// Credential and note store
    pub store: Arc<dyn Store>,
    /// Settings
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Create a new application state
    pub fn new(store: Arc<dyn Store>, settings: Settings) -> Self {
        let tokens = TokenService::new(
            &settings.jwt_secret,
            settings.access_token_ttl_secs,
            settings.refresh_token_ttl_secs,
        );
        let auth = Arc::new(DefaultAuth::new(store.clone(), tokens));

        Self {
            auth,
            store,
            settings: Arc::new(settings),
        }
    }
}
