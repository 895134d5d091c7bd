//! Configuration management.
use anyhow::Result;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::net::SocketAddr;

/// Application settings
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    /// Secret used to sign access and refresh tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token lifetime in seconds
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: u64,
    /// Refresh token lifetime in seconds
    #[serde(default = "default_refresh_ttl")]
    pub refresh_token_ttl_secs: u64,
    /// Origins allowed by the CORS layer
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

fn default_bind_addr() -> SocketAddr {
    "0.0.0.0:3000".parse().unwrap()
}

fn default_jwt_secret() -> String {
    // Overridden by NOTEKEEP_JWT_SECRET in any real deployment.
    "insecure-dev-secret".to_string()
}

fn default_access_ttl() -> u64 {
    60 * 10 // 10 minutes
}

fn default_refresh_ttl() -> u64 {
    60 * 60 * 24 // 1 day
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            jwt_secret: default_jwt_secret(),
            access_token_ttl_secs: default_access_ttl(),
            refresh_token_ttl_secs: default_refresh_ttl(),
            allowed_origins: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `notekeep.toml` then `NOTEKEEP_`-prefixed
    /// environment variables (env wins).
    pub fn load() -> Result<Self> {
        let settings = Figment::new()
            .merge(Toml::file("notekeep.toml"))
            .merge(Env::prefixed("NOTEKEEP_"))
            .extract()?;
        Ok(settings)
    }
}
