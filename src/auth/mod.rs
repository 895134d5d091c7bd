//! Authentication module.

pub mod cookie;
pub mod password;
pub mod service;
pub mod token;

pub use cookie::{clear_refresh_cookie, extract_refresh_token, refresh_cookie, REFRESH_COOKIE};
pub use password::{hash_password, verify_password};
pub use service::{AuthService, DefaultAuth, LoginTokens};
pub use token::{Claims, TokenError, TokenService};
