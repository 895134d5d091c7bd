//! Boundary validation for request bodies.
//!
//! Validation runs before any core logic; a failed check never reaches the
//! auth core or the store.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::models::{CreateNoteRequest, CreateUserRequest, UpdateNoteRequest};

const MIN_USERNAME_LENGTH: usize = 2;
const MAX_USERNAME_LENGTH: usize = 20;
const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 24;
const MAX_EMAIL_LENGTH: usize = 254; // RFC 5321 SMTP limit

/// Special characters accepted by the password policy
const PASSWORD_SPECIALS: &str = "!@#$%";

static EMAIL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Possible validation errors
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),

    #[error("Invalid note: {0}")]
    InvalidNote(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a username
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    let len = username.chars().count();
    if !(MIN_USERNAME_LENGTH..=MAX_USERNAME_LENGTH).contains(&len) {
        return Err(ValidationError::InvalidUsername(format!(
            "username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }
    Ok(username)
}

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(
            "email length out of range".to_string(),
        ));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "email format is invalid".to_string(),
        ));
    }
    Ok(email)
}

/// Validate a password against the complexity policy: 8-24 characters with
/// at least one lowercase letter, one uppercase letter, one digit, and one
/// of `!@#$%`.
pub fn validate_password(password: &str) -> ValidationResult<&str> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&len) {
        return Err(ValidationError::InvalidPassword(format!(
            "password must be between {MIN_PASSWORD_LENGTH} and {MAX_PASSWORD_LENGTH} characters"
        )));
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::InvalidPassword(
            "password must contain a lowercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidPassword(
            "password must contain an uppercase letter".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPassword(
            "password must contain a digit".to_string(),
        ));
    }
    if !password.chars().any(|c| PASSWORD_SPECIALS.contains(c)) {
        return Err(ValidationError::InvalidPassword(format!(
            "password must contain one of {PASSWORD_SPECIALS}"
        )));
    }
    Ok(password)
}

/// Validate a registration body
pub fn validate_create_user(body: &CreateUserRequest) -> ValidationResult<()> {
    validate_username(&body.username)?;
    validate_email(&body.email)?;
    validate_password(&body.password)?;
    Ok(())
}

/// Validate a note creation body
pub fn validate_create_note(body: &CreateNoteRequest) -> ValidationResult<()> {
    if body.title.trim().is_empty() {
        return Err(ValidationError::InvalidNote(
            "title must not be empty".to_string(),
        ));
    }
    if body.content.trim().is_empty() {
        return Err(ValidationError::InvalidNote(
            "content must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate a note update body
pub fn validate_update_note(body: &UpdateNoteRequest) -> ValidationResult<()> {
    if let Some(title) = &body.title {
        if title.trim().is_empty() {
            return Err(ValidationError::InvalidNote(
                "title must not be empty".to_string(),
            ));
        }
    }
    if let Some(content) = &body.content {
        if content.trim().is_empty() {
            return Err(ValidationError::InvalidNote(
                "content must not be empty".to_string(),
            ));
        }
    }
    Ok(())
}
