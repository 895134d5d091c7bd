//! HTTP handlers.

use axum::extract::FromRequest;

use crate::error::AppError;

pub mod notes;
pub mod users;

/// JSON body extractor whose rejection is a 400 validation error.
///
/// A malformed or incomplete body is a schema violation, not an
/// unprocessable entity; it takes the same exit as the field-level checks in
/// [`validation`](crate::validation).
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
