//! Note CRUD handlers. All routes here sit behind the bearer guard; the
//! identity extension is always present.
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use std::sync::Arc;

use crate::error::AppError;
use crate::handlers::AppJson;
use crate::models::{CreateNoteRequest, Identity, Note, NoteFilter, UpdateNoteRequest};
use crate::store::NewNote;
use crate::validation;
use crate::AppState;

/// Ownership check shared by mutation and deletion.
///
/// Load-then-compare: an absent note is `NotFound`; a note owned by someone
/// else is `Unauthorized`, revealing nothing beyond the denial.
async fn owned_note(
    state: &AppState,
    identity: Identity,
    note_id: i64,
) -> Result<Note, AppError> {
    let note = state
        .store
        .note_by_id(note_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("note {note_id} not found")))?;

    if note.author_id != identity.user_id {
        tracing::warn!(
            user_id = identity.user_id,
            note_id,
            "denied access to another user's note"
        );
        return Err(AppError::Unauthorized);
    }
    Ok(note)
}

/// POST /api/notes
pub async fn create_note(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    AppJson(body): AppJson<CreateNoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_create_note(&body)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let note = state
        .store
        .create_note(NewNote {
            title: body.title,
            content: body.content,
            color: body.color,
            author_id: identity.user_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/notes
pub async fn list_notes(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Query(filter): Query<NoteFilter>,
) -> Result<impl IntoResponse, AppError> {
    let notes = state
        .store
        .notes_for_author(identity.user_id, &filter)
        .await?;
    Ok(Json(notes))
}

/// PATCH /api/notes/:id
pub async fn update_note(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(note_id): Path<i64>,
    AppJson(body): AppJson<UpdateNoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_update_note(&body)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    owned_note(&state, identity, note_id).await?;
    let note = state.store.update_note(note_id, body).await?;
    Ok(Json(note))
}

/// DELETE /api/notes/:id
pub async fn delete_note(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<Identity>,
    Path(note_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    owned_note(&state, identity, note_id).await?;
    let note = state.store.delete_note(note_id).await?;
    Ok(Json(note))
}
