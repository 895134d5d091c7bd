//! Storage abstraction with an in-memory implementation.
//!
//! The store is the sole source of shared mutable state. Each trait method
//! takes the lock exactly once, so updates such as refresh-token rotation are
//! atomic at the row level (last-writer-wins under concurrent logins).
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::AppError;
use crate::models::{Color, Note, NoteFilter, UpdateNoteRequest, User};

/// Fields needed to insert a user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

/// Fields needed to insert a note row
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub color: Color,
    pub author_id: i64,
}

/// Trait for storage backends
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a user. Fails with `Conflict` if the email is already taken.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Unique lookup by email
    async fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lookup by the currently stored refresh token value
    async fn user_by_refresh_token(&self, token: &str) -> Result<Option<User>, AppError>;

    /// Overwrite (or clear, with `None`) a user's stored refresh token.
    /// A single atomic update; no read-modify-write above the store.
    async fn set_refresh_token(
        &self,
        user_id: i64,
        token: Option<&str>,
    ) -> Result<(), AppError>;

    /// Insert a note owned by `author_id`
    async fn create_note(&self, new_note: NewNote) -> Result<Note, AppError>;

    /// Lookup a note by id
    async fn note_by_id(&self, id: i64) -> Result<Option<Note>, AppError>;

    /// List an author's notes matching the filter
    async fn notes_for_author(
        &self,
        author_id: i64,
        filter: &NoteFilter,
    ) -> Result<Vec<Note>, AppError>;

    /// Apply a partial update and bump `updated_at`. `author_id` is never
    /// touched. Fails with `NotFound` if the row is absent.
    async fn update_note(&self, id: i64, patch: UpdateNoteRequest) -> Result<Note, AppError>;

    /// Remove a note, returning the deleted row
    async fn delete_note(&self, id: i64) -> Result<Note, AppError>;
}

/// In-memory store backing the server and the tests
pub struct MemStore {
    users: Arc<RwLock<HashMap<i64, User>>>,
    notes: Arc<RwLock<HashMap<i64, Note>>>,
    next_user_id: AtomicI64,
    next_note_id: AtomicI64,
}

impl MemStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            notes: Arc::new(RwLock::new(HashMap::new())),
            next_user_id: AtomicI64::new(1),
            next_note_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError> {
        // Uniqueness check and insert under the same write lock.
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict("email already registered".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: self.next_user_id.fetch_add(1, Ordering::SeqCst),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            refresh_token: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn user_by_refresh_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.refresh_token.as_deref() == Some(token))
            .cloned())
    }

    async fn set_refresh_token(
        &self,
        user_id: i64,
        token: Option<&str>,
    ) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user {user_id} not found")))?;
        user.refresh_token = token.map(str::to_string);
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn create_note(&self, new_note: NewNote) -> Result<Note, AppError> {
        let now = Utc::now();
        let note = Note {
            id: self.next_note_id.fetch_add(1, Ordering::SeqCst),
            title: new_note.title,
            content: new_note.content,
            color: new_note.color,
            is_archive: false,
            author_id: new_note.author_id,
            created_at: now,
            updated_at: now,
        };
        let mut notes = self.notes.write().await;
        notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn note_by_id(&self, id: i64) -> Result<Option<Note>, AppError> {
        let notes = self.notes.read().await;
        Ok(notes.get(&id).cloned())
    }

    async fn notes_for_author(
        &self,
        author_id: i64,
        filter: &NoteFilter,
    ) -> Result<Vec<Note>, AppError> {
        let notes = self.notes.read().await;
        // A missing isArchive filter means "not archived".
        let want_archive = filter.is_archive.unwrap_or(false);
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut matched: Vec<Note> = notes
            .values()
            .filter(|n| n.author_id == author_id)
            .filter(|n| n.is_archive == want_archive)
            .filter(|n| filter.color.map_or(true, |c| n.color == c))
            .filter(|n| {
                search.as_ref().map_or(true, |s| {
                    n.title.to_lowercase().contains(s) || n.content.to_lowercase().contains(s)
                })
            })
            .cloned()
            .collect();
        matched.sort_by_key(|n| n.id);
        Ok(matched)
    }

    async fn update_note(&self, id: i64, patch: UpdateNoteRequest) -> Result<Note, AppError> {
        let mut notes = self.notes.write().await;
        let note = notes
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("note {id} not found")))?;

        if let Some(title) = patch.title {
            note.title = title;
        }
        if let Some(content) = patch.content {
            note.content = content;
        }
        if let Some(color) = patch.color {
            note.color = color;
        }
        if let Some(is_archive) = patch.is_archive {
            note.is_archive = is_archive;
        }
        note.updated_at = Utc::now();
        Ok(note.clone())
    }

    async fn delete_note(&self, id: i64) -> Result<Note, AppError> {
        let mut notes = self.notes.write().await;
        notes
            .remove(&id)
            .ok_or_else(|| AppError::NotFound(format!("note {id} not found")))
    }
}
