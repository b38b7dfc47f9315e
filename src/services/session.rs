//! Chat session persistence.
//!
//! DESIGN
//! ======
//! A session is one row in `chat_sessions`; its transcript is a JSONB array
//! appended to in place (`messages || $2`). Sessions are keyed by
//! `(user_id, name)`, so "open the session called X" is an idempotent
//! insert-then-select rather than a read-modify-write.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::ErrorCode;

/// Name used when the client does not supply one.
pub const DEFAULT_SESSION_NAME: &str = "New Chat";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid session id: {0:?}")]
    InvalidId(String),
    #[error("session not found: {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ErrorCode for SessionError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "E_INVALID_SESSION_ID",
            Self::NotFound(_) => "E_SESSION_NOT_FOUND",
            Self::Database(_) => "E_DATABASE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Database(sqlx::Error::PoolTimedOut | sqlx::Error::Io(_)))
    }
}

// =============================================================================
// TYPES
// =============================================================================

/// One transcript entry as stored in the `messages` JSONB array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredMessage {
    /// `"user"` or `"funmi"`.
    pub role: String,
    pub content: String,
    /// Result shape of an assistant reply (`text`, `image`, `snippet`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    /// Provider that served the reply; absent for degraded replies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl StoredMessage {
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
            kind: None,
            mode: None,
            provider: None,
            timestamp: OffsetDateTime::now_utc(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub messages: Vec<StoredMessage>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

type SessionRecord = (Uuid, String, String, Json<Vec<StoredMessage>>, OffsetDateTime, OffsetDateTime);

fn from_record((id, user_id, name, Json(messages), created_at, updated_at): SessionRecord) -> ChatSession {
    ChatSession { id, user_id, name, messages, created_at, updated_at }
}

const SELECT_SESSION: &str = "SELECT id, user_id, name, messages, created_at, updated_at FROM chat_sessions";

// =============================================================================
// QUERIES
// =============================================================================

/// Parse a client-supplied session id.
///
/// # Errors
///
/// Returns [`SessionError::InvalidId`] if `raw` is not a UUID.
pub fn parse_session_id(raw: &str) -> Result<Uuid, SessionError> {
    Uuid::parse_str(raw.trim()).map_err(|_| SessionError::InvalidId(raw.to_owned()))
}

/// Return the user's session named `name`, creating it empty if absent.
///
/// # Errors
///
/// Returns a database error if either query fails.
pub async fn find_or_create(pool: &PgPool, user_id: &str, name: &str) -> Result<ChatSession, SessionError> {
    sqlx::query(
        "INSERT INTO chat_sessions (id, user_id, name)
         VALUES ($1, $2, $3)
         ON CONFLICT (user_id, name) DO NOTHING",
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(name)
    .execute(pool)
    .await?;

    let record = sqlx::query_as::<_, SessionRecord>(&format!("{SELECT_SESSION} WHERE user_id = $1 AND name = $2"))
        .bind(user_id)
        .bind(name)
        .fetch_one(pool)
        .await?;

    Ok(from_record(record))
}

/// All sessions owned by `user_id`, most recently active first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<ChatSession>, SessionError> {
    let records = sqlx::query_as::<_, SessionRecord>(&format!("{SELECT_SESSION} WHERE user_id = $1 ORDER BY updated_at DESC"))
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(records.into_iter().map(from_record).collect())
}

/// Load session `id` if it belongs to `user_id`.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn find_owned(pool: &PgPool, id: Uuid, user_id: &str) -> Result<Option<ChatSession>, SessionError> {
    let record = sqlx::query_as::<_, SessionRecord>(&format!("{SELECT_SESSION} WHERE id = $1 AND user_id = $2"))
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

    Ok(record.map(from_record))
}

/// Append one message to the session transcript and bump `updated_at`.
///
/// # Errors
///
/// Returns [`SessionError::NotFound`] if the row vanished, or a database error.
pub async fn append_message(pool: &PgPool, id: Uuid, message: &StoredMessage) -> Result<(), SessionError> {
    let result = sqlx::query(
        "UPDATE chat_sessions
         SET messages = messages || $2::jsonb, updated_at = now()
         WHERE id = $1",
    )
    .bind(id)
    .bind(Json(std::slice::from_ref(message)))
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(SessionError::NotFound(id));
    }
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
