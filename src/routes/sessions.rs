//! Chat session routes.

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::routes::auth::DevUser;
use crate::services::session::{self, ChatSession, DEFAULT_SESSION_NAME};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionBody {
    pub session_name: Option<String>,
}

/// Session name from an optional JSON body. Empty body, missing field and
/// blank name all mean the default name.
pub(crate) fn session_name(body: &[u8]) -> Result<String, ApiError> {
    let parsed = if body.iter().all(u8::is_ascii_whitespace) {
        CreateSessionBody::default()
    } else {
        serde_json::from_slice::<CreateSessionBody>(body).map_err(|e| ApiError::BadRequest(format!("invalid body: {e}")))?
    };

    Ok(parsed
        .session_name
        .map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_SESSION_NAME.to_owned()))
}

/// `POST /api/session`: open (find or create) a session by name.
pub async fn create_session(
    State(state): State<AppState>,
    user: DevUser,
    body: Bytes,
) -> Result<Json<ChatSession>, ApiError> {
    let name = session_name(&body)?;
    let session = session::find_or_create(&state.pool, &user.id, &name).await?;
    Ok(Json(session))
}

/// `GET /api/sessions`: list the caller's sessions.
pub async fn list_sessions(State(state): State<AppState>, user: DevUser) -> Result<Json<Vec<ChatSession>>, ApiError> {
    let sessions = session::list_for_user(&state.pool, &user.id).await?;
    Ok(Json(sessions))
}

#[cfg(test)]
#[path = "sessions_test.rs"]
mod tests;
