//! Message exchange: one user turn in, one assistant turn out.
//!
//! SYSTEM CONTEXT
//! ==============
//! `POST /api/message` lands here after request parsing. The flow is:
//! validate, check ownership, store the user turn, resolve the mode, dispatch,
//! store the assistant turn. Dispatch never fails, so once the session is
//! confirmed the only error source left is storage.

use std::time::Instant;

use serde::Serialize;
use tracing::info;

use crate::error::ApiError;
use crate::providers::types::{Capability, ImageSize, Invocation};
use crate::providers::{Dispatch, Dispatcher};
use crate::services::analysis::{self, Attachment};
use crate::services::intent::{self, IntentClassifier, Mode};
use crate::services::session::{self, StoredMessage};
use crate::state::AppState;

/// Role recorded for assistant turns.
pub const ASSISTANT_ROLE: &str = "funmi";

/// Parsed `POST /api/message` body, JSON or multipart.
#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    pub session_id: String,
    pub message: String,
    pub mode: Option<String>,
    /// Output size hint, only read by image generation.
    pub image_size: Option<ImageSize>,
    pub attachment: Option<Attachment>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exchange {
    pub user_message: StoredMessage,
    pub ai_message: StoredMessage,
}

/// Resolve the mode for a turn. A bare upload with no text and no explicit
/// mode is treated as a request to analyze it.
#[must_use]
pub fn pick_mode(explicit: Option<&str>, message: &str, has_attachment: bool, classifier: &dyn IntentClassifier) -> Mode {
    if has_attachment && message.trim().is_empty() && Mode::parse_explicit(explicit).is_none() {
        return Mode::AnalyzeFile;
    }
    intent::resolve_mode(explicit, message, classifier)
}

/// Dispatch `message` for `mode`. File analysis composes over chat; the
/// other modes map straight onto a capability.
pub async fn route_mode(
    dispatcher: &Dispatcher,
    mode: Mode,
    message: &str,
    attachment: Option<&Attachment>,
    image_size: Option<ImageSize>,
) -> Dispatch {
    match mode {
        Mode::AnalyzeFile => analysis::analyze(dispatcher, attachment, message).await,
        Mode::Search(sub_mode) => {
            dispatcher
                .dispatch(&Invocation::new(Capability::Search, message, Some(sub_mode)))
                .await
        }
        Mode::Image => {
            let invocation = Invocation::new(Capability::Image, message, None).with_image_size(image_size.unwrap_or_default());
            dispatcher.dispatch(&invocation).await
        }
        Mode::Chat => {
            dispatcher
                .dispatch(&Invocation::new(Capability::Chat, message, None))
                .await
        }
    }
}

/// The stored assistant turn for `dispatch`.
#[must_use]
pub fn assistant_message(dispatch: &Dispatch, mode: Mode) -> StoredMessage {
    StoredMessage {
        role: ASSISTANT_ROLE.into(),
        content: dispatch.result.render(),
        kind: Some(dispatch.result.kind().into()),
        mode: Some(mode.label().into()),
        provider: dispatch.served_by.clone(),
        timestamp: time::OffsetDateTime::now_utc(),
    }
}

/// Run one exchange for `user_id` against their session.
///
/// # Errors
///
/// Returns `BadRequest` for an unparseable session id or an empty turn,
/// `SessionNotFound` when the session is missing or owned by someone else,
/// and a session error if storage fails.
pub async fn handle_message(state: &AppState, user_id: &str, inbound: InboundMessage) -> Result<Exchange, ApiError> {
    let session_id = session::parse_session_id(&inbound.session_id)?;
    if inbound.message.trim().is_empty() && inbound.attachment.is_none() {
        return Err(ApiError::BadRequest("message is required".into()));
    }

    let owned = session::find_owned(&state.pool, session_id, user_id)
        .await?
        .ok_or(ApiError::SessionNotFound)?;

    let user_message = StoredMessage::user(inbound.message.clone());
    session::append_message(&state.pool, owned.id, &user_message).await?;

    let mode = pick_mode(
        inbound.mode.as_deref(),
        &inbound.message,
        inbound.attachment.is_some(),
        state.classifier.as_ref(),
    );
    let started = Instant::now();
    let dispatch = route_mode(
        &state.dispatcher,
        mode,
        &inbound.message,
        inbound.attachment.as_ref(),
        inbound.image_size,
    )
    .await;
    info!(
        session_id = %owned.id,
        mode = mode.label(),
        provider = dispatch.served_by.as_deref().unwrap_or("degraded"),
        elapsed_ms = started.elapsed().as_millis(),
        "message: exchange dispatched"
    );

    let ai_message = assistant_message(&dispatch, mode);
    session::append_message(&state.pool, owned.id, &ai_message).await?;

    Ok(Exchange { user_message, ai_message })
}

#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
