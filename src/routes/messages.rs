//! Message route: accepts JSON or multipart (with an optional `file`).

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::providers::types::ImageSize;
use crate::routes::auth::DevUser;
use crate::services::analysis::Attachment;
use crate::services::message::{self, Exchange, InboundMessage};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    pub session_id: String,
    #[serde(default)]
    pub message: String,
    pub mode: Option<String>,
    /// Image size hint, `"WIDTHxHEIGHT"`.
    pub size: Option<String>,
}

impl TryFrom<MessageBody> for InboundMessage {
    type Error = ApiError;

    fn try_from(body: MessageBody) -> Result<Self, Self::Error> {
        Ok(Self {
            session_id: body.session_id,
            message: body.message,
            mode: body.mode,
            image_size: parse_size(body.size.as_deref())?,
            attachment: None,
        })
    }
}

/// Blank or absent means "provider default"; anything else must parse.
pub(crate) fn parse_size(raw: Option<&str>) -> Result<Option<ImageSize>, ApiError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(raw) => ImageSize::parse(raw).map(Some).ok_or_else(|| {
            ApiError::BadRequest(format!(
                "invalid size {raw:?}: expected WIDTHxHEIGHT, each side {}..={}",
                ImageSize::MIN_SIDE,
                ImageSize::MAX_SIDE
            ))
        }),
    }
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
}

async fn read_multipart(mut multipart: Multipart) -> Result<InboundMessage, ApiError> {
    let bad = |e: axum::extract::multipart::MultipartError| ApiError::BadRequest(e.body_text());
    let mut session_id = None;
    let mut inbound = InboundMessage::default();

    while let Some(field) = multipart.next_field().await.map_err(bad)? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "sessionId" => session_id = Some(field.text().await.map_err(bad)?),
            "message" => inbound.message = field.text().await.map_err(bad)?,
            "mode" => inbound.mode = Some(field.text().await.map_err(bad)?),
            "size" => {
                let raw = field.text().await.map_err(bad)?;
                inbound.image_size = parse_size(Some(raw.as_str()))?;
            }
            "file" => {
                let file_name = field.file_name().map(str::to_owned);
                let bytes = field.bytes().await.map_err(bad)?;
                // Browsers send an empty part when no file was picked.
                if !bytes.is_empty() {
                    inbound.attachment = Some(Attachment { file_name, bytes: bytes.to_vec() });
                }
            }
            other => tracing::debug!(field = other, "messages: ignoring multipart field"),
        }
    }

    inbound.session_id = session_id.ok_or_else(|| ApiError::BadRequest("sessionId is required".into()))?;
    Ok(inbound)
}

/// Parse either body encoding into an [`InboundMessage`].
pub(crate) async fn parse_inbound(request: Request, state: &AppState) -> Result<InboundMessage, ApiError> {
    if is_multipart(&request) {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        return read_multipart(multipart).await;
    }

    let Json(body) = Json::<MessageBody>::from_request(request, state)
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?;
    body.try_into()
}

/// `POST /api/message`: store the user turn, dispatch, store the reply.
pub async fn post_message(
    State(state): State<AppState>,
    user: DevUser,
    request: Request,
) -> Result<Json<Exchange>, ApiError> {
    let inbound = parse_inbound(request, &state).await?;
    let exchange = message::handle_message(&state, &user.id, inbound).await?;
    Ok(Json(exchange))
}

#[cfg(test)]
#[path = "messages_test.rs"]
mod tests;
