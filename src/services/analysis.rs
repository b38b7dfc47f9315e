//! File analysis: extract text from an upload and hand it to chat.
//!
//! There is no analysis provider chain: the extracted text is wrapped in an
//! instruction prompt and dispatched as an ordinary chat invocation, so it
//! inherits chat's fallbacks and degraded default.

use tracing::info;

use crate::providers::types::{Capability, Invocation};
use crate::providers::{Dispatch, Dispatcher};

/// Upper bound on characters forwarded from an uploaded file.
pub const MAX_FILE_CHARS: usize = 5000;

/// An uploaded file as received from the client.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

/// Decode `bytes` as UTF-8 (invalid sequences replaced) and keep at most
/// [`MAX_FILE_CHARS`] characters.
#[must_use]
pub fn extract_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .take(MAX_FILE_CHARS)
        .collect()
}

/// Wrap `content` in the analysis instruction sent to chat providers.
#[must_use]
pub fn analysis_prompt(request: &str, content: &str, file_name: Option<&str>) -> String {
    let source = file_name.map_or_else(|| "the following content".to_owned(), |name| format!("the file \"{name}\""));
    let request = request.trim();
    let request = if request.is_empty() { "Summarize it and point out anything notable." } else { request };
    format!("Analyze {source}.\nRequest: {request}\n\n---\n{content}\n---")
}

/// Analyze `attachment`, or the message text itself when nothing was
/// uploaded, through the chat chain.
pub async fn analyze(dispatcher: &Dispatcher, attachment: Option<&Attachment>, message: &str) -> Dispatch {
    let prompt = match attachment {
        Some(file) => {
            let content = extract_text(&file.bytes);
            info!(
                file_name = file.file_name.as_deref().unwrap_or("-"),
                bytes = file.bytes.len(),
                chars = content.chars().count(),
                "analysis: extracted file text"
            );
            analysis_prompt(message, &content, file.file_name.as_deref())
        }
        None => analysis_prompt("", message, None),
    };

    dispatcher
        .dispatch(&Invocation::new(Capability::Chat, prompt, None))
        .await
}

#[cfg(test)]
#[path = "analysis_test.rs"]
mod tests;
