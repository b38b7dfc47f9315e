use super::*;
use std::sync::Arc;

use serde_json::json;

use crate::providers::catalog::GROQ_URL;
use crate::providers::mock::{MockReply, MockTransport, dispatcher_with};
use crate::providers::types::NormalizedResult;

// =============================================================================
// extract_text
// =============================================================================

#[test]
fn extract_text_truncates_to_limit() {
    let bytes = "a".repeat(MAX_FILE_CHARS + 250).into_bytes();
    assert_eq!(extract_text(&bytes).chars().count(), MAX_FILE_CHARS);
}

#[test]
fn extract_text_counts_chars_not_bytes() {
    let bytes = "é".repeat(MAX_FILE_CHARS + 1).into_bytes();
    let text = extract_text(&bytes);
    assert_eq!(text.chars().count(), MAX_FILE_CHARS);
    assert_eq!(text.len(), MAX_FILE_CHARS * 2);
}

#[test]
fn extract_text_replaces_invalid_utf8() {
    let text = extract_text(&[b'o', b'k', 0xFF, b'!']);
    assert_eq!(text, "ok\u{FFFD}!");
}

#[test]
fn extract_text_short_input_unchanged() {
    assert_eq!(extract_text(b"quarterly numbers"), "quarterly numbers");
}

// =============================================================================
// analysis_prompt
// =============================================================================

#[test]
fn prompt_names_file_and_request() {
    let prompt = analysis_prompt("check tone", "Dear team,", Some("memo.txt"));
    assert!(prompt.starts_with("Analyze the file \"memo.txt\"."));
    assert!(prompt.contains("Request: check tone"));
    assert!(prompt.contains("---\nDear team,\n---"));
}

#[test]
fn prompt_defaults_request() {
    let prompt = analysis_prompt("  ", "body", None);
    assert!(prompt.starts_with("Analyze the following content."));
    assert!(prompt.contains("Summarize it"));
}

// =============================================================================
// analyze
// =============================================================================

#[tokio::test]
async fn analyze_sends_file_text_through_chat_chain() {
    let transport = Arc::new(MockTransport::new().reply(
        GROQ_URL,
        MockReply::Json(200, json!({ "choices": [{ "message": { "content": "Looks formal." } }] })),
    ));
    let dispatcher = dispatcher_with(transport.clone());
    let file = Attachment { file_name: Some("memo.txt".into()), bytes: b"Dear team,".to_vec() };

    let dispatch = analyze(&dispatcher, Some(&file), "check tone").await;

    assert_eq!(dispatch.result, NormalizedResult::text("Looks formal."));
    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let user_turn = calls[0].body.as_ref().unwrap()["messages"][1]["content"]
        .as_str()
        .unwrap()
        .to_owned();
    assert!(user_turn.contains("Dear team,"));
    assert!(user_turn.contains("memo.txt"));
}

#[tokio::test]
async fn analyze_without_file_uses_message() {
    let transport = Arc::new(MockTransport::new());
    let dispatcher = dispatcher_with(transport.clone());

    let dispatch = analyze(&dispatcher, None, "summarize: the sky is blue").await;

    assert!(dispatch.is_degraded());
    assert!(dispatch.result.render().contains("the sky is blue"));
    assert_eq!(transport.calls().len(), 2);
}
