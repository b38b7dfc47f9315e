//! Response normalizer: one extraction function per response shape.
//!
//! Every provider answers in its own layout. Each extractor lists the JSON
//! pointers it accepts, in preference order, and returns the first non-blank
//! string. A blank, null, or absent field is `EmptyResult`; a body that is not
//! JSON, or a field of the wrong type, is `MalformedBody`.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;

use super::catalog::ResponseShape;
use super::types::{FailureKind, ImagePayload, NormalizedResult, RawResponse};

/// Mime type assumed for inline base64 images that do not declare one.
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

const CHAT_TEXT: &[&str] = &["/choices/0/message/content", "/output", "/content", "/text"];
const HF_GENERATED: &[&str] = &["/0/generated_text", "/generated_text"];
const IMAGE_URLS: &[&str] = &["/url", "/image_url", "/result/sample", "/data/0/url"];
const IMAGE_INLINE: &[&str] = &["/data/0/b64_json", "/b64_json", "/image"];
const STABILITY_INLINE: &[&str] = &["/artifacts/0/base64"];
const STABILITY_URLS: &[&str] = &["/artifacts/0/url"];
const EXA_SNIPPETS: &[&str] = &["/results/0/snippet", "/results/0/text", "/results/0/highlights/0"];
const SERPER_SNIPPETS: &[&str] = &["/organic/0/snippet", "/answerBox/snippet", "/answerBox/answer"];
const GOOGLE_SNIPPETS: &[&str] = &["/items/0/snippet"];

/// Extract the canonical payload of `raw` according to `shape`.
///
/// # Errors
///
/// Returns [`FailureKind::MalformedBody`] or [`FailureKind::EmptyResult`];
/// both advance the dispatcher to the next provider.
pub fn normalize(shape: ResponseShape, raw: &RawResponse) -> Result<NormalizedResult, FailureKind> {
    match shape {
        ResponseShape::ChatText => first_string(&parse_json(raw)?, CHAT_TEXT).map(NormalizedResult::text),
        ResponseShape::HfGenerated => first_string(&parse_json(raw)?, HF_GENERATED).map(NormalizedResult::text),
        ResponseShape::ImageUrl => extract_image(&parse_json(raw)?, IMAGE_URLS, IMAGE_INLINE),
        ResponseShape::StabilityArtifacts => {
            if let Some(mime) = raw.image_mime() {
                return inline_binary(mime, &raw.body);
            }
            extract_image(&parse_json(raw)?, STABILITY_URLS, STABILITY_INLINE)
        }
        ResponseShape::ExaResults => first_string(&parse_json(raw)?, EXA_SNIPPETS).map(NormalizedResult::snippet),
        ResponseShape::SerperOrganic => {
            first_string(&parse_json(raw)?, SERPER_SNIPPETS).map(NormalizedResult::snippet)
        }
        ResponseShape::GoogleItems => first_string(&parse_json(raw)?, GOOGLE_SNIPPETS).map(NormalizedResult::snippet),
    }
}

fn parse_json(raw: &RawResponse) -> Result<Value, FailureKind> {
    serde_json::from_slice(&raw.body).map_err(|e| FailureKind::MalformedBody(e.to_string()))
}

// =============================================================================
// FIELD LOOKUP
// =============================================================================

enum Lookup<'a> {
    Found(&'a str),
    Empty,
    WrongType(&'static str),
}

fn lookup<'a>(body: &'a Value, pointers: &[&'static str]) -> Lookup<'a> {
    let mut wrong_type = None;
    for pointer in pointers {
        match body.pointer(pointer) {
            Some(Value::String(s)) if !s.trim().is_empty() => return Lookup::Found(s),
            Some(Value::String(_) | Value::Null) | None => {}
            Some(_) => {
                wrong_type.get_or_insert(*pointer);
            }
        }
    }
    wrong_type.map_or(Lookup::Empty, Lookup::WrongType)
}

fn first_string(body: &Value, pointers: &[&'static str]) -> Result<String, FailureKind> {
    match lookup(body, pointers) {
        Lookup::Found(s) => Ok(s.to_owned()),
        Lookup::Empty => Err(FailureKind::EmptyResult(format!("no value at {}", pointers.join(" | ")))),
        Lookup::WrongType(pointer) => Err(FailureKind::MalformedBody(format!("{pointer} is not a string"))),
    }
}

// =============================================================================
// IMAGES
// =============================================================================

fn extract_image(
    body: &Value,
    url_pointers: &[&'static str],
    inline_pointers: &[&'static str],
) -> Result<NormalizedResult, FailureKind> {
    let url_lookup = lookup(body, url_pointers);
    if let Lookup::Found(url) = url_lookup {
        return Ok(NormalizedResult::Image { payload: ImagePayload::Remote { url: url.to_owned() } });
    }

    match lookup(body, inline_pointers) {
        Lookup::Found(data) => Ok(NormalizedResult::Image {
            payload: ImagePayload::Inline { data: data.to_owned(), mime_type: DEFAULT_IMAGE_MIME.to_owned() },
        }),
        Lookup::WrongType(pointer) => Err(FailureKind::MalformedBody(format!("{pointer} is not a string"))),
        Lookup::Empty => match url_lookup {
            Lookup::WrongType(pointer) => Err(FailureKind::MalformedBody(format!("{pointer} is not a string"))),
            _ => Err(FailureKind::EmptyResult("no image url or base64 payload".into())),
        },
    }
}

fn inline_binary(mime: &str, bytes: &[u8]) -> Result<NormalizedResult, FailureKind> {
    if bytes.is_empty() {
        return Err(FailureKind::EmptyResult("empty image body".into()));
    }
    Ok(NormalizedResult::Image {
        payload: ImagePayload::Inline { data: BASE64.encode(bytes), mime_type: mime.to_owned() },
    })
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
