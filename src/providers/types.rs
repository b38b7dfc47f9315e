//! Provider types: capabilities, invocations, normalized results, failures.
//!
//! Provider-neutral types shared by the client, the normalizer, and the
//! dispatcher. Nothing here performs I/O.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

// =============================================================================
// CAPABILITY
// =============================================================================

/// Task type a request is dispatched as. Selects the provider chain and the
/// shape of the degraded default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Chat,
    Image,
    Search,
}

impl Capability {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Image => "image",
            Self::Search => "search",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Search sub-mode. Each mode owns a separate provider chain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Research,
    #[default]
    Web,
}

impl SearchMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Web => "web",
        }
    }
}

/// Requested output dimensions for image generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const MIN_SIDE: u32 = 64;
    pub const MAX_SIDE: u32 = 2048;

    /// Parse a client hint such as `"512x768"`. Each side must fall within
    /// [`Self::MIN_SIDE`]..=[`Self::MAX_SIDE`].
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_ascii_lowercase();
        let (width, height) = lowered.split_once('x')?;
        let side = |n: &str| {
            n.trim()
                .parse::<u32>()
                .ok()
                .filter(|n| (Self::MIN_SIDE..=Self::MAX_SIDE).contains(n))
        };
        Some(Self { width: side(width)?, height: side(height)? })
    }

    /// `"WIDTHxHEIGHT"`, the form Flux-style APIs expect.
    #[must_use]
    pub fn dimensions(self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

impl Default for ImageSize {
    fn default() -> Self {
        Self { width: 1024, height: 1024 }
    }
}

// =============================================================================
// INVOCATION
// =============================================================================

/// One dispatch request. Built per inbound message and never persisted.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub capability: Capability,
    pub input: String,
    /// Only read by image providers.
    pub image_size: ImageSize,
    /// Only read when `capability` is [`Capability::Search`].
    pub search_mode: SearchMode,
    pub timestamp: OffsetDateTime,
}

impl Invocation {
    #[must_use]
    pub fn new(capability: Capability, input: impl Into<String>, search_mode: Option<SearchMode>) -> Self {
        Self {
            capability,
            input: input.into(),
            image_size: ImageSize::default(),
            search_mode: search_mode.unwrap_or_default(),
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    #[must_use]
    pub fn with_image_size(mut self, size: ImageSize) -> Self {
        self.image_size = size;
        self
    }
}

// =============================================================================
// NORMALIZED RESULT
// =============================================================================

/// Image payload as returned by a provider: inline bytes or a hosted URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImagePayload {
    Inline {
        /// Base64-encoded image bytes.
        data: String,
        mime_type: String,
    },
    Remote {
        url: String,
    },
}

impl ImagePayload {
    /// A URI a browser can render directly: a `data:` URI for inline bytes,
    /// the hosted URL otherwise.
    #[must_use]
    pub fn to_uri(&self) -> String {
        match self {
            Self::Inline { data, mime_type } => format!("data:{mime_type};base64,{data}"),
            Self::Remote { url } => url.clone(),
        }
    }
}

/// The single canonical payload extracted from a provider response, or a
/// capability's degraded default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NormalizedResult {
    Text { content: String },
    Image { payload: ImagePayload },
    Snippet { text: String },
}

impl NormalizedResult {
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text { content: content.into() }
    }

    #[must_use]
    pub fn snippet(text: impl Into<String>) -> Self {
        Self::Snippet { text: text.into() }
    }

    /// Short tag stored next to persisted messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Image { .. } => "image",
            Self::Snippet { .. } => "snippet",
        }
    }

    /// Flatten to the string shown in conversation history.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text { content } => content.clone(),
            Self::Image { payload } => payload.to_uri(),
            Self::Snippet { text } => text.clone(),
        }
    }
}

// =============================================================================
// RAW RESPONSE
// =============================================================================

/// Undecoded provider response. Produced by the transport, consumed by the
/// normalizer.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self { status, content_type: Some("application/json".into()), body: body.to_string().into_bytes() }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `Some(mime)` when the body is a binary image.
    #[must_use]
    pub fn image_mime(&self) -> Option<&str> {
        let mime = self.content_type.as_deref()?.split(';').next()?.trim();
        mime.starts_with("image/").then_some(mime)
    }
}

// =============================================================================
// FAILURES
// =============================================================================

/// Why a single provider attempt produced nothing usable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureKind {
    /// Transport-level failure, including attempt timeouts.
    #[error("network error: {0}")]
    Network(String),

    #[error("http status {status}")]
    HttpStatus { status: u16 },

    /// Body could not be decoded, or the payload field had the wrong type.
    #[error("malformed body: {0}")]
    MalformedBody(String),

    /// Body decoded but the payload field was missing, null, or blank.
    #[error("empty result: {0}")]
    EmptyResult(String),

    /// The provider's named secret is not configured; no call was made.
    #[error("missing credential: {secret}")]
    MissingCredential { secret: String },
}

impl crate::error::ErrorCode for FailureKind {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Network(_) => "E_PROVIDER_NETWORK",
            Self::HttpStatus { .. } => "E_PROVIDER_HTTP_STATUS",
            Self::MalformedBody(_) => "E_PROVIDER_MALFORMED_BODY",
            Self::EmptyResult(_) => "E_PROVIDER_EMPTY_RESULT",
            Self::MissingCredential { .. } => "E_PROVIDER_MISSING_CREDENTIAL",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::HttpStatus { status: 429 | 500..=599 })
    }
}

/// A classified failure attributed to one provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{provider}: {kind}")]
pub struct ProviderFailure {
    pub provider: String,
    pub kind: FailureKind,
}

impl ProviderFailure {
    #[must_use]
    pub fn new(provider: impl Into<String>, kind: FailureKind) -> Self {
        Self { provider: provider.into(), kind }
    }
}

impl crate::error::ErrorCode for ProviderFailure {
    fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    fn retryable(&self) -> bool {
        self.kind.retryable()
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
