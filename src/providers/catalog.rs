//! Provider catalog: static provider specs and per-capability chains.
//!
//! DESIGN
//! ======
//! A chain is an ordered `Vec<ProviderSpec>`; index 0 is the primary.
//! Chains are built once at startup, validated, and shared read-only
//! behind an `Arc`. Search owns two chains, one per [`SearchMode`].

use tracing::warn;

use super::config::{CatalogSettings, ConfigError};
use super::types::{Capability, SearchMode};

pub const GROQ_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const HUGGING_FACE_URL: &str = "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.3";
pub const FLUX_URL: &str = "https://api.blackforest.ai/v1/generate";
pub const STABILITY_URL: &str =
    "https://api.stability.ai/v1/generation/stable-diffusion-xl-1024-v1-0/text-to-image";
pub const EXA_URL: &str = "https://api.exa.com/v1/search";
pub const SERPER_URL: &str = "https://google.serper.dev/search";
pub const GOOGLE_CSE_URL: &str = "https://www.googleapis.com/customsearch/v1";

// =============================================================================
// PROVIDER SPEC
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// Where the resolved credential goes on the outbound request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <secret>`
    Bearer,
    /// A named header carrying the raw secret, e.g. `X-API-KEY`.
    Header(String),
    /// A query parameter carrying the raw secret, e.g. `key`.
    Query(String),
}

/// Body layout a provider expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestShape {
    /// OpenAI-compatible `{model, messages}` with an optional system message.
    ChatCompletions { model: String },
    /// Hugging Face inference `{inputs}`.
    HfInputs,
    /// `{prompt, size: "WxH"}`.
    FluxPrompt,
    /// Stability `{text_prompts, width, height, samples}`.
    StabilityTextToImage,
    /// GET with the input as `q`.
    QueryString,
    /// POST `{q}`.
    SerperJson,
    /// GET with `q` and the search engine id as `cx`.
    GoogleCse { engine_id: String },
}

impl RequestShape {
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        match self {
            Self::QueryString | Self::GoogleCse { .. } => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }
}

/// Response contract a provider honours. Each variant has its own
/// extraction function in `normalize`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `choices[0].message.content`, or a flat `output`/`content`/`text`.
    ChatText,
    /// `[{generated_text}]` or `{generated_text}`.
    HfGenerated,
    /// Hosted URL (`url`, `image_url`, ...) or `b64_json`.
    ImageUrl,
    /// `artifacts[0].base64`, or a raw `image/*` body.
    StabilityArtifacts,
    /// `results[0].snippet`.
    ExaResults,
    /// `organic[0].snippet`, then the answer box.
    SerperOrganic,
    /// `items[0].snippet`.
    GoogleItems,
}

impl ResponseShape {
    /// Capability whose result shape this response normalizes into.
    #[must_use]
    pub fn capability(self) -> Capability {
        match self {
            Self::ChatText | Self::HfGenerated => Capability::Chat,
            Self::ImageUrl | Self::StabilityArtifacts => Capability::Image,
            Self::ExaResults | Self::SerperOrganic | Self::GoogleItems => Capability::Search,
        }
    }
}

/// One external provider endpoint. Immutable once the chains are built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    pub name: String,
    pub endpoint: String,
    pub auth: AuthScheme,
    /// Name of the single secret this provider needs.
    pub secret: String,
    pub request: RequestShape,
    pub response: ResponseShape,
}

impl ProviderSpec {
    #[must_use]
    pub fn method(&self) -> HttpMethod {
        self.request.method()
    }
}

// =============================================================================
// CHAINS
// =============================================================================

/// Ordered provider chains for every capability.
#[derive(Debug, Clone)]
pub struct ProviderChains {
    chat: Vec<ProviderSpec>,
    image: Vec<ProviderSpec>,
    research: Vec<ProviderSpec>,
    web: Vec<ProviderSpec>,
}

impl ProviderChains {
    /// Build chains, rejecting any spec whose response shape belongs to a
    /// different capability than the chain it sits in.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ShapeMismatch`] for the first misplaced spec.
    pub fn new(
        chat: Vec<ProviderSpec>,
        image: Vec<ProviderSpec>,
        research: Vec<ProviderSpec>,
        web: Vec<ProviderSpec>,
    ) -> Result<Self, ConfigError> {
        check_chain(Capability::Chat, &chat)?;
        check_chain(Capability::Image, &image)?;
        check_chain(Capability::Search, &research)?;
        check_chain(Capability::Search, &web)?;
        Ok(Self { chat, image, research, web })
    }

    /// The chain to walk for a capability. `mode` is ignored unless the
    /// capability is search.
    #[must_use]
    pub fn chain_for(&self, capability: Capability, mode: SearchMode) -> &[ProviderSpec] {
        match (capability, mode) {
            (Capability::Chat, _) => &self.chat,
            (Capability::Image, _) => &self.image,
            (Capability::Search, SearchMode::Research) => &self.research,
            (Capability::Search, SearchMode::Web) => &self.web,
        }
    }

    /// The production catalog: Groq → Hugging Face for chat, Flux → SDXL for
    /// images, Exa → Google CSE for research, Serper → Google CSE for web.
    ///
    /// Google CSE is left out of both search chains when no engine id is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ShapeMismatch`] if a built-in spec sits in the
    /// wrong chain.
    pub fn standard(settings: &CatalogSettings) -> Result<Self, ConfigError> {
        let google = settings.google_cse_id.as_deref().map(google_cse);
        if google.is_none() {
            warn!("GOOGLE_CSE_ID not set, search chains run without the Google CSE fallback");
        }

        let mut research = vec![exa()];
        let mut web = vec![serper()];
        if let Some(google) = google {
            research.push(google.clone());
            web.push(google);
        }

        Self::new(vec![groq(&settings.groq_model), hugging_face()], vec![flux(), stability()], research, web)
    }
}

fn check_chain(capability: Capability, chain: &[ProviderSpec]) -> Result<(), ConfigError> {
    match chain
        .iter()
        .find(|spec| spec.response.capability() != capability)
    {
        Some(spec) => Err(ConfigError::ShapeMismatch { provider: spec.name.clone(), capability }),
        None => Ok(()),
    }
}

// =============================================================================
// STANDARD PROVIDERS
// =============================================================================

fn groq(model: &str) -> ProviderSpec {
    ProviderSpec {
        name: "groq".into(),
        endpoint: GROQ_URL.into(),
        auth: AuthScheme::Bearer,
        secret: "groq-api-key".into(),
        request: RequestShape::ChatCompletions { model: model.to_owned() },
        response: ResponseShape::ChatText,
    }
}

fn hugging_face() -> ProviderSpec {
    ProviderSpec {
        name: "hugging-face".into(),
        endpoint: HUGGING_FACE_URL.into(),
        auth: AuthScheme::Bearer,
        secret: "hf-api-key".into(),
        request: RequestShape::HfInputs,
        response: ResponseShape::HfGenerated,
    }
}

fn flux() -> ProviderSpec {
    ProviderSpec {
        name: "flux".into(),
        endpoint: FLUX_URL.into(),
        auth: AuthScheme::Bearer,
        secret: "flux-api-key".into(),
        request: RequestShape::FluxPrompt,
        response: ResponseShape::ImageUrl,
    }
}

fn stability() -> ProviderSpec {
    ProviderSpec {
        name: "stability-sdxl".into(),
        endpoint: STABILITY_URL.into(),
        auth: AuthScheme::Bearer,
        secret: "stability-api-key".into(),
        request: RequestShape::StabilityTextToImage,
        response: ResponseShape::StabilityArtifacts,
    }
}

fn exa() -> ProviderSpec {
    ProviderSpec {
        name: "exa".into(),
        endpoint: EXA_URL.into(),
        auth: AuthScheme::Bearer,
        secret: "exa-api-key".into(),
        request: RequestShape::QueryString,
        response: ResponseShape::ExaResults,
    }
}

fn serper() -> ProviderSpec {
    ProviderSpec {
        name: "serper".into(),
        endpoint: SERPER_URL.into(),
        auth: AuthScheme::Header("X-API-KEY".into()),
        secret: "serper-api-key".into(),
        request: RequestShape::SerperJson,
        response: ResponseShape::SerperOrganic,
    }
}

fn google_cse(engine_id: &str) -> ProviderSpec {
    ProviderSpec {
        name: "google-cse".into(),
        endpoint: GOOGLE_CSE_URL.into(),
        auth: AuthScheme::Query("key".into()),
        secret: "google-cse-key".into(),
        request: RequestShape::GoogleCse { engine_id: engine_id.to_owned() },
        response: ResponseShape::GoogleItems,
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
