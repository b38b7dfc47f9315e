//! Provider client: one outbound call per attempt.
//!
//! DESIGN
//! ======
//! `build_request` is pure: it turns a spec + invocation + credential into
//! an [`OutboundRequest`]. The [`HttpTransport`] trait performs the actual
//! I/O so tests can swap in a scripted transport. The client never retries
//! and never inspects the body; body problems belong to the normalizer.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};

use super::catalog::{AuthScheme, HttpMethod, ProviderSpec, RequestShape};
use super::config::{ConfigError, ProviderTimeouts};
use super::secrets::SecretStore;
use super::types::{FailureKind, Invocation, ProviderFailure, RawResponse};

// =============================================================================
// TRANSPORT
// =============================================================================

/// Fully-built HTTP request. Carries the credential, so it is deliberately
/// not `Debug`.
#[derive(Clone)]
pub struct OutboundRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl OutboundRequest {
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Transport-level failure: connect, TLS, timeout, or body read.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Sends one request and returns the undecoded response, whatever its
/// status. Enables mocking in tests.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError>;
}

/// Production transport over a shared `reqwest::Client`.
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeouts: ProviderTimeouts) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ConfigError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError(e.to_string()))?;

        Ok(RawResponse { status, content_type, body: body.to_vec() })
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Stateless caller shared by every dispatcher invocation.
#[derive(Clone)]
pub struct ProviderClient {
    transport: Arc<dyn HttpTransport>,
    secrets: Arc<dyn SecretStore>,
    system_prompt: Arc<str>,
}

impl ProviderClient {
    #[must_use]
    pub fn new(transport: Arc<dyn HttpTransport>, secrets: Arc<dyn SecretStore>, system_prompt: &str) -> Self {
        Self { transport, secrets, system_prompt: Arc::from(system_prompt) }
    }

    /// Issue exactly one call to `spec`.
    ///
    /// # Errors
    ///
    /// - [`FailureKind::MissingCredential`] when the spec's secret is unset
    ///   (no call is made)
    /// - [`FailureKind::Network`] on transport failure
    /// - [`FailureKind::HttpStatus`] on any non-2xx status
    pub async fn call(&self, spec: &ProviderSpec, invocation: &Invocation) -> Result<RawResponse, ProviderFailure> {
        let secret = self
            .secrets
            .resolve(&spec.secret)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                ProviderFailure::new(&spec.name, FailureKind::MissingCredential { secret: spec.secret.clone() })
            })?;

        let request = build_request(spec, invocation, &secret, &self.system_prompt);
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| ProviderFailure::new(&spec.name, FailureKind::Network(e.0)))?;

        if !response.is_success() {
            return Err(ProviderFailure::new(&spec.name, FailureKind::HttpStatus { status: response.status }));
        }
        Ok(response)
    }
}

// =============================================================================
// REQUEST BUILDING
// =============================================================================

pub(crate) fn build_request(
    spec: &ProviderSpec,
    invocation: &Invocation,
    secret: &str,
    system_prompt: &str,
) -> OutboundRequest {
    let input = invocation.input.as_str();
    let mut headers = Vec::new();
    let mut query = Vec::new();

    let body = match &spec.request {
        RequestShape::ChatCompletions { model } => {
            let mut messages = Vec::new();
            if !system_prompt.trim().is_empty() {
                messages.push(json!({ "role": "system", "content": system_prompt }));
            }
            messages.push(json!({ "role": "user", "content": input }));
            Some(json!({ "model": model, "messages": messages }))
        }
        RequestShape::HfInputs => {
            let inputs = if system_prompt.trim().is_empty() {
                input.to_owned()
            } else {
                format!("{system_prompt}\n\n{input}")
            };
            Some(json!({ "inputs": inputs, "parameters": { "return_full_text": false } }))
        }
        RequestShape::FluxPrompt => Some(json!({ "prompt": input, "size": invocation.image_size.dimensions() })),
        RequestShape::StabilityTextToImage => {
            headers.push(("Accept".to_owned(), "application/json".to_owned()));
            Some(json!({
                "text_prompts": [{ "text": input }],
                "width": invocation.image_size.width,
                "height": invocation.image_size.height,
                "samples": 1,
            }))
        }
        RequestShape::QueryString => {
            query.push(("q".to_owned(), input.to_owned()));
            None
        }
        RequestShape::SerperJson => Some(json!({ "q": input })),
        RequestShape::GoogleCse { engine_id } => {
            query.push(("q".to_owned(), input.to_owned()));
            query.push(("cx".to_owned(), engine_id.clone()));
            None
        }
    };

    match &spec.auth {
        AuthScheme::Bearer => headers.push(("Authorization".to_owned(), format!("Bearer {secret}"))),
        AuthScheme::Header(name) => headers.push((name.clone(), secret.to_owned())),
        AuthScheme::Query(param) => query.push((param.clone(), secret.to_owned())),
    }

    OutboundRequest { method: spec.method(), url: spec.endpoint.clone(), headers, query, body }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
