//! Capability dispatcher: walks a provider chain until one answers.
//!
//! DESIGN
//! ======
//! For an invocation, the dispatcher loads the chain for its capability
//! (and search mode), then tries each provider in order: call, normalize,
//! return on the first usable result. Every failure is logged and the next
//! provider is tried. When the chain runs out, the capability's degraded
//! default is returned. There is no error path out of [`Dispatcher::dispatch`].
//!
//! Attempts are sequential. Each attempt is bounded by `attempt_timeout`;
//! expiry counts as a network failure and advances the chain.

use std::sync::Arc;
use std::time::{Duration, Instant};

use time::OffsetDateTime;
use tracing::{info, warn};

use super::catalog::{ProviderChains, ProviderSpec};
use super::client::ProviderClient;
use super::normalize::normalize;
use super::types::{Capability, FailureKind, Invocation, NormalizedResult, ProviderFailure, SearchMode};
use crate::error::ErrorCode;

/// Outcome of one dispatch: the result plus which provider produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub result: NormalizedResult,
    /// `None` when the degraded default was returned.
    pub served_by: Option<String>,
}

impl Dispatch {
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.served_by.is_none()
    }
}

pub struct Dispatcher {
    chains: Arc<ProviderChains>,
    client: ProviderClient,
    attempt_timeout: Duration,
}

impl Dispatcher {
    #[must_use]
    pub fn new(chains: Arc<ProviderChains>, client: ProviderClient, attempt_timeout: Duration) -> Self {
        Self { chains, client, attempt_timeout }
    }

    /// Dispatch `input` as `capability`. Always resolves.
    pub async fn invoke(&self, capability: Capability, input: &str, sub_mode: Option<SearchMode>) -> NormalizedResult {
        self.dispatch(&Invocation::new(capability, input, sub_mode))
            .await
            .result
    }

    /// Walk the chain for `invocation`, first success wins.
    pub async fn dispatch(&self, invocation: &Invocation) -> Dispatch {
        let capability = invocation.capability;
        let chain = self
            .chains
            .chain_for(capability, invocation.search_mode);

        for (position, spec) in chain.iter().enumerate() {
            let started = Instant::now();
            match self.attempt(spec, invocation).await {
                Ok(result) => {
                    info!(
                        %capability,
                        search_mode = invocation.search_mode.as_str(),
                        provider = %spec.name,
                        position,
                        elapsed_ms = elapsed_ms(started),
                        "dispatch: provider answered"
                    );
                    return Dispatch { result, served_by: Some(spec.name.clone()) };
                }
                Err(failure) => {
                    warn!(
                        %capability,
                        provider = %failure.provider,
                        position,
                        code = failure.error_code(),
                        elapsed_ms = elapsed_ms(started),
                        error = %failure.kind,
                        "dispatch: provider failed, advancing"
                    );
                }
            }
        }

        warn!(
            %capability,
            search_mode = invocation.search_mode.as_str(),
            attempted = chain.len(),
            requested_at = %invocation.timestamp,
            waited_ms = elapsed_since(invocation.timestamp),
            "dispatch: chain exhausted, returning degraded default"
        );
        Dispatch { result: degraded_default(invocation), served_by: None }
    }

    async fn attempt(&self, spec: &ProviderSpec, invocation: &Invocation) -> Result<NormalizedResult, ProviderFailure> {
        let raw = tokio::time::timeout(self.attempt_timeout, self.client.call(spec, invocation))
            .await
            .map_err(|_| {
                ProviderFailure::new(
                    &spec.name,
                    FailureKind::Network(format!("timed out after {}ms", self.attempt_timeout.as_millis())),
                )
            })??;

        normalize(spec.response, &raw).map_err(|kind| ProviderFailure::new(&spec.name, kind))
    }
}

/// The canned value returned when every provider in the chain failed.
#[must_use]
pub fn degraded_default(invocation: &Invocation) -> NormalizedResult {
    let input = invocation.input.as_str();
    match (invocation.capability, invocation.search_mode) {
        (Capability::Chat, _) => {
            NormalizedResult::text(format!("Sorry, I couldn't generate a response at the moment. You said: {input}"))
        }
        (Capability::Image, _) => NormalizedResult::text(format!("Sorry, I couldn't generate an image for: {input}")),
        (Capability::Search, SearchMode::Research) => NormalizedResult::snippet("No research result found."),
        (Capability::Search, SearchMode::Web) => NormalizedResult::snippet(format!("No results found for: {input}")),
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Milliseconds from `since` to now, clamped at zero.
fn elapsed_since(since: OffsetDateTime) -> i64 {
    i64::try_from((OffsetDateTime::now_utc() - since).whole_milliseconds().max(0)).unwrap_or(i64::MAX)
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod tests;
