//! Scripted transport for tests. Replies are queued per URL and every
//! request is recorded in call order.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;

use super::catalog::ProviderChains;
use super::client::{HttpTransport, OutboundRequest, ProviderClient, TransportError};
use super::config::CatalogSettings;
use super::dispatcher::Dispatcher;
use super::secrets::{SecretStore, StaticSecrets};
use super::types::RawResponse;

pub enum MockReply {
    Json(u16, Value),
    Raw { status: u16, content_type: Option<String>, body: Vec<u8> },
    Network(String),
    /// Never answers within any sane test timeout.
    Hang,
}

#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<HashMap<String, VecDeque<MockReply>>>,
    calls: Mutex<Vec<OutboundRequest>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `reply` for the next request to `url`.
    #[must_use]
    pub fn reply(self, url: &str, reply: MockReply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry(url.to_owned())
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<OutboundRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_urls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }
}

#[async_trait::async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse, TransportError> {
        let url = request.url.clone();
        self.calls.lock().unwrap().push(request);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&url)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(MockReply::Json(status, body)) => Ok(RawResponse::json(status, &body)),
            Some(MockReply::Raw { status, content_type, body }) => Ok(RawResponse { status, content_type, body }),
            Some(MockReply::Network(message)) => Err(TransportError(message)),
            Some(MockReply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(TransportError("hung".into()))
            }
            None => Err(TransportError(format!("no mock reply for {url}"))),
        }
    }
}

/// Every secret the standard catalog names, with dummy values.
#[must_use]
pub fn all_secrets() -> StaticSecrets {
    super::config::SECRET_ENV_VARS
        .iter()
        .fold(StaticSecrets::new(), |acc, (name, _)| acc.with(*name, format!("test-{name}")))
}

/// Catalog settings with the Google CSE fallback enabled.
#[must_use]
pub fn test_settings() -> CatalogSettings {
    CatalogSettings { google_cse_id: Some("cse-test".into()), ..CatalogSettings::default() }
}

/// Dispatcher over the standard catalog, backed by `transport`.
#[must_use]
pub fn dispatcher_with(transport: Arc<MockTransport>) -> Dispatcher {
    dispatcher_with_secrets(transport, Arc::new(all_secrets()), Duration::from_secs(5))
}

#[must_use]
pub fn dispatcher_with_secrets(
    transport: Arc<MockTransport>,
    secrets: Arc<dyn SecretStore>,
    attempt_timeout: Duration,
) -> Dispatcher {
    let chains = ProviderChains::standard(&test_settings()).expect("standard catalog is valid");
    let client = ProviderClient::new(transport, secrets, "You are Funmi.");
    Dispatcher::new(Arc::new(chains), client, attempt_timeout)
}
