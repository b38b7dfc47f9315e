//! Providers: multi-provider fallback dispatch for chat, image, and search.
//!
//! DESIGN
//! ======
//! `catalog` holds the immutable provider chains, `client` issues one call
//! per attempt, `normalize` pulls the canonical field out of each provider's
//! response shape, and `dispatcher` walks a chain until something usable
//! comes back. Configuration is read once from the environment by `config`
//! and injected; nothing below this module reads ambient state.

pub mod catalog;
pub mod client;
pub mod config;
pub mod dispatcher;
pub mod normalize;
pub mod secrets;
pub mod types;

#[cfg(test)]
pub mod mock;

use std::sync::Arc;
use std::time::Duration;

use catalog::ProviderChains;
use client::{ProviderClient, ReqwestTransport};
use config::{ConfigError, ProviderConfig};
use types::{Capability, SearchMode};
pub use dispatcher::{Dispatch, Dispatcher};

impl Dispatcher {
    /// Build a dispatcher over the standard catalog from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a timeout is invalid or the HTTP client fails.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_config(ProviderConfig::from_env()?)
    }

    /// Build a dispatcher over the standard catalog from a parsed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or a standard chain
    /// fails shape validation.
    pub fn from_config(config: ProviderConfig) -> Result<Self, ConfigError> {
        let transport = ReqwestTransport::new(config.timeouts)?;
        let chains = ProviderChains::standard(&config.catalog)?;
        tracing::info!(
            secrets = ?config.secrets.names(),
            research_chain = chains.chain_for(Capability::Search, SearchMode::Research).len(),
            web_chain = chains.chain_for(Capability::Search, SearchMode::Web).len(),
            timeout_secs = config.timeouts.request_secs,
            "providers: dispatcher configured"
        );
        let client = ProviderClient::new(Arc::new(transport), Arc::new(config.secrets), &config.system_prompt);
        Ok(Self::new(Arc::new(chains), client, Duration::from_secs(config.timeouts.request_secs)))
    }
}
