//! Provider configuration parsed from environment variables.
//!
//! This is the only place provider credentials are read from the process
//! environment. The dispatcher receives them through a [`StaticSecrets`]
//! store and never touches the environment itself.

use super::secrets::StaticSecrets;
use super::types::Capability;

pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PROVIDER_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Secret name → environment variable holding its value.
pub const SECRET_ENV_VARS: &[(&str, &str)] = &[
    ("groq-api-key", "GROQ_API_KEY"),
    ("hf-api-key", "HF_API_KEY"),
    ("flux-api-key", "FLUX_API_KEY"),
    ("stability-api-key", "STABILITY_API_KEY"),
    ("exa-api-key", "EXA_API_KEY"),
    ("serper-api-key", "SERPER_API_KEY"),
    ("google-cse-key", "GOOGLE_CSE_KEY"),
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// A provider was placed in a chain its response shape cannot serve.
    #[error("provider {provider} cannot serve the {capability} chain")]
    ShapeMismatch { provider: String, capability: Capability },
}

impl crate::error::ErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::ShapeMismatch { .. } => "E_PROVIDER_SHAPE_MISMATCH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderTimeouts {
    /// Upper bound on a single provider attempt, connect through body.
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Non-secret knobs the standard catalog needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSettings {
    pub groq_model: String,
    pub google_cse_id: Option<String>,
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self { groq_model: DEFAULT_GROQ_MODEL.to_string(), google_cse_id: None }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub secrets: StaticSecrets,
    /// Opaque text sent as the system message to chat providers.
    pub system_prompt: String,
    pub timeouts: ProviderTimeouts,
    pub catalog: CatalogSettings,
}

impl ProviderConfig {
    /// Build typed provider config from environment variables.
    ///
    /// Optional:
    /// - one variable per entry of [`SECRET_ENV_VARS`]; unset or blank
    ///   values leave that provider without a credential
    /// - `SYSTEM_PROMPT`: default empty
    /// - `GROQ_MODEL`: default `llama-3.1-8b-instant`
    /// - `GOOGLE_CSE_ID`: Google CSE fallback disabled when absent
    /// - `PROVIDER_TIMEOUT_SECS`: default 30, must be non-zero
    /// - `PROVIDER_CONNECT_TIMEOUT_SECS`: default 10, must be non-zero
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ConfigParse`] when a timeout is zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut secrets = StaticSecrets::new();
        for (name, var) in SECRET_ENV_VARS {
            if let Some(value) = non_blank_env(var) {
                secrets.insert(*name, value);
            }
        }

        let timeouts = ProviderTimeouts {
            request_secs: env_parse_u64("PROVIDER_TIMEOUT_SECS", DEFAULT_PROVIDER_TIMEOUT_SECS),
            connect_secs: env_parse_u64("PROVIDER_CONNECT_TIMEOUT_SECS", DEFAULT_PROVIDER_CONNECT_TIMEOUT_SECS),
        };
        if timeouts.request_secs == 0 || timeouts.connect_secs == 0 {
            return Err(ConfigError::ConfigParse("provider timeouts must be greater than zero".into()));
        }

        let catalog = CatalogSettings {
            groq_model: non_blank_env("GROQ_MODEL").unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            google_cse_id: non_blank_env("GOOGLE_CSE_ID"),
        };

        Ok(Self {
            secrets,
            system_prompt: std::env::var("SYSTEM_PROMPT").unwrap_or_default(),
            timeouts,
            catalog,
        })
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
