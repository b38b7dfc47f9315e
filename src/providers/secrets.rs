//! Credential lookup injected into the provider client.

use std::collections::HashMap;
use std::fmt;

/// Resolves a provider's named secret. Implementations must be cheap and
/// side-effect free; the client calls this once per attempt.
pub trait SecretStore: Send + Sync {
    fn resolve(&self, name: &str) -> Option<String>;
}

/// In-memory secret map, filled once at startup.
#[derive(Clone, Default)]
pub struct StaticSecrets {
    values: HashMap<String, String>,
}

impl StaticSecrets {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Configured secret names, sorted. Values are never exposed.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.values.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl SecretStore for StaticSecrets {
    fn resolve(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

// Redacted: secrets must not leak through `{:?}` in logs.
impl fmt::Debug for StaticSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticSecrets").field("names", &self.names()).finish()
    }
}
