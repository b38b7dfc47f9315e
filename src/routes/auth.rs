//! Request identity.
//!
//! There is no login flow yet: every request is attributed to one
//! configured development user. Handlers take [`DevUser`] as an extractor so
//! swapping in real authentication only touches this file.

use std::convert::Infallible;

use axum::extract::FromRef;
use serde::Serialize;

use crate::state::AppState;

pub const DEFAULT_DEV_USER_ID: &str = "dev-user-001";
pub const DEFAULT_DEV_USER_EMAIL: &str = "dev@funmi.ai";

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// The user a request acts as.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevUser {
    pub id: String,
    pub email: String,
}

impl DevUser {
    /// Read `DEV_USER_ID` / `DEV_USER_EMAIL`, falling back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            id: env_or("DEV_USER_ID", DEFAULT_DEV_USER_ID),
            email: env_or("DEV_USER_EMAIL", DEFAULT_DEV_USER_EMAIL),
        }
    }
}

impl Default for DevUser {
    fn default() -> Self {
        Self { id: DEFAULT_DEV_USER_ID.into(), email: DEFAULT_DEV_USER_EMAIL.into() }
    }
}

// =============================================================================
// EXTRACTOR
// =============================================================================

impl<S> axum::extract::FromRequestParts<S> for DevUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(_parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        Ok(AppState::from_ref(state).dev_user)
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
