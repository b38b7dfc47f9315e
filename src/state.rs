//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the provider dispatcher, the intent
//! classifier, and the identity every request is attributed to until real
//! auth lands. All of it is immutable after startup.

use std::sync::Arc;

use sqlx::PgPool;

use crate::providers::Dispatcher;
use crate::routes::auth::DevUser;
use crate::services::intent::IntentClassifier;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub dispatcher: Arc<Dispatcher>,
    /// Picks a mode when the client does not send one.
    pub classifier: Arc<dyn IntentClassifier>,
    pub dev_user: DevUser,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, dispatcher: Arc<Dispatcher>, classifier: Arc<dyn IntentClassifier>, dev_user: DevUser) -> Self {
        Self { pool, dispatcher, classifier, dev_user }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
