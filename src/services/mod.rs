//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own intent resolution, file analysis, and session
//! persistence so route handlers stay focused on request parsing. Provider
//! dispatch itself lives in `crate::providers`.

pub mod analysis;
pub mod intent;
pub mod message;
pub mod session;
