//! Shared types for the Mobile Dwellings stack
//!
//! Data model and wire envelopes used by both the store client and the
//! reference backend, plus the pure rules that operate on them (slugs,
//! featured rotation, product ordering).

pub mod error;
pub mod featured;
pub mod models;
pub mod response;
pub mod util;

// Re-exports
pub use error::{ModelError, ModelResult};
pub use models::*;
pub use serde::{Deserialize, Serialize};
