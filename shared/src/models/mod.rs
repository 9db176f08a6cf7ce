//! Data models
//!
//! Shared between the store client and the backend (camelCase on the wire).

pub mod feature;
pub mod product;
pub mod rig;

// Re-exports
pub use feature::*;
pub use product::*;
pub use rig::*;
