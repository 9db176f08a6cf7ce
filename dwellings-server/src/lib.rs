//! Dwellings Server - reference store backend
//!
//! Key-value records, blob storage, admin password check and an e-mail
//! relay behind the HTTP surface the dwellings client speaks.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod mail;
pub mod state;
pub mod store;

pub use api::router;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
