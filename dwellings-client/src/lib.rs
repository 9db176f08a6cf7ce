//! Dwellings Client - store client and catalog mirrors
//!
//! Talks to the Mobile Dwellings store backend over HTTP (or in-process via
//! [`OneshotHttpClient`]) and keeps local mirrors of its collections.

pub mod catalog;
pub mod config;
pub mod error;
pub mod feature;
pub mod http;
pub mod image;
pub mod oneshot;
pub mod session;
pub mod storage;
pub mod store;
pub mod video;

pub use catalog::{ProductCatalog, RigCatalog};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use feature::FeatureRelay;
pub use http::{ADMIN_TOKEN_HEADER, HttpClient, NetworkHttpClient};
pub use image::{ImageError, ImageSource};
pub use oneshot::OneshotHttpClient;
pub use session::AdminSession;
pub use storage::LocalStorage;
pub use store::StoreClient;
pub use video::{Video, VideoFeed};

// Re-export shared types for convenience
pub use shared::{
    FeatureDetails, Product, ProductCategory, ProductCreate, ProductUpdate, Rig, RigDraft,
    RigStatus, RigUpdate,
};
