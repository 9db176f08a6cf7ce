//! Wire envelopes
//!
//! Request and response bodies of the store API. Every mutating endpoint
//! answers with a `success` flag next to the affected record; failures carry
//! `{ "error": ..., "details": ... }` with a non-2xx status.

use serde::{Deserialize, Serialize};

use crate::models::{Product, Rig};

/// `GET /rigs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RigsResponse {
    #[serde(default)]
    pub rigs: Vec<Rig>,
}

/// `POST /rigs`, `PUT /rigs/{id}`, `PUT /rigs/{id}/status`, `PUT /rigs/{id}/featured`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rig: Option<Rig>,
}

/// `POST /deals`, `PUT /deals/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

/// One element of `GET /deals`
///
/// Older backends returned raw key-value rows instead of bare products.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DealEntry {
    Wrapped { key: String, value: Product },
    Plain(Product),
}

impl DealEntry {
    pub fn into_product(self) -> Product {
        match self {
            Self::Wrapped { value, .. } => value,
            Self::Plain(product) => product,
        }
    }
}

/// Bare acknowledgement (`DELETE`, `POST /feature-submission`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuccessResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            ..Default::default()
        }
    }

    pub fn ok_with_message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }
}

/// Body of every non-2xx response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// `POST /deals/upload-image`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageRequest {
    /// JPEG `data:` URL
    pub base64_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadImageResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// `POST /verify-admin`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyAdminRequest {
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyAdminResponse {
    #[serde(default)]
    pub success: bool,
    /// Admin token for the `X-Admin-Token` header; absent on older backends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
