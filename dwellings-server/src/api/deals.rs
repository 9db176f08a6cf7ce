//! Affiliate product ("deal") API
//!
//! Records live under `deal:<id>` keys.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use shared::response::{ProductResponse, SuccessResponse, UploadImageRequest, UploadImageResponse};
use shared::util::now_millis;
use shared::{Product, ProductCreate, ProductUpdate};

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::store::decode_image_payload;

const DEAL_PREFIX: &str = "deal:";

fn deal_key(id: &str) -> String {
    format!("{DEAL_PREFIX}{id}")
}

/// `POST /deals` body; a client may choose the id itself.
#[derive(Debug, Deserialize)]
pub struct NewDeal {
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    product: ProductCreate,
}

/// GET /deals
pub async fn list(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.kv.list_as::<Product>(DEAL_PREFIX).await)
}

/// POST /deals
pub async fn create(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewDeal>,
) -> AppResult<Json<ProductResponse>> {
    req.product.validate()?;

    let id = req.id.filter(|id| !id.trim().is_empty()).unwrap_or_else(|| {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("deal-{}-{}", now_millis(), &suffix[..9])
    });
    let product = req.product.into_product(id);
    state.kv.set_as(deal_key(&product.id), &product).await?;
    tracing::info!(product_id = %product.id, "Deal saved");

    Ok(Json(ProductResponse {
        success: true,
        product: Some(product),
    }))
}

/// PUT /deals/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<ProductUpdate>,
) -> AppResult<Json<ProductResponse>> {
    patch.validate()?;

    let key = deal_key(&id);
    let mut product = state
        .kv
        .get_as::<Product>(&key)
        .await
        .ok_or_else(|| AppError::NotFound("Deal not found".into()))?;
    patch.apply_to(&mut product);
    state.kv.set_as(key, &product).await?;
    tracing::info!(product_id = %id, "Deal updated");

    Ok(Json(ProductResponse {
        success: true,
        product: Some(product),
    }))
}

/// DELETE /deals/{id}
///
/// Deleting a missing deal succeeds.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<SuccessResponse> {
    let existed = state.kv.del(&deal_key(&id)).await;
    tracing::info!(product_id = %id, existed, "Deal deleted");
    Json(SuccessResponse::ok())
}

/// POST /deals/upload-image
pub async fn upload_image(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UploadImageRequest>,
) -> AppResult<Json<UploadImageResponse>> {
    if req.base64_image.trim().is_empty() {
        return Err(AppError::BadRequest("No image provided".into()));
    }
    let blob = decode_image_payload(&req.base64_image)
        .map_err(|e| AppError::BadRequest(format!("Invalid image: {e}")))?;

    let now = now_millis();
    let owner = req
        .product_id
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(|| now.to_string());
    let path = format!("deals/{owner}-{now}.jpg");
    state.blobs.put(&path, blob, true).await;
    tracing::info!(path = %path, "Deal image uploaded");

    Ok(Json(UploadImageResponse {
        success: true,
        url: Some(state.config.blob_url(&path)),
        path: Some(path),
    }))
}
