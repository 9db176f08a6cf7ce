//! Rig listing API
//!
//! Records live under `rig:<id>` keys. Gallery entries that arrive as
//! `data:` URLs are moved to blob storage and replaced by their URLs.

use axum::Json;
use axum::extract::{Path, State};
use shared::featured::toggle_featured as rotate_featured;
use shared::response::{RigResponse, RigsResponse, SuccessResponse};
use shared::util::now_millis;
use shared::{Rig, RigDraft, RigUpdate, StatusUpdate};

use crate::error::{AppError, AppResult};
use crate::extract::ApiJson;
use crate::state::AppState;
use crate::store::decode_image_payload;

const RIG_PREFIX: &str = "rig:";

/// KV key of a rig. Older records use the key itself as id.
fn rig_key(id: &str) -> String {
    if id.starts_with(RIG_PREFIX) {
        id.to_string()
    } else {
        format!("{RIG_PREFIX}{id}")
    }
}

fn new_rig_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("rig-{}-{}", now_millis(), &suffix[..9])
}

async fn load_rig(state: &AppState, id: &str) -> AppResult<Rig> {
    state
        .kv
        .get_as::<Rig>(&rig_key(id))
        .await
        .ok_or_else(|| AppError::NotFound("Rig not found".into()))
}

async fn save_rig(state: &AppState, rig: &Rig) -> AppResult<()> {
    state.kv.set_as(rig_key(&rig.id), rig).await
}

/// Move inline images to blob storage, keeping URLs as they are.
///
/// Entries that cannot be decoded are dropped; order is preserved.
async fn store_gallery(state: &AppState, rig_id: &str, images: &[String]) -> Vec<String> {
    let dir = rig_id.trim_start_matches(RIG_PREFIX);
    let mut urls = Vec::with_capacity(images.len());

    for (index, image) in images.iter().enumerate() {
        if image.starts_with("http://") || image.starts_with("https://") {
            urls.push(image.clone());
            continue;
        }
        let blob = match decode_image_payload(image) {
            Ok(blob) => blob,
            Err(e) => {
                tracing::warn!(rig_id, index, error = %e, "Skipping invalid gallery image");
                continue;
            }
        };
        let nonce = uuid::Uuid::new_v4().simple().to_string();
        let path = format!("rigs/{dir}/image-{index}-{}.jpg", &nonce[..8]);
        if !state.blobs.put(&path, blob, false).await {
            tracing::warn!(rig_id, path = %path, "Blob path already taken");
            continue;
        }
        urls.push(state.config.blob_url(&path));
    }

    tracing::debug!(rig_id, stored = urls.len(), total = images.len(), "Stored gallery");
    urls
}

/// GET /rigs
pub async fn list(State(state): State<AppState>) -> Json<RigsResponse> {
    let rigs = state.kv.list_as::<Rig>(RIG_PREFIX).await;
    Json(RigsResponse { rigs })
}

/// POST /rigs
pub async fn create(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<RigDraft>,
) -> AppResult<Json<RigResponse>> {
    let draft = draft.normalized();
    draft.validate()?;

    let id = new_rig_id();
    let gallery_images = store_gallery(&state, &id, &draft.gallery_images).await;
    let Some(thumbnail) = gallery_images.first().cloned() else {
        return Err(AppError::BadRequest("At least one valid image is required".into()));
    };

    let rig = Rig {
        id,
        title: draft.title,
        rig_type: draft.rig_type,
        price: draft.price,
        location: draft.location,
        thumbnail,
        gallery_images,
        external_link: draft.external_link,
        year: draft.year,
        mileage: draft.mileage,
        length: draft.length,
        build_description: draft.build_description,
        story: draft.story,
        youtube_video: draft.youtube_video,
        instagram: draft.instagram,
        name: draft.name,
        highlights: draft.highlights,
        status: draft.status.unwrap_or_default(),
        featured: false,
        featured_order: None,
        created_at: Some(chrono::Utc::now().to_rfc3339()),
    };

    let _guard = state.rig_lock.lock().await;
    save_rig(&state, &rig).await?;
    tracing::info!(rig_id = %rig.id, images = rig.gallery_images.len(), "Rig listing created");

    Ok(Json(RigResponse {
        success: true,
        rig: Some(rig),
    }))
}

/// PUT /rigs/{id}
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<RigUpdate>,
) -> AppResult<Json<RigResponse>> {
    let mut patch = patch.normalized();
    patch.validate()?;

    let _guard = state.rig_lock.lock().await;
    let mut rig = load_rig(&state, &id).await?;

    if patch.is_empty() {
        return Ok(Json(RigResponse {
            success: true,
            rig: Some(rig),
        }));
    }

    if let Some(images) = patch.gallery_images.take() {
        let stored = store_gallery(&state, &rig.id, &images).await;
        if stored.is_empty() {
            return Err(AppError::BadRequest("At least one valid image is required".into()));
        }
        patch.gallery_images = Some(stored);
    }

    patch.apply_to(&mut rig);
    save_rig(&state, &rig).await?;
    tracing::info!(rig_id = %rig.id, "Rig updated");

    Ok(Json(RigResponse {
        success: true,
        rig: Some(rig),
    }))
}

/// PUT /rigs/{id}/status
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<StatusUpdate>,
) -> AppResult<Json<RigResponse>> {
    let _guard = state.rig_lock.lock().await;
    let mut rig = load_rig(&state, &id).await?;
    rig.status = req.status;
    save_rig(&state, &rig).await?;
    tracing::info!(rig_id = %rig.id, status = %rig.status, "Rig status updated");

    Ok(Json(RigResponse {
        success: true,
        rig: Some(rig),
    }))
}

/// PUT /rigs/{id}/featured
///
/// Featuring a rig while every slot is taken evicts the oldest featured rig.
pub async fn toggle_featured(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<RigResponse>> {
    let _guard = state.rig_lock.lock().await;
    let mut rigs = state.kv.list_as::<Rig>(RIG_PREFIX).await;

    let outcome = rotate_featured(&mut rigs, &id, now_millis())
        .ok_or_else(|| AppError::NotFound("Rig not found".into()))?;

    for evicted in &outcome.evicted {
        if let Some(rig) = rigs.iter().find(|r| &r.id == evicted) {
            save_rig(&state, rig).await?;
            tracing::info!(rig_id = %rig.id, "Rig evicted from featured");
        }
    }

    let Some(rig) = rigs.into_iter().find(|r| r.id == id) else {
        return Err(AppError::NotFound("Rig not found".into()));
    };
    save_rig(&state, &rig).await?;
    tracing::info!(rig_id = %rig.id, featured = rig.featured, "Featured toggled");

    Ok(Json(RigResponse {
        success: true,
        rig: Some(rig),
    }))
}

/// DELETE /rigs/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SuccessResponse>> {
    let _guard = state.rig_lock.lock().await;
    if !state.kv.del(&rig_key(&id)).await {
        return Err(AppError::NotFound("Rig not found".into()));
    }
    tracing::info!(rig_id = %id, "Rig listing deleted");
    Ok(Json(SuccessResponse::ok()))
}
