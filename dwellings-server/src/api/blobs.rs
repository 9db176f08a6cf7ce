//! Blob download

use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use http::header;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /blobs/{*path}
pub async fn serve(State(state): State<AppState>, Path(path): Path<String>) -> AppResult<Response> {
    let blob = state
        .blobs
        .get(&path)
        .await
        .ok_or_else(|| AppError::NotFound("Image not found".into()))?;

    Ok((
        [
            (header::CONTENT_TYPE, blob.content_type),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable".to_string()),
        ],
        blob.bytes,
    )
        .into_response())
}
