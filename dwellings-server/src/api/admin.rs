//! Admin password check

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use http::{HeaderMap, StatusCode};
use shared::response::{SuccessResponse, VerifyAdminRequest, VerifyAdminResponse};

use crate::auth::{ADMIN_TOKEN_HEADER, constant_time_eq};
use crate::extract::ApiJson;
use crate::state::AppState;

/// POST /verify-admin
///
/// A wrong password is a normal `{ success: false }` answer, not an error.
pub async fn verify_admin(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VerifyAdminRequest>,
) -> Response {
    let Some(expected) = state.config.admin_password.as_deref() else {
        tracing::error!("ADMIN_PASSWORD not configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(VerifyAdminResponse {
                success: false,
                token: None,
                error: Some("Admin password not configured".into()),
            }),
        )
            .into_response();
    };

    if !constant_time_eq(&req.password, expected) {
        tracing::info!("Admin password mismatch");
        return Json(VerifyAdminResponse::default()).into_response();
    }

    let token = state.admin_tokens.issue().await;
    tracing::info!("Admin access granted");
    Json(VerifyAdminResponse {
        success: true,
        token: Some(token),
        error: None,
    })
    .into_response()
}

/// POST /logout
///
/// Revokes the presented admin token. Succeeds whether or not the token was
/// still known.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Json<SuccessResponse> {
    let token = headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok());
    if let Some(token) = token {
        let revoked = state.admin_tokens.revoke(token).await;
        tracing::info!(revoked, "Admin logged out");
    }
    Json(SuccessResponse::ok())
}
