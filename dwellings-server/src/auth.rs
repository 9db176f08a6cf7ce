//! Request authorization
//!
//! Two gates: the shared anonymous bearer key on every API route, and the
//! admin token (from `POST /verify-admin`) on mutating routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the admin token
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Compare secrets without short-circuiting on the first mismatch.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Require `Authorization: Bearer <anon key>` when an anon key is configured.
pub async fn require_anon_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.config.anon_key.as_deref() {
        let presented = request
            .headers()
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| AppError::Unauthorized("Missing Authorization header".into()))?;

        if !constant_time_eq(presented, expected) {
            tracing::debug!(path = %request.uri().path(), "Rejected anon key");
            return Err(AppError::Unauthorized("Invalid API key".into()));
        }
    }
    Ok(next.run(request).await)
}

/// Require a valid admin token.
pub async fn require_admin(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Forbidden("Admin access required".into()))?;

    if !state.admin_tokens.is_valid(token).await {
        tracing::warn!(
            method = %request.method(),
            path = %request.uri().path(),
            "Rejected admin token"
        );
        return Err(AppError::Forbidden("Invalid admin token".into()));
    }
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("secret", "secret"));
        assert!(!constant_time_eq("secret", "secreT"));
        assert!(!constant_time_eq("secret", "secrets"));
        assert!(constant_time_eq("", ""));
    }
}
