//! API routes

pub mod admin;
pub mod blobs;
pub mod deals;
pub mod feature;
pub mod health;
pub mod rigs;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use http::{HeaderName, Method, header};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{ADMIN_TOKEN_HEADER, require_admin, require_anon_key};
use crate::state::AppState;

/// Request bodies carry base64 images
const MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

/// Build the full router with state attached
pub fn router(state: AppState) -> Router {
    // Visitor-facing (anon key only)
    let public = Router::new()
        .route("/rigs", get(rigs::list).post(rigs::create))
        .route("/deals", get(deals::list))
        .route("/verify-admin", post(admin::verify_admin))
        .route("/logout", post(admin::logout))
        .route("/feature-submission", post(feature::submit));

    // Mutations (anon key + admin token)
    let admin = Router::new()
        .route("/rigs/{id}", put(rigs::update).delete(rigs::delete))
        .route("/rigs/{id}/status", put(rigs::update_status))
        .route("/rigs/{id}/featured", put(rigs::toggle_featured))
        .route("/deals", post(deals::create))
        .route("/deals/{id}", put(deals::update).delete(deals::delete))
        .route("/deals/upload-image", post(deals::upload_image))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    let api = public
        .merge(admin)
        .layer(middleware::from_fn_with_state(state.clone(), require_anon_key));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/blobs/{*path}", get(blobs::serve))
        .merge(api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static(ADMIN_TOKEN_HEADER),
        ])
        .expose_headers([header::CONTENT_LENGTH])
        .max_age(std::time::Duration::from_secs(600))
}
