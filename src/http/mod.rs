pub mod dto;
pub mod handlers;

use std::sync::Arc;

use axum::error_handling::HandleErrorLayer;
use axum::http::{HeaderValue, Method, StatusCode};
use axum::routing::{get, post};
use axum::{BoxError, Json, Router};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the service's axum [`Router`]: the five endpoints of §4.1, a
/// credentialed CORS policy restricted to the configured origin, a
/// per-request trace span, and the request-deadline timeout of §5 (mapped
/// to the `Deadline` taxonomy entry on trip).
pub fn build_router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let origin: HeaderValue = state.config.allowed_origin.parse()?;
    let deadline = state.config.request_deadline;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    let middleware = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(handle_deadline_error))
        .timeout(deadline)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let router = Router::new()
        .route("/hospitals/severity-based", post(handlers::severity_based))
        .route("/pincode/:code", get(handlers::pincode))
        .route("/symptoms/classify", post(handlers::classify))
        .route("/hospitals", get(handlers::hospitals))
        .route("/hospitals/stats", get(handlers::stats))
        .route("/health", get(handlers::health))
        .layer(middleware)
        .with_state(state);

    Ok(router)
}

async fn handle_deadline_error(err: BoxError) -> (StatusCode, Json<serde_json::Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::GATEWAY_TIMEOUT,
            Json(json!({ "error": "Deadline", "message": "request deadline exceeded" })),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "StoreError", "message": err.to_string() })),
        )
    }
}
