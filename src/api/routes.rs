use axum::{
    extract::State,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::engine::MarketEngine;
use crate::models::MarketSnapshot;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<MarketEngine>,
}

/// Create the API router
pub fn create_router(engine: Arc<MarketEngine>) -> Router {
    let state = AppState { engine };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/data", get(get_market_data))
        .layer(cors)
        .with_state(state)
}

// ===== Route Handlers =====

/// Health check endpoint
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Build a fresh snapshot per request. Cannot fail: degraded upstream
/// sources yield sentinel fields, never an error response.
async fn get_market_data(State(state): State<AppState>) -> Json<MarketSnapshot> {
    Json(state.engine.build_snapshot().await)
}

// ===== Response Types =====

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}
