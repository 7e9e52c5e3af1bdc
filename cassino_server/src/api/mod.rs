//! HTTP and WebSocket API for the casino server.

pub mod matches;
pub mod websocket;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use cassino::table::MatchManager;
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub match_manager: Arc<MatchManager>,
    pub config: Arc<ServerConfig>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route(
            "/api/matches",
            get(matches::list_matches).post(matches::create_match),
        )
        .route(
            "/api/matches/{match_id}",
            get(matches::get_match_state).delete(matches::close_match),
        )
        .route("/ws/{match_id}", get(websocket::websocket_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
