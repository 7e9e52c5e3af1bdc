//! REST endpoints for match discovery and lifecycle.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use cassino::GameState;
use cassino::game::MatchRules;
use cassino::table::{MatchConfig, MatchMessage, MatchMetadata};

use super::AppState;
use crate::{config, metrics};

/// Request body for creating a match. Omitted rule fields fall back to
/// the server defaults.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMatchRequest {
    pub name: Option<String>,
    pub build_ceiling: Option<u8>,
    pub completion_target: Option<u8>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCreated {
    pub id: Uuid,
    pub name: String,
    pub rules: MatchRules,
}

/// List all open matches
pub async fn list_matches(State(state): State<AppState>) -> Json<Vec<MatchMetadata>> {
    Json(state.match_manager.list_matches().await)
}

/// Create a new match and spawn its actor. Client rule overrides go
/// through the same validation as the server defaults.
pub async fn create_match(
    State(state): State<AppState>,
    Json(req): Json<CreateMatchRequest>,
) -> Result<(StatusCode, Json<MatchCreated>), (StatusCode, String)> {
    let defaults = state.config.rules;
    let rules = MatchRules {
        build_ceiling: req.build_ceiling.unwrap_or(defaults.build_ceiling),
        completion_target: req.completion_target.unwrap_or(defaults.completion_target),
        max_build_cards: defaults.max_build_cards,
    };
    config::validate_rules(&rules)
        .map_err(|err| (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()))?;
    let name = req.name.unwrap_or_else(|| "Casual match".to_string());

    let config = MatchConfig {
        name: name.clone(),
        rules,
        contact_threshold: state.config.contact_threshold,
    };
    let handle = state.match_manager.create_match(config).await;
    metrics::set_matches_active(state.match_manager.match_count().await);

    info!("Created match '{}' with ID {}", name, handle.match_id());

    Ok((
        StatusCode::CREATED,
        Json(MatchCreated {
            id: handle.match_id(),
            name,
            rules,
        }),
    ))
}

/// Fetch the authoritative snapshot for one match
pub async fn get_match_state(
    State(state): State<AppState>,
    Path(match_id): Path<Uuid>,
) -> Result<Json<GameState>, StatusCode> {
    let handle = state
        .match_manager
        .get_match(match_id)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    let (tx, rx) = tokio::sync::oneshot::channel();
    handle
        .send(MatchMessage::GetState { response: tx })
        .await
        .map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;

    let snapshot = rx.await.map_err(|_| StatusCode::SERVICE_UNAVAILABLE)?;
    Ok(Json(snapshot))
}

/// Close a match and drop its actor
pub async fn close_match(
    State(state): State<AppState>,
    Path(match_id): Path<Uuid>,
) -> StatusCode {
    match state.match_manager.close_match(match_id).await {
        Ok(()) => {
            metrics::set_matches_active(state.match_manager.match_count().await);
            StatusCode::NO_CONTENT
        }
        Err(_) => StatusCode::NOT_FOUND,
    }
}
