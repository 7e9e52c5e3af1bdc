//! WebSocket handler for real-time match communication.
//!
//! Clients connect via `GET /ws/{match_id}?player=N` and hold the
//! connection for the whole match. The server pushes a full state
//! snapshot after every applied action (notifications come from the
//! match actor, so there is no polling), and answers client commands
//! in order.
//!
//! # Client messages
//!
//! - `action`: one action envelope for the rules engine
//! - `determineActions`: a drag ended at (x, y); resolve the contact
//!   under the release point and compute the candidate actions
//! - `reportPosition` / `removePosition` / `clearPositions`: the layout
//!   collaborator keeping the contact registry current
//! - `getState`: explicit snapshot request (reconnect recovery)
//!
//! # Server messages
//!
//! - `state`: full authoritative snapshot
//! - `actionPlan`: candidate actions for the last drag-end
//! - `success` / `rejected` / `error`: command outcomes; `rejected`
//!   means the rules engine refused the action and the client should
//!   snap the dragged card back
//! - `gameOver` / `matchClosed`: terminal notifications

use axum::{
    extract::{
        Path, Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cassino::contact::ContactPosition;
use cassino::game::constants::NUM_PLAYERS;
use cassino::game::{Action, ActionPlan, DragSource};
use cassino::table::{MatchHandle, MatchMessage, MatchResponse, StateChangeNotification};
use cassino::{Card, GameState};

use super::AppState;
use crate::{logging, metrics};

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    player: usize,
}

/// Client messages received via WebSocket
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ClientMessage {
    /// One action envelope for the rules engine
    Action { action: Action },
    /// Drag ended at a release point; resolve and plan
    DetermineActions {
        dragged: Card,
        x: f64,
        y: f64,
        source: DragSource,
    },
    /// Layout collaborator reporting an object's screen bounds
    ReportPosition { position: ContactPosition },
    /// Layout collaborator removing an unmounted object
    RemovePosition { id: String },
    /// Drop every reported position
    ClearPositions,
    /// Explicit snapshot request
    GetState,
}

/// Response messages sent to client
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum ServerMessage {
    State { state: GameState },
    ActionPlan { plan: ActionPlan },
    Success { message: String },
    Rejected { message: String },
    Error { message: String },
    GameOver,
    MatchClosed,
}

/// Upgrade HTTP connection to WebSocket for real-time match communication.
///
/// # Path parameters
///
/// - `match_id`: Match to connect to
///
/// # Query parameters
///
/// - `player`: Seat index (0 or 1)
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Path(match_id): Path<Uuid>,
    Query(query): Query<WsQuery>,
    State(state): State<AppState>,
) -> Response {
    if query.player >= NUM_PLAYERS {
        return (StatusCode::BAD_REQUEST, "Player index must be 0 or 1").into_response();
    }

    ws.on_upgrade(move |socket| handle_socket(socket, match_id, query.player, state))
}

/// Handle an established WebSocket connection: subscribe to the match
/// actor, push snapshots on change, process client commands in order,
/// and unsubscribe on disconnect.
async fn handle_socket(socket: WebSocket, match_id: Uuid, player: usize, state: AppState) {
    let (mut sender, mut receiver) = socket.split();

    info!("WebSocket connected: match={match_id}, player={player}");
    metrics::record_ws_connected();

    // Channel for sending responses from the message handler
    let (response_tx, mut response_rx) = tokio::sync::mpsc::channel::<String>(32);

    // Subscribe to match state change notifications
    let (notification_tx, mut notification_rx) =
        tokio::sync::mpsc::channel::<StateChangeNotification>(32);

    let match_handle = match state.match_manager.get_match(match_id).await {
        Some(h) => h,
        None => {
            error!("Match {match_id} not found");
            metrics::record_ws_disconnected();
            return;
        }
    };

    if match_handle
        .send(MatchMessage::Subscribe {
            player,
            sender: notification_tx,
        })
        .await
        .is_err()
    {
        error!("Failed to subscribe to match {match_id} notifications");
        metrics::record_ws_disconnected();
        return;
    }

    // Initial snapshot so a reconnecting client can render immediately
    if let Some(json) = fetch_state_json(&match_handle).await {
        let _ = response_tx.send(json).await;
    }

    // Spawn task to push match updates and command responses (event-driven)
    let send_state = state.clone();
    let send_task = tokio::spawn(async move {
        loop {
            tokio::select! {
                Some(notification) = notification_rx.recv() => {
                    let match_handle = match send_state.match_manager.get_match(match_id).await {
                        Some(h) => h,
                        None => {
                            error!("Match {match_id} not found");
                            break;
                        }
                    };

                    match notification {
                        StateChangeNotification::StateChanged => {
                            let Some(json) = fetch_state_json(&match_handle).await else {
                                break;
                            };
                            if sender.send(Message::Text(json.into())).await.is_err() {
                                break;
                            }
                        }
                        StateChangeNotification::GameOver => {
                            if let Ok(json) = serde_json::to_string(&ServerMessage::GameOver)
                                && sender.send(Message::Text(json.into())).await.is_err()
                            {
                                break;
                            }
                        }
                        StateChangeNotification::MatchClosed => {
                            if let Ok(json) = serde_json::to_string(&ServerMessage::MatchClosed) {
                                let _ = sender.send(Message::Text(json.into())).await;
                            }
                            break;
                        }
                    }
                }
                Some(response_json) = response_rx.recv() => {
                    if sender.send(Message::Text(response_json.into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Receive messages from client
    while let Some(msg) = receiver.next().await {
        match msg {
            Ok(Message::Text(text)) => {
                let response = match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => {
                        handle_client_message(client_msg, match_id, player, &state).await
                    }
                    Err(e) => {
                        warn!("Failed to parse client message: {e}");
                        ServerMessage::Error {
                            message: "Invalid message format".to_string(),
                        }
                    }
                };

                if let Ok(json) = serde_json::to_string(&response)
                    && response_tx.send(json).await.is_err()
                {
                    break;
                }
            }
            Ok(Message::Close(_)) => {
                info!("WebSocket closed: match={match_id}, player={player}");
                break;
            }
            Err(e) => {
                error!("WebSocket error: {e}");
                break;
            }
            _ => {}
        }
    }

    send_task.abort();

    // Unsubscribe from match notifications
    if let Some(match_handle) = state.match_manager.get_match(match_id).await {
        let _ = match_handle.send(MatchMessage::Unsubscribe { player }).await;
    }

    metrics::record_ws_disconnected();
    info!("WebSocket disconnected: match={match_id}, player={player}");
}

/// Fetch the current snapshot and serialize it as a `state` message.
async fn fetch_state_json(match_handle: &MatchHandle) -> Option<String> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    if match_handle
        .send(MatchMessage::GetState { response: tx })
        .await
        .is_err()
    {
        error!("Failed to send GetState message");
        return None;
    }

    match rx.await {
        Ok(snapshot) => match serde_json::to_string(&ServerMessage::State { state: snapshot }) {
            Ok(json) => Some(json),
            Err(e) => {
                error!("Failed to serialize snapshot: {e}");
                None
            }
        },
        Err(e) => {
            error!("Failed to receive snapshot: {e}");
            None
        }
    }
}

/// Process a client command message and return a response.
async fn handle_client_message(
    msg: ClientMessage,
    match_id: Uuid,
    player: usize,
    state: &AppState,
) -> ServerMessage {
    let match_handle = match state.match_manager.get_match(match_id).await {
        Some(handle) => handle,
        None => {
            return ServerMessage::Error {
                message: "Match not found".to_string(),
            };
        }
    };

    match msg {
        ClientMessage::Action { action } => {
            let action_name = action.to_string();
            let (tx, rx) = tokio::sync::oneshot::channel();

            if match_handle
                .send(MatchMessage::TakeAction {
                    player,
                    action,
                    response: tx,
                })
                .await
                .is_err()
            {
                return ServerMessage::Error {
                    message: "Failed to send action".to_string(),
                };
            }

            match rx.await {
                Ok(MatchResponse::Success) => {
                    metrics::record_action_processed();
                    logging::log_action(&match_id.to_string(), player, &action_name, "success");
                    ServerMessage::Success {
                        message: "Action processed".to_string(),
                    }
                }
                Ok(MatchResponse::Rejected(err)) => {
                    metrics::record_action_rejected();
                    logging::log_action(&match_id.to_string(), player, &action_name, "rejected");
                    ServerMessage::Rejected {
                        message: err.to_string(),
                    }
                }
                Ok(MatchResponse::Error(e)) => ServerMessage::Error { message: e },
                Err(_) => ServerMessage::Error {
                    message: "Match actor dropped the request".to_string(),
                },
            }
        }

        ClientMessage::DetermineActions {
            dragged,
            x,
            y,
            source,
        } => {
            // Resolve the contact under the release point first; the
            // plan is computed against the object that was hit, or open
            // table area when nothing is within the threshold.
            let (tx, rx) = tokio::sync::oneshot::channel();
            if match_handle
                .send(MatchMessage::ResolveContact { x, y, response: tx })
                .await
                .is_err()
            {
                return ServerMessage::Error {
                    message: "Failed to resolve contact".to_string(),
                };
            }
            let target_id = match rx.await {
                Ok(contact) => contact.map(|c| c.position.id),
                Err(_) => {
                    return ServerMessage::Error {
                        message: "Match actor dropped the request".to_string(),
                    };
                }
            };

            let (tx, rx) = tokio::sync::oneshot::channel();
            if match_handle
                .send(MatchMessage::DetermineActions {
                    player,
                    dragged,
                    target_id,
                    source,
                    response: tx,
                })
                .await
                .is_err()
            {
                return ServerMessage::Error {
                    message: "Failed to determine actions".to_string(),
                };
            }

            match rx.await {
                Ok(plan) => ServerMessage::ActionPlan { plan },
                Err(_) => ServerMessage::Error {
                    message: "Match actor dropped the request".to_string(),
                },
            }
        }

        ClientMessage::ReportPosition { position } => {
            if match_handle
                .send(MatchMessage::ReportPosition { position })
                .await
                .is_err()
            {
                return ServerMessage::Error {
                    message: "Failed to report position".to_string(),
                };
            }
            ServerMessage::Success {
                message: "Position reported".to_string(),
            }
        }

        ClientMessage::RemovePosition { id } => {
            if match_handle
                .send(MatchMessage::RemovePosition { id })
                .await
                .is_err()
            {
                return ServerMessage::Error {
                    message: "Failed to remove position".to_string(),
                };
            }
            ServerMessage::Success {
                message: "Position removed".to_string(),
            }
        }

        ClientMessage::ClearPositions => {
            if match_handle.send(MatchMessage::ClearPositions).await.is_err() {
                return ServerMessage::Error {
                    message: "Failed to clear positions".to_string(),
                };
            }
            ServerMessage::Success {
                message: "Positions cleared".to_string(),
            }
        }

        ClientMessage::GetState => {
            let (tx, rx) = tokio::sync::oneshot::channel();
            if match_handle
                .send(MatchMessage::GetState { response: tx })
                .await
                .is_err()
            {
                return ServerMessage::Error {
                    message: "Failed to fetch state".to_string(),
                };
            }
            match rx.await {
                Ok(snapshot) => ServerMessage::State { state: snapshot },
                Err(_) => ServerMessage::Error {
                    message: "Match actor dropped the request".to_string(),
                },
            }
        }
    }
}
