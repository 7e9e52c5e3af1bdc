//! Match actor message types.

use tokio::sync::{mpsc, oneshot};

use crate::contact::{Contact, ContactPosition};
use crate::game::actions::{Action, ActionPlan, DragSource};
use crate::game::engine::GameError;
use crate::game::entities::{Card, GameState, PlayerIndex};

/// Messages that can be sent to a [`MatchActor`](super::MatchActor).
#[derive(Debug)]
pub enum MatchMessage {
    /// Apply one action envelope for a player.
    TakeAction {
        player: PlayerIndex,
        action: Action,
        response: oneshot::Sender<MatchResponse>,
    },

    /// Full authoritative snapshot.
    GetState {
        response: oneshot::Sender<GameState>,
    },

    /// Resolve a drag-release point to the nearest reported contact.
    ResolveContact {
        x: f64,
        y: f64,
        response: oneshot::Sender<Option<Contact>>,
    },

    /// Compute the candidate actions for a drag-end event. `target_id`
    /// is the registry id of the contact under the release point, or
    /// `None` for open table area.
    DetermineActions {
        player: PlayerIndex,
        dragged: Card,
        target_id: Option<String>,
        source: DragSource,
        response: oneshot::Sender<ActionPlan>,
    },

    /// Layout collaborator reporting an object's screen bounds.
    ReportPosition { position: ContactPosition },

    /// Layout collaborator removing an unmounted object.
    RemovePosition { id: String },

    /// Drop every reported position (table teardown or reset).
    ClearPositions,

    /// Subscribe to state change notifications.
    Subscribe {
        player: PlayerIndex,
        sender: mpsc::Sender<StateChangeNotification>,
    },

    /// Unsubscribe from state change notifications.
    Unsubscribe { player: PlayerIndex },

    /// Close the match.
    Close {
        response: oneshot::Sender<MatchResponse>,
    },
}

/// Notification pushed to subscribers when the match moves.
#[derive(Clone, Debug)]
pub enum StateChangeNotification {
    /// An action was applied; the snapshot changed.
    StateChanged,
    /// The match finished and was scored.
    GameOver,
    /// The match actor is shutting down.
    MatchClosed,
}

/// Response from match operations.
#[derive(Clone, Debug)]
pub enum MatchResponse {
    /// Operation succeeded.
    Success,

    /// The rules engine rejected the action; state is unchanged and the
    /// client should snap the dragged card back.
    Rejected(GameError),

    /// Operation failed outside the rules engine.
    Error(String),
}

impl MatchResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, MatchResponse::Success)
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            MatchResponse::Success => None,
            MatchResponse::Rejected(err) => Some(err.to_string()),
            MatchResponse::Error(msg) => Some(msg.clone()),
        }
    }
}
