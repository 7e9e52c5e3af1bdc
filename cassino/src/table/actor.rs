//! Match actor implementation with async message handling.

use std::collections::HashMap;

use tokio::sync::mpsc;

use super::{
    MatchId,
    config::MatchConfig,
    messages::{MatchMessage, MatchResponse, StateChangeNotification},
};
use crate::{
    contact::{PositionRegistry, find_contact_at_point},
    game::{
        actions::{self, ActionPlan},
        engine::CasinoGame,
        entities::PlayerIndex,
    },
};

/// Match actor handle for sending messages.
#[derive(Clone, Debug)]
pub struct MatchHandle {
    sender: mpsc::Sender<MatchMessage>,
    match_id: MatchId,
}

impl MatchHandle {
    pub fn new(sender: mpsc::Sender<MatchMessage>, match_id: MatchId) -> Self {
        Self { sender, match_id }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    /// Send a message to the match.
    pub async fn send(&self, message: MatchMessage) -> Result<(), String> {
        self.sender
            .send(message)
            .await
            .map_err(|_| "Match is closed".to_string())
    }
}

/// Actor owning one match: the authoritative game, its position
/// registry, and the subscriber list. The inbox serializes every
/// mutation; no handler suspends mid-mutation.
pub struct MatchActor {
    id: MatchId,
    config: MatchConfig,
    game: CasinoGame,
    registry: PositionRegistry,
    inbox: mpsc::Receiver<MatchMessage>,
    subscribers: HashMap<PlayerIndex, mpsc::Sender<StateChangeNotification>>,
    is_closed: bool,
}

impl MatchActor {
    pub fn new(id: MatchId, config: MatchConfig) -> (Self, MatchHandle) {
        let (sender, inbox) = mpsc::channel(100);
        let game = CasinoGame::new(config.rules);
        let actor = Self {
            id,
            config,
            game,
            registry: PositionRegistry::new(),
            inbox,
            subscribers: HashMap::new(),
            is_closed: false,
        };
        let handle = MatchHandle::new(sender, id);
        (actor, handle)
    }

    /// Run the match actor event loop.
    pub async fn run(mut self) {
        log::info!("Match {} '{}' starting", self.id, self.config.name);

        while let Some(message) = self.inbox.recv().await {
            self.handle_message(message);
            if self.is_closed {
                break;
            }
        }

        self.notify(StateChangeNotification::MatchClosed);
        log::info!("Match {} '{}' closed", self.id, self.config.name);
    }

    fn handle_message(&mut self, message: MatchMessage) {
        match message {
            MatchMessage::TakeAction {
                player,
                action,
                response,
            } => {
                let result = self.handle_action(player, action);
                let _ = response.send(result);
            }

            MatchMessage::GetState { response } => {
                let _ = response.send(self.game.state().clone());
            }

            MatchMessage::ResolveContact { x, y, response } => {
                let contact =
                    find_contact_at_point(&self.registry, x, y, self.config.contact_threshold);
                let _ = response.send(contact);
            }

            MatchMessage::DetermineActions {
                player,
                dragged,
                target_id,
                source,
                response,
            } => {
                let target = target_id.and_then(|id| self.registry.get(&id));
                let plan: ActionPlan = actions::determine_actions(
                    dragged,
                    target.as_ref(),
                    self.game.state(),
                    player,
                    source,
                    self.game.rules(),
                );
                let _ = response.send(plan);
            }

            MatchMessage::ReportPosition { position } => {
                self.registry.report(position);
            }

            MatchMessage::RemovePosition { id } => {
                self.registry.remove(&id);
            }

            MatchMessage::ClearPositions => {
                self.registry.clear();
            }

            MatchMessage::Subscribe { player, sender } => {
                self.subscribers.insert(player, sender);
                log::debug!("Player {} subscribed to match {}", player, self.id);
            }

            MatchMessage::Unsubscribe { player } => {
                self.subscribers.remove(&player);
                log::debug!("Player {} unsubscribed from match {}", player, self.id);
            }

            MatchMessage::Close { response } => {
                self.is_closed = true;
                let _ = response.send(MatchResponse::Success);
            }
        }
    }

    fn handle_action(
        &mut self,
        player: PlayerIndex,
        action: crate::game::actions::Action,
    ) -> MatchResponse {
        log::debug!("Match {}: player {player} {action}", self.id);
        match self.game.apply(player, action) {
            Ok(()) => {
                for event in self.game.drain_events() {
                    log::info!("Match {}: {event}", self.id);
                }
                self.notify(StateChangeNotification::StateChanged);
                if self.game.state().game_over {
                    self.notify(StateChangeNotification::GameOver);
                }
                MatchResponse::Success
            }
            Err(err) => {
                log::debug!("Match {}: rejected action from player {player}: {err}", self.id);
                MatchResponse::Rejected(err)
            }
        }
    }

    /// Push a notification to all subscribers, dropping the disconnected.
    fn notify(&mut self, notification: StateChangeNotification) {
        self.subscribers.retain(|player, sender| {
            match sender.try_send(notification.clone()) {
                Ok(_) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    log::warn!("Subscriber {} channel full, dropping notification", player);
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    log::debug!("Subscriber {} disconnected, removing", player);
                    false
                }
            }
        });
    }
}
