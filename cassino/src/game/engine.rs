//! Authoritative per-match game store.
//!
//! [`CasinoGame`] is the sole writer of [`GameState`]. Every inbound
//! action envelope is validated against the current state, applied
//! synchronously, and followed by a whole-state duplicate-card check.
//! Precondition failures leave the state untouched; invariant violations
//! are logged and counted but never roll the match back or crash it.

use log::error;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

use super::actions::{Action, CaptureSource, CaptureTarget, DragSource};
use super::builds;
use super::constants::{
    ACE_POINTS, BIG_CASSINO_POINTS, BUILD_CEILING, HAND_SIZE, INITIAL_TABLE_CARDS,
    LITTLE_CASSINO_POINTS, MAX_BUILD_CARDS, MOST_CARDS_POINTS, MOST_SPADES_POINTS, NUM_PLAYERS,
};
use super::entities::{
    Build, BuildId, Card, CardOrigin, CardValue, Deck, GameEvent, GameState, LooseCard,
    PlayerIndex, StackId, Suit, TableItem,
};
use super::stacks;

/// Errors that can occur while applying an action. All of these are
/// per-action scoped precondition failures: the state is unchanged and
/// the client is expected to snap the dragged card back.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("game is over")]
    GameOver,
    #[error("not your turn")]
    OutOfTurn,
    #[error("card not found in claimed source")]
    CardNotFound,
    #[error("loose card not found on table")]
    LooseCardNotFound,
    #[error("build does not exist")]
    BuildNotFound,
    #[error("stack does not exist")]
    StackNotFound,
    #[error("face cards can't join combinations")]
    FaceCardInCombination,
    #[error("values must match exactly")]
    ValueMismatch,
    #[error("build can't exceed {ceiling}")]
    BuildCeilingExceeded { ceiling: CardValue },
    #[error("build can't be extended")]
    BuildNotExtendable,
    #[error("can't extend your own build")]
    OwnBuildExtension,
    #[error("that build belongs to your opponent")]
    NotYourBuild,
    #[error("stack can't augment builds")]
    CannotAugment,
    #[error("nothing to capture")]
    EmptyCapture,
    #[error("no trail to cancel")]
    NoPendingTrail,
    #[error("duplicate card in action")]
    DuplicateCard,
    #[error("invalid action")]
    InvalidAction,
}

/// Configurable rule parameters for a match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRules {
    /// Maximum value a build may reach (creation and extension).
    pub build_ceiling: CardValue,
    /// Value at which a build counts as complete. Variants differ here,
    /// so it is a parameter rather than a constant.
    pub completion_target: CardValue,
    /// Card count past which a build can no longer be extended.
    pub max_build_cards: usize,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            build_ceiling: BUILD_CEILING,
            completion_target: BUILD_CEILING,
            max_build_cards: MAX_BUILD_CARDS,
        }
    }
}

/// A casino match: authoritative state, deck, rules, and the event queue
/// drained by the match actor.
#[derive(Debug)]
pub struct CasinoGame {
    state: GameState,
    deck: Deck,
    rules: MatchRules,
    last_capturer: Option<PlayerIndex>,
    /// Pending trail awaiting the client's modal confirmation; cleared by
    /// any other successful action.
    last_trail: Option<(PlayerIndex, Card)>,
    events: VecDeque<GameEvent>,
    invariant_violations: u64,
}

impl CasinoGame {
    /// Start a fresh match: shuffled deck, four cards per hand, four
    /// loose cards on the table, player 0 to act.
    pub fn new(rules: MatchRules) -> Self {
        let mut game = Self {
            state: GameState::default(),
            deck: Deck::default(),
            rules,
            last_capturer: None,
            last_trail: None,
            events: VecDeque::new(),
            invariant_violations: 0,
        };
        game.deck.shuffle();
        for _ in 0..HAND_SIZE {
            for hand in game.state.player_hands.iter_mut() {
                if let Some(card) = game.deck.deal_card() {
                    hand.push(card);
                }
            }
        }
        for _ in 0..INITIAL_TABLE_CARDS {
            if let Some(card) = game.deck.deal_card() {
                game.state
                    .table_cards
                    .push(TableItem::LooseCard(LooseCard { card }));
            }
        }
        game.state.round = 1;
        game
    }

    /// Rehydrate a game from a known state with an exhausted deck. Used
    /// by tests and by snapshot restores; no cards remain to deal.
    pub fn from_state(state: GameState, rules: MatchRules) -> Self {
        let mut deck = Deck::default();
        while deck.deal_card().is_some() {}
        Self {
            state,
            deck,
            rules,
            last_capturer: None,
            last_trail: None,
            events: VecDeque::new(),
            invariant_violations: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    pub fn invariant_violations(&self) -> u64 {
        self.invariant_violations
    }

    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Apply one action envelope for `player`. Runs the full validation
    /// pipeline, mutates on success, then re-checks the no-duplicate
    /// invariant over the whole state.
    pub fn apply(&mut self, player: PlayerIndex, action: Action) -> Result<(), GameError> {
        if self.state.game_over {
            return Err(GameError::GameOver);
        }
        if player >= NUM_PLAYERS {
            return Err(GameError::InvalidAction);
        }

        let is_trail_op = matches!(action, Action::Trail { .. } | Action::CancelTrail { .. });
        let result = match action {
            Action::Trail { card } => self.handle_trail(player, card),
            Action::CancelTrail { card } => self.handle_cancel_trail(player, card),
            Action::TableToTableDrop { dragged, target } => {
                self.handle_table_to_table(player, dragged, target)
            }
            Action::HandToTableDrop { card, target } => {
                self.handle_hand_to_table(player, card, target)
            }
            Action::AugmentStack {
                stack_id,
                card,
                source,
            } => self.handle_augment_stack(player, stack_id, card, source),
            Action::Build { stack_id } => self.handle_build(player, stack_id),
            Action::Capture { source, captured } => self.handle_capture(player, source, captured),
            Action::ExtendBuild {
                build_id,
                card,
                source,
            } => self.handle_extend_build(player, build_id, card, source),
            Action::ReinforceBuild {
                build_id,
                from_build_id,
                card,
            } => self.handle_reinforce_build(player, build_id, from_build_id, card),
            Action::AddToOwnBuild {
                build_id,
                card,
                source,
            } => self.handle_add_to_own_build(player, build_id, card, source),
            Action::ValidateBuildAugmentation { build_id, stack_id } => {
                self.handle_build_augmentation(player, build_id, stack_id)
            }
            Action::CancelStack { stack_id } => self.handle_cancel_stack(player, stack_id),
        };

        if result.is_ok() {
            if !is_trail_op {
                self.last_trail = None;
            }
            self.maybe_advance_round();
            self.check_duplicates();
        }
        result
    }

    fn require_turn(&self, player: PlayerIndex) -> Result<(), GameError> {
        if self.state.current_player != player {
            return Err(GameError::OutOfTurn);
        }
        Ok(())
    }

    fn end_turn(&mut self, player: PlayerIndex) {
        self.events.push_back(GameEvent::TurnEnded(player));
        self.state.current_player = (player + 1) % NUM_PLAYERS;
    }

    fn hand_position(&self, player: PlayerIndex, card: Card) -> Result<usize, GameError> {
        self.state.player_hands[player]
            .iter()
            .position(|held| *held == card)
            .ok_or(GameError::CardNotFound)
    }

    fn loose_position(&self, card: Card) -> Result<usize, GameError> {
        self.state
            .table_cards
            .iter()
            .position(|item| item.as_loose().is_some_and(|loose| loose.card == card))
            .ok_or(GameError::LooseCardNotFound)
    }

    fn build_position(&self, build_id: BuildId) -> Result<usize, GameError> {
        self.state
            .table_cards
            .iter()
            .position(|item| item.as_build().is_some_and(|b| b.build_id == build_id))
            .ok_or(GameError::BuildNotFound)
    }

    fn stack_position(&self, stack_id: StackId) -> Result<usize, GameError> {
        self.state
            .table_cards
            .iter()
            .position(|item| item.as_stack().is_some_and(|s| s.stack_id == stack_id))
            .ok_or(GameError::StackNotFound)
    }

    /// Take a card out of the container the client claims it came from,
    /// verifying the claim first.
    fn consume_card(
        &mut self,
        player: PlayerIndex,
        card: Card,
        source: DragSource,
    ) -> Result<(), GameError> {
        match source {
            DragSource::Hand => {
                let idx = self.hand_position(player, card)?;
                self.state.player_hands[player].remove(idx);
            }
            DragSource::Table => {
                let idx = self.loose_position(card)?;
                self.state.table_cards.remove(idx);
            }
        }
        Ok(())
    }

    fn handle_trail(&mut self, player: PlayerIndex, card: Card) -> Result<(), GameError> {
        self.require_turn(player)?;
        let idx = self.hand_position(player, card)?;
        self.state.player_hands[player].remove(idx);
        self.state
            .table_cards
            .push(TableItem::LooseCard(LooseCard { card }));
        self.last_trail = Some((player, card));
        self.events.push_back(GameEvent::Trailed(player, card));
        self.end_turn(player);
        Ok(())
    }

    fn handle_cancel_trail(&mut self, player: PlayerIndex, card: Card) -> Result<(), GameError> {
        if self.last_trail != Some((player, card)) {
            return Err(GameError::NoPendingTrail);
        }
        let idx = self.loose_position(card)?;
        self.state.table_cards.remove(idx);
        self.state.player_hands[player].push(card);
        self.last_trail = None;
        // The trail flipped the turn; hand it back.
        self.state.current_player = player;
        self.events
            .push_back(GameEvent::TrailCancelled(player, card));
        Ok(())
    }

    fn handle_table_to_table(
        &mut self,
        player: PlayerIndex,
        dragged: Card,
        target: Card,
    ) -> Result<(), GameError> {
        self.require_turn(player)?;
        if dragged == target {
            return Err(GameError::DuplicateCard);
        }
        let dragged_idx = self.loose_position(dragged)?;
        let target_idx = self.loose_position(target)?;
        let stack = stacks::create_stack(
            dragged,
            CardOrigin::Table,
            target,
            player,
            self.state.player_has_build(player),
        )?;
        let mut remove = [dragged_idx, target_idx];
        remove.sort_unstable_by(|a, b| b.cmp(a));
        for idx in remove {
            self.state.table_cards.remove(idx);
        }
        self.events
            .push_back(GameEvent::StackCreated(player, stack.stack_id));
        self.state
            .table_cards
            .push(TableItem::TemporaryStack(stack));
        Ok(())
    }

    fn handle_hand_to_table(
        &mut self,
        player: PlayerIndex,
        card: Card,
        target: Card,
    ) -> Result<(), GameError> {
        self.require_turn(player)?;
        let hand_idx = self.hand_position(player, card)?;
        let target_idx = self.loose_position(target)?;
        let stack = stacks::create_stack(
            card,
            CardOrigin::Hand,
            target,
            player,
            self.state.player_has_build(player),
        )?;
        self.state.player_hands[player].remove(hand_idx);
        self.state.table_cards.remove(target_idx);
        self.events
            .push_back(GameEvent::StackCreated(player, stack.stack_id));
        self.state
            .table_cards
            .push(TableItem::TemporaryStack(stack));
        Ok(())
    }

    fn handle_augment_stack(
        &mut self,
        player: PlayerIndex,
        stack_id: StackId,
        card: Card,
        source: DragSource,
    ) -> Result<(), GameError> {
        self.require_turn(player)?;
        let idx = self.stack_position(stack_id)?;
        let Some(stack) = self.state.table_cards[idx].as_stack() else {
            return Err(GameError::StackNotFound);
        };
        if stack.owner != player {
            return Err(GameError::StackNotFound);
        }
        // Validate everything before touching either container.
        card.build_value().ok_or(GameError::FaceCardInCombination)?;
        match source {
            DragSource::Hand => {
                self.hand_position(player, card)?;
            }
            DragSource::Table => {
                self.loose_position(card)?;
            }
        }
        self.consume_card(player, card, source)?;
        let idx = self.stack_position(stack_id)?;
        if let TableItem::TemporaryStack(stack) = &mut self.state.table_cards[idx] {
            let origin = match source {
                DragSource::Hand => CardOrigin::Hand,
                DragSource::Table => CardOrigin::Table,
            };
            stacks::augment_stack(stack, card, origin)?;
        }
        self.events
            .push_back(GameEvent::StackAugmented(player, stack_id, card));
        Ok(())
    }

    fn handle_build(&mut self, player: PlayerIndex, stack_id: StackId) -> Result<(), GameError> {
        self.require_turn(player)?;
        let idx = self.stack_position(stack_id)?;
        let Some(stack) = self.state.table_cards[idx].as_stack() else {
            return Err(GameError::StackNotFound);
        };
        if stack.owner != player {
            return Err(GameError::StackNotFound);
        }
        let build = stacks::stack_to_build(stack, &self.rules)?;
        self.state.table_cards.remove(idx);
        self.events
            .push_back(GameEvent::BuildCreated(player, build.build_id, build.value));
        if build.is_complete {
            self.events
                .push_back(GameEvent::BuildCompleted(build.build_id, build.value));
        }
        self.state.table_cards.push(TableItem::Build(build));
        self.end_turn(player);
        Ok(())
    }

    fn handle_capture(
        &mut self,
        player: PlayerIndex,
        source: CaptureSource,
        captured: Vec<CaptureTarget>,
    ) -> Result<(), GameError> {
        self.require_turn(player)?;
        if captured.is_empty() {
            return Err(GameError::EmptyCapture);
        }

        // Resolve the capturing value and verify the source exists.
        let capture_value = match source {
            CaptureSource::Hand { card } => {
                self.hand_position(player, card)?;
                // Face cards capture by rank pairing only.
                card.build_value()
            }
            CaptureSource::Stack { stack_id } => {
                let idx = self.stack_position(stack_id)?;
                let stack = self.state.table_cards[idx]
                    .as_stack()
                    .ok_or(GameError::StackNotFound)?;
                if stack.owner != player {
                    return Err(GameError::StackNotFound);
                }
                Some(stack.value)
            }
        };

        // Resolve every target before removing anything.
        let mut target_indices = Vec::with_capacity(captured.len());
        for target in &captured {
            let idx = match target {
                CaptureTarget::Loose { card } => {
                    let idx = self.loose_position(*card)?;
                    match capture_value {
                        Some(value) if card.build_value() == Some(value) => idx,
                        Some(_) => return Err(GameError::ValueMismatch),
                        None => {
                            // Pair capture: ranks must match.
                            let CaptureSource::Hand { card: held } = source else {
                                return Err(GameError::ValueMismatch);
                            };
                            if held.0 != card.0 {
                                return Err(GameError::ValueMismatch);
                            }
                            idx
                        }
                    }
                }
                CaptureTarget::Build { build_id } => {
                    let idx = self.build_position(*build_id)?;
                    let build = self.state.table_cards[idx]
                        .as_build()
                        .ok_or(GameError::BuildNotFound)?;
                    if capture_value != Some(build.value) {
                        return Err(GameError::ValueMismatch);
                    }
                    idx
                }
            };
            if target_indices.contains(&idx) {
                return Err(GameError::DuplicateCard);
            }
            target_indices.push(idx);
        }

        // Commit: consume the source, then the targets (descending index).
        let mut taken: Vec<Card> = Vec::new();
        match source {
            CaptureSource::Hand { card } => {
                let idx = self.hand_position(player, card)?;
                taken.push(self.state.player_hands[player].remove(idx));
            }
            CaptureSource::Stack { stack_id } => {
                let idx = self.stack_position(stack_id)?;
                let item = self.state.table_cards.remove(idx);
                taken.extend_from_slice(item.cards());
                // The stack is gone; its index may shift targets.
                for target in target_indices.iter_mut() {
                    if *target > idx {
                        *target -= 1;
                    }
                }
            }
        }
        target_indices.sort_unstable_by(|a, b| b.cmp(a));
        for idx in target_indices {
            let item = self.state.table_cards.remove(idx);
            taken.extend_from_slice(item.cards());
        }

        let count = taken.len();
        self.state.player_captures[player].extend(taken);
        self.last_capturer = Some(player);
        self.events.push_back(GameEvent::Captured(player, count));
        self.end_turn(player);
        Ok(())
    }

    fn handle_extend_build(
        &mut self,
        player: PlayerIndex,
        build_id: BuildId,
        card: Card,
        source: DragSource,
    ) -> Result<(), GameError> {
        self.require_turn(player)?;
        let idx = self.build_position(build_id)?;
        let build = self.state.table_cards[idx]
            .as_build()
            .ok_or(GameError::BuildNotFound)?;
        if build.owner == player {
            return Err(GameError::OwnBuildExtension);
        }
        if !builds::can_build_be_extended(build, player) {
            return Err(GameError::BuildNotExtendable);
        }
        builds::validate_build_extension(build, card, &self.rules)?;
        match source {
            DragSource::Hand => {
                self.hand_position(player, card)?;
            }
            DragSource::Table => {
                self.loose_position(card)?;
            }
        }
        self.consume_card(player, card, source)?;
        let idx = self.build_position(build_id)?;
        if let TableItem::Build(build) = &mut self.state.table_cards[idx] {
            let new_value = builds::apply_extension(build, card, player, &self.rules)?;
            let complete = build.is_complete;
            self.events
                .push_back(GameEvent::BuildExtended(player, build_id, new_value));
            if complete {
                self.events
                    .push_back(GameEvent::BuildCompleted(build_id, new_value));
            }
        }
        self.end_turn(player);
        Ok(())
    }

    fn handle_reinforce_build(
        &mut self,
        player: PlayerIndex,
        build_id: BuildId,
        from_build_id: BuildId,
        card: Card,
    ) -> Result<(), GameError> {
        self.require_turn(player)?;
        let target_idx = self.build_position(build_id)?;
        let from_idx = self.build_position(from_build_id)?;
        if target_idx == from_idx {
            return Err(GameError::InvalidAction);
        }
        let target = self.state.table_cards[target_idx]
            .as_build()
            .ok_or(GameError::BuildNotFound)?;
        if target.owner != player {
            return Err(GameError::NotYourBuild);
        }
        // The merge must consume exactly the staged extension card.
        if target.cards.contains(&card) {
            return Err(GameError::DuplicateCard);
        }
        let from = self.state.table_cards[from_idx]
            .as_build()
            .ok_or(GameError::BuildNotFound)?;
        let card_value = card
            .build_value()
            .ok_or(GameError::FaceCardInCombination)?;
        if from.value + card_value != target.value {
            return Err(GameError::ValueMismatch);
        }
        let hand_idx = self.hand_position(player, card)?;
        self.state.player_hands[player].remove(hand_idx);
        let from_idx = self.build_position(from_build_id)?;
        let merged = self.state.table_cards.remove(from_idx);
        let mut merged_cards = merged.cards().to_vec();
        merged_cards.push(card);
        let target_idx = self.build_position(build_id)?;
        if let TableItem::Build(target) = &mut self.state.table_cards[target_idx] {
            builds::apply_augmentation(target, &merged_cards);
        }
        self.events
            .push_back(GameEvent::BuildReinforced(player, build_id));
        self.end_turn(player);
        Ok(())
    }

    fn handle_add_to_own_build(
        &mut self,
        player: PlayerIndex,
        build_id: BuildId,
        card: Card,
        source: DragSource,
    ) -> Result<(), GameError> {
        // Augmenting your own build is the one action allowed off-turn.
        let idx = self.build_position(build_id)?;
        let build = self.state.table_cards[idx]
            .as_build()
            .ok_or(GameError::BuildNotFound)?;
        if build.owner != player {
            return Err(GameError::NotYourBuild);
        }
        card.build_value().ok_or(GameError::FaceCardInCombination)?;

        // Prospective recompute before consuming anything.
        let mut prospective = build.cards.clone();
        prospective.push(card);
        let sum = builds::combination_value(&prospective)?;
        let analysis = builds::analyze_build_for_extension(&prospective, &self.rules);
        let new_value = analysis.base_value.unwrap_or(sum);
        if new_value > self.rules.build_ceiling {
            return Err(GameError::BuildCeilingExceeded {
                ceiling: self.rules.build_ceiling,
            });
        }
        match source {
            DragSource::Hand => {
                self.hand_position(player, card)?;
            }
            DragSource::Table => {
                self.loose_position(card)?;
            }
        }

        self.consume_card(player, card, source)?;
        let idx = self.build_position(build_id)?;
        if let TableItem::Build(build) = &mut self.state.table_cards[idx] {
            build.cards.push(card);
            build.value = new_value;
            build.has_base = analysis.has_base;
            build.is_single_combination = analysis.is_single_combination;
            build.is_extendable = analysis.is_extendable;
            build.is_complete = new_value == self.rules.completion_target;
        }
        self.events
            .push_back(GameEvent::BuildAugmented(player, build_id));
        if self.state.current_player == player {
            self.end_turn(player);
        }
        Ok(())
    }

    fn handle_build_augmentation(
        &mut self,
        player: PlayerIndex,
        build_id: BuildId,
        stack_id: StackId,
    ) -> Result<(), GameError> {
        let build_idx = self.build_position(build_id)?;
        let build = self.state.table_cards[build_idx]
            .as_build()
            .ok_or(GameError::BuildNotFound)?;
        if build.owner != player {
            return Err(GameError::NotYourBuild);
        }
        let build_value = build.value;
        let stack_idx = self.stack_position(stack_id)?;
        let stack = self.state.table_cards[stack_idx]
            .as_stack()
            .ok_or(GameError::StackNotFound)?;
        if stack.owner != player {
            return Err(GameError::StackNotFound);
        }
        if !stack.can_augment_builds {
            return Err(GameError::CannotAugment);
        }
        // Re-run the value check right before mutating; the client's view
        // may be stale.
        if stack.value != build_value {
            return Err(GameError::ValueMismatch);
        }

        let staged = self.state.table_cards.remove(stack_idx);
        let staged_cards = staged.cards().to_vec();
        let build_idx = self.build_position(build_id)?;
        if let TableItem::Build(build) = &mut self.state.table_cards[build_idx] {
            builds::apply_augmentation(build, &staged_cards);
        }
        self.events
            .push_back(GameEvent::BuildAugmented(player, build_id));
        if self.state.current_player == player {
            self.end_turn(player);
        }
        Ok(())
    }

    fn handle_cancel_stack(
        &mut self,
        player: PlayerIndex,
        stack_id: StackId,
    ) -> Result<(), GameError> {
        // Rejects an already-destroyed stack id, so a double cancel fails
        // cleanly instead of unwinding twice.
        let idx = self.stack_position(stack_id)?;
        let Some(stack) = self.state.table_cards[idx].as_stack() else {
            return Err(GameError::StackNotFound);
        };
        if stack.owner != player {
            return Err(GameError::StackNotFound);
        }
        let TableItem::TemporaryStack(stack) = self.state.table_cards.remove(idx) else {
            return Err(GameError::StackNotFound);
        };
        for (card, origin) in stack.cards.iter().zip(stack.origins.iter()) {
            match origin {
                CardOrigin::Hand => self.state.player_hands[player].push(*card),
                CardOrigin::Table => self
                    .state
                    .table_cards
                    .push(TableItem::LooseCard(LooseCard { card: *card })),
            }
        }
        self.events
            .push_back(GameEvent::StackCancelled(player, stack_id));
        Ok(())
    }

    /// Deal the next round once both hands empty out, or finish the game
    /// when the deck is spent.
    fn maybe_advance_round(&mut self) {
        if self.state.game_over {
            return;
        }
        if self.state.player_hands.iter().any(|hand| !hand.is_empty()) {
            return;
        }
        if self.deck.remaining() >= NUM_PLAYERS * HAND_SIZE {
            for _ in 0..HAND_SIZE {
                for hand in self.state.player_hands.iter_mut() {
                    if let Some(card) = self.deck.deal_card() {
                        hand.push(card);
                    }
                }
            }
            self.state.round += 1;
            self.events
                .push_back(GameEvent::RoundDealt(self.state.round));
        } else {
            self.finish_game();
        }
    }

    /// Remaining table cards go to the last capturing player, then the
    /// match is scored.
    fn finish_game(&mut self) {
        if let Some(player) = self.last_capturer {
            let swept: Vec<Card> = self
                .state
                .table_cards
                .drain(..)
                .flat_map(|item| item.cards().to_vec())
                .collect();
            if !swept.is_empty() {
                self.events
                    .push_back(GameEvent::TableSwept(player, swept.len()));
                self.state.player_captures[player].extend(swept);
            }
        }

        let scores: Vec<u32> = (0..NUM_PLAYERS).map(|p| self.score_player(p)).collect();
        let winner = match scores[0].cmp(&scores[1]) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        };
        self.state.game_over = true;
        self.state.winner = winner;
        self.state.scores = Some(scores);
        self.events.push_back(GameEvent::GameOver(winner));
    }

    fn score_player(&self, player: PlayerIndex) -> u32 {
        let mine = &self.state.player_captures[player];
        let theirs = &self.state.player_captures[(player + 1) % NUM_PLAYERS];
        let mut score = 0;
        if mine.len() > theirs.len() {
            score += MOST_CARDS_POINTS;
        }
        let my_spades = mine.iter().filter(|c| c.1 == Suit::Spade).count();
        let their_spades = theirs.iter().filter(|c| c.1 == Suit::Spade).count();
        if my_spades > their_spades {
            score += MOST_SPADES_POINTS;
        }
        if mine.contains(&Card(10, Suit::Diamond)) {
            score += BIG_CASSINO_POINTS;
        }
        if mine.contains(&Card(2, Suit::Spade)) {
            score += LITTLE_CASSINO_POINTS;
        }
        score += mine.iter().filter(|c| c.0 == 1).count() as u32 * ACE_POINTS;
        score
    }

    /// Whole-state no-duplicate check, run after every mutation. A
    /// violation is logged and counted but the match continues; rolling
    /// back mid-match would be worse than playing on.
    fn check_duplicates(&mut self) {
        let mut seen: HashSet<Card> = HashSet::new();
        let mut duplicates: Vec<Card> = Vec::new();
        let hands = self.state.player_hands.iter().flatten();
        let captures = self.state.player_captures.iter().flatten();
        let table = self
            .state
            .table_cards
            .iter()
            .flat_map(|item| item.cards().iter());
        for card in hands.chain(captures).chain(table) {
            if !seen.insert(*card) {
                duplicates.push(*card);
            }
        }
        for card in duplicates {
            error!("duplicate card {card} detected after mutation; continuing match");
            self.invariant_violations += 1;
            self.events.push_back(GameEvent::InvariantViolation(card));
        }
    }
}

/// A build owned by `owner` exists with exactly this value.
pub fn find_build_with_value(
    state: &GameState,
    owner: PlayerIndex,
    value: CardValue,
) -> Option<&Build> {
    state.builds().find(|b| b.owner == owner && b.value == value)
}
