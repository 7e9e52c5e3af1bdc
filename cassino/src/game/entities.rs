use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::constants;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    Club,
    Spade,
    Diamond,
    Heart,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Spade, Self::Diamond, Self::Heart];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Spade => "♠",
            Self::Diamond => "♦",
            Self::Heart => "♥",
        };
        write!(f, "{repr}")
    }
}

/// Card rank as dealt (ace=1u8 ... king=13u8).
pub type Rank = u8;

/// Numeric value a card contributes to build and capture arithmetic.
pub type CardValue = u8;

/// A card is a tuple of a uInt8 rank (ace=1u8 ... king=13u8) and a suit.
/// Equality is by (rank, suit); at most one instance of each pair may
/// exist across hands, table and capture piles.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Card(pub Rank, pub Suit);

impl Card {
    /// Value used for build sums and capture matching. Face cards carry
    /// no value and are excluded from combination arithmetic; they can
    /// only trail or pair-capture an equal-ranked loose card.
    pub fn build_value(&self) -> Option<CardValue> {
        match self.0 {
            v @ 1..=10 => Some(v),
            _ => None,
        }
    }

    pub fn is_face(&self) -> bool {
        self.0 > 10
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let rank = match self.0 {
            1 => "A",
            11 => "J",
            12 => "Q",
            13 => "K",
            v => &v.to_string(),
        };
        let repr = format!("{rank}/{}", self.1);
        write!(f, "{repr:>4}")
    }
}

#[derive(Debug)]
pub struct Deck {
    cards: [Card; 52],
    pub deck_idx: usize,
}

impl Deck {
    pub fn deal_card(&mut self) -> Option<Card> {
        let card = self.cards.get(self.deck_idx).copied();
        if card.is_some() {
            self.deck_idx += 1;
        }
        card
    }

    pub fn remaining(&self) -> usize {
        52 - self.deck_idx
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
        self.deck_idx = 0;
    }
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards = [Card(1, Suit::Club); 52];
        for (i, rank) in (1u8..=13u8).enumerate() {
            for (j, suit) in Suit::ALL.into_iter().enumerate() {
                cards[4 * i + j] = Card(rank, suit);
            }
        }
        Self { cards, deck_idx: 0 }
    }
}

/// Seat index of the acting player (0 or 1).
pub type PlayerIndex = usize;

pub type BuildId = Uuid;
pub type StackId = Uuid;

/// A single card sitting unattached on the table.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LooseCard {
    pub card: Card,
}

/// A group of cards whose values combine to a capture target.
///
/// `value` is the sum of the cards, or, for base-supported builds, the
/// base card's value (the sum the supports must equal). Ownership moves
/// to an opponent who legally extends the build.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    pub build_id: BuildId,
    pub cards: Vec<Card>,
    pub value: CardValue,
    pub owner: PlayerIndex,
    pub is_extendable: bool,
    pub has_base: bool,
    pub is_single_combination: bool,
    pub is_complete: bool,
}

/// Where a staged card came from, so cancel can send it back.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardOrigin {
    Hand,
    Table,
}

/// A staging stack holding cards a player has combined but not yet
/// committed to a capture or a build.
///
/// `origins` runs parallel to `cards` and records each card's source
/// container for the cancel/unwind path.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryStack {
    pub stack_id: StackId,
    pub cards: Vec<Card>,
    pub origins: Vec<CardOrigin>,
    pub owner: PlayerIndex,
    pub value: CardValue,
    pub can_augment_builds: bool,
}

/// Everything that can occupy a spot on the table.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TableItem {
    LooseCard(LooseCard),
    Build(Build),
    TemporaryStack(TemporaryStack),
}

impl TableItem {
    pub fn as_loose(&self) -> Option<&LooseCard> {
        match self {
            Self::LooseCard(loose) => Some(loose),
            _ => None,
        }
    }

    pub fn as_build(&self) -> Option<&Build> {
        match self {
            Self::Build(build) => Some(build),
            _ => None,
        }
    }

    pub fn as_stack(&self) -> Option<&TemporaryStack> {
        match self {
            Self::TemporaryStack(stack) => Some(stack),
            _ => None,
        }
    }

    /// Every card nested in this item, for invariant checks and sweeps.
    pub fn cards(&self) -> &[Card] {
        match self {
            Self::LooseCard(loose) => std::slice::from_ref(&loose.card),
            Self::Build(build) => &build.cards,
            Self::TemporaryStack(stack) => &stack.cards,
        }
    }
}

/// The authoritative state of a single match. Owned exclusively by
/// [`CasinoGame`](super::engine::CasinoGame); all mutation happens
/// through action handlers.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub table_cards: Vec<TableItem>,
    pub player_hands: Vec<Vec<Card>>,
    pub player_captures: Vec<Vec<Card>>,
    pub current_player: PlayerIndex,
    pub round: u32,
    pub game_over: bool,
    pub winner: Option<PlayerIndex>,
    pub scores: Option<Vec<u32>>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            table_cards: Vec::new(),
            player_hands: vec![Vec::with_capacity(constants::HAND_SIZE); constants::NUM_PLAYERS],
            player_captures: vec![Vec::new(); constants::NUM_PLAYERS],
            current_player: 0,
            round: 0,
            game_over: false,
            winner: None,
            scores: None,
        }
    }
}

impl GameState {
    pub fn loose_cards(&self) -> impl Iterator<Item = &LooseCard> {
        self.table_cards.iter().filter_map(TableItem::as_loose)
    }

    pub fn builds(&self) -> impl Iterator<Item = &Build> {
        self.table_cards.iter().filter_map(TableItem::as_build)
    }

    pub fn stacks(&self) -> impl Iterator<Item = &TemporaryStack> {
        self.table_cards.iter().filter_map(TableItem::as_stack)
    }

    pub fn find_build(&self, build_id: BuildId) -> Option<&Build> {
        self.builds().find(|b| b.build_id == build_id)
    }

    pub fn find_stack(&self, stack_id: StackId) -> Option<&TemporaryStack> {
        self.stacks().find(|s| s.stack_id == stack_id)
    }

    pub fn player_has_build(&self, player: PlayerIndex) -> bool {
        self.builds().any(|b| b.owner == player)
    }
}

/// Events that occur during gameplay, drained by the match actor for
/// logging and broadcast context.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    Trailed(PlayerIndex, Card),
    TrailCancelled(PlayerIndex, Card),
    StackCreated(PlayerIndex, StackId),
    StackAugmented(PlayerIndex, StackId, Card),
    StackCancelled(PlayerIndex, StackId),
    BuildCreated(PlayerIndex, BuildId, CardValue),
    BuildExtended(PlayerIndex, BuildId, CardValue),
    BuildReinforced(PlayerIndex, BuildId),
    BuildAugmented(PlayerIndex, BuildId),
    BuildCompleted(BuildId, CardValue),
    Captured(PlayerIndex, usize),
    TurnEnded(PlayerIndex),
    RoundDealt(u32),
    TableSwept(PlayerIndex, usize),
    GameOver(Option<PlayerIndex>),
    InvariantViolation(Card),
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::Trailed(player, card) => format!("player {player} trails {card}"),
            Self::TrailCancelled(player, card) => {
                format!("player {player} takes back trailed {card}")
            }
            Self::StackCreated(player, stack_id) => {
                format!("player {player} stages stack {stack_id}")
            }
            Self::StackAugmented(player, stack_id, card) => {
                format!("player {player} adds {card} to stack {stack_id}")
            }
            Self::StackCancelled(player, stack_id) => {
                format!("player {player} unwinds stack {stack_id}")
            }
            Self::BuildCreated(player, build_id, value) => {
                format!("player {player} builds {value} ({build_id})")
            }
            Self::BuildExtended(player, build_id, value) => {
                format!("player {player} extends build {build_id} to {value}")
            }
            Self::BuildReinforced(player, build_id) => {
                format!("player {player} reinforces build {build_id}")
            }
            Self::BuildAugmented(player, build_id) => {
                format!("player {player} augments build {build_id}")
            }
            Self::BuildCompleted(build_id, value) => {
                format!("build {build_id} is complete at {value}")
            }
            Self::Captured(player, count) => format!("player {player} captures {count} cards"),
            Self::TurnEnded(player) => format!("player {player} ends their turn"),
            Self::RoundDealt(round) => format!("round {round} dealt"),
            Self::TableSwept(player, count) => {
                format!("player {player} sweeps {count} remaining cards")
            }
            Self::GameOver(Some(winner)) => format!("game over, player {winner} wins"),
            Self::GameOver(None) => "game over, tied".to_string(),
            Self::InvariantViolation(card) => {
                format!("duplicate {card} detected in game state")
            }
        };
        write!(f, "{repr}")
    }
}
