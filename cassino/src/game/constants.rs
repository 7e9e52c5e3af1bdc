//! Fixed rule constants for the casino game.

use super::entities::CardValue;

/// Maximum value a build may reach through creation or extension.
pub const BUILD_CEILING: CardValue = 10;

/// A build with this many cards can no longer be extended.
pub const MAX_BUILD_CARDS: usize = 5;

/// Cards dealt to each player per round.
pub const HAND_SIZE: usize = 4;

/// Face-up loose cards dealt to the table on the first round.
pub const INITIAL_TABLE_CARDS: usize = 4;

/// The game is strictly two-player.
pub const NUM_PLAYERS: usize = 2;

// End-of-game scoring. The full pool is 11 points.
pub const MOST_CARDS_POINTS: u32 = 3;
pub const MOST_SPADES_POINTS: u32 = 1;
pub const BIG_CASSINO_POINTS: u32 = 2;
pub const LITTLE_CASSINO_POINTS: u32 = 1;
pub const ACE_POINTS: u32 = 1;
