//! # Cassino
//!
//! A two-player build-and-capture ("Casino"-family) card game engine with
//! a server-authoritative state store and contact resolution for
//! touch/drag clients.
//!
//! ## Architecture
//!
//! - [`game`]: cards, table items, the authoritative [`CasinoGame`]
//!   store, and the action-determination engine that turns a (dragged
//!   card, contact, state) triple into a validated state transition.
//! - [`contact`]: the position registry the layout collaborator reports
//!   screen bounds into, and the nearest-contact resolver that maps a
//!   drag-release point to a table object.
//! - [`table`]: async match hosting - one actor per match with a
//!   serialized mutation inbox, plus the manager that spawns and tracks
//!   matches.
//!
//! ## Example
//!
//! ```
//! use cassino::game::{CasinoGame, MatchRules};
//!
//! // Start a fresh match: four cards per hand, four loose on the table.
//! let game = CasinoGame::new(MatchRules::default());
//! assert_eq!(game.state().current_player, 0);
//! ```

/// Contact resolution (position registry + nearest-contact query).
pub mod contact;
pub use contact::{ContactPosition, PositionRegistry, find_contact_at_point};

/// Core game logic, entities, and the authoritative store.
pub mod game;
pub use game::{
    Action, ActionPlan, CasinoGame, DragSource, GameError, MatchRules,
    constants::{self, BUILD_CEILING, MAX_BUILD_CARDS},
    entities::{self, Card, GameState, PlayerIndex, Suit, TableItem},
};

/// Async match hosting (actor per match, manager, messages).
pub mod table;
pub use table::{MatchConfig, MatchHandle, MatchId, MatchManager};
