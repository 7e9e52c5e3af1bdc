//! Match hosting with an async actor model.
//!
//! Each match runs in its own Tokio task with an mpsc message inbox, so
//! table mutations are serialized without explicit locks: one action is
//! processed to completion before the next is accepted. The
//! [`MatchManager`] spawns and tracks [`MatchActor`] instances and
//! provides discovery and cleanup.

pub mod actor;
pub mod config;
pub mod manager;
pub mod messages;

use uuid::Uuid;

/// Identifier for one hosted match.
pub type MatchId = Uuid;

pub use actor::{MatchActor, MatchHandle};
pub use config::MatchConfig;
pub use manager::{MatchManager, MatchMetadata};
pub use messages::{MatchMessage, MatchResponse, StateChangeNotification};
