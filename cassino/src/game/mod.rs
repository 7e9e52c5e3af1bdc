//! Casino game engine - rules, state, and action determination.
//!
//! This module provides the foundational game implementation including:
//! - Cards, builds, temporary stacks, and the table sum type
//! - The authoritative per-match state store and action handlers
//! - The action-determination engine mapping drops to legal actions
//! - Build and temporary-stack lifecycle operations

pub mod actions;
pub mod builds;
pub mod constants;
pub mod engine;
pub mod entities;
pub mod stacks;

pub use actions::{Action, ActionOption, ActionPlan, DragSource};
pub use engine::{CasinoGame, GameError, MatchRules};
