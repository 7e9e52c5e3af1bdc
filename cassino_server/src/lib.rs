//! Casino card game server library.
//!
//! Exposes the router, configuration, logging, and metrics so the
//! binary and the integration tests share one assembly path.

pub mod api;
pub mod config;
pub mod logging;
pub mod metrics;
