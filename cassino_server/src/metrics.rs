//! Server metrics recorded through the `metrics` facade.
//!
//! Recording is unconditional and nearly free when no recorder is
//! installed; wiring an exporter is a deployment concern.

/// An action envelope passed validation and was applied.
pub fn record_action_processed() {
    metrics::counter!("cassino_actions_processed_total").increment(1);
}

/// The rules engine rejected an action envelope.
pub fn record_action_rejected() {
    metrics::counter!("cassino_actions_rejected_total").increment(1);
}

/// A WebSocket client connected to a match.
pub fn record_ws_connected() {
    metrics::gauge!("cassino_ws_connections").increment(1.0);
}

/// A WebSocket client disconnected.
pub fn record_ws_disconnected() {
    metrics::gauge!("cassino_ws_connections").decrement(1.0);
}

/// Track the number of open matches.
pub fn set_matches_active(count: usize) {
    metrics::gauge!("cassino_matches_active").set(count as f64);
}
