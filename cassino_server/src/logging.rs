//! Structured logging configuration.
//!
//! The match actors log through the `log` facade; the bridge installed
//! here routes those records into the tracing subscriber so the whole
//! process shares one output and one `RUST_LOG` filter.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured logging.
///
/// Log levels are configurable via the `RUST_LOG` env var.
pub fn init() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hyper=warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Structured logging initialized");
}

/// Log one applied action with structured fields.
pub fn log_action(match_id: &str, player: usize, action: &str, outcome: &str) {
    tracing::info!(
        match_id = match_id,
        player = player,
        action = action,
        outcome = outcome,
        "Action processed"
    );
}
