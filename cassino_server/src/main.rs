//! Two-player casino card game server using the async actor model.
//!
//! Spawns MatchActor instances managed by MatchManager and exposes an
//! HTTP/WebSocket API for clients and their layout collaborators.

use cassino_server::{api, config, logging, metrics};

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Error;
use cassino::table::{MatchConfig, MatchManager};
use ctrlc::set_handler;
use pico_args::Arguments;
use tracing::info;

const HELP: &str = "\
Run a two-player casino card game server

USAGE:
  cassino_server [OPTIONS]

OPTIONS:
  --bind       IP:PORT     Server socket bind address  [default: env SERVER_BIND or 127.0.0.1:7878]
  --matches    N           Number of matches to create on startup  [default: 1]

FLAGS:
  -h, --help               Print help information

ENVIRONMENT:
  SERVER_BIND              Server bind address (e.g., 0.0.0.0:8080)
  BUILD_CEILING            Maximum value a build may reach  [default: 10]
  COMPLETION_TARGET        Build value that marks a build complete  [default: 10]
  MAX_BUILD_CARDS          Card count past which a build is frozen  [default: 5]
  CONTACT_THRESHOLD        Contact resolution radius in layout units  [default: 60]
  START_MATCHES            Number of matches to create on startup
";

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    let bind_override: Option<SocketAddr> = pargs.opt_value_from_str("--bind")?;
    let num_matches_override: Option<usize> = pargs.opt_value_from_str("--matches")?;

    // Catching signals for exit.
    set_handler(|| std::process::exit(0))?;

    logging::init();

    let server_config = config::ServerConfig::from_env(bind_override, num_matches_override);
    server_config.validate()?;

    info!("Starting casino server at {}", server_config.bind);

    let match_manager = Arc::new(MatchManager::new());

    info!(
        "Creating {} initial match(es)...",
        server_config.num_matches
    );
    for i in 0..server_config.num_matches {
        let match_config = MatchConfig {
            name: format!("Match {}", i + 1),
            rules: server_config.rules,
            contact_threshold: server_config.contact_threshold,
        };
        let handle = match_manager.create_match(match_config).await;
        info!("Created match {} with ID {}", i + 1, handle.match_id());
    }
    metrics::set_matches_active(match_manager.match_count().await);

    let api_state = api::AppState {
        match_manager,
        config: Arc::new(server_config.clone()),
    };
    let app = api::create_router(api_state);

    info!("Starting HTTP/WebSocket server on {}", server_config.bind);
    let listener = tokio::net::TcpListener::bind(server_config.bind)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", server_config.bind, e))?;

    info!(
        "Server is running at http://{}. Press Ctrl+C to stop.",
        server_config.bind
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Shutting down server...");

    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");
}
