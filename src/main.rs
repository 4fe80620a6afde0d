use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use wicket::web::{create_health_router, create_router};
use wicket::{AccessGate, AppState, Config, Database, SessionManager, UserStore};

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = wicket::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        wicket::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    info!("wicket - cookie-session permission gate");

    // An unreachable store is fatal at startup
    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to open database {}: {e}", config.database.path);
            std::process::exit(1);
        }
    };

    let pool = db.pool().clone();
    let sessions = SessionManager::with_config(
        pool.clone(),
        &config.session.cookie_name,
        config.session.duration_secs,
    );
    let store = UserStore::new(pool);

    let gate = Arc::new(AccessGate::new(
        sessions.clone(),
        store.clone(),
        config.gate.policy(),
        config.gate.deny_message.as_str(),
    ));
    let state = Arc::new(AppState::new(store, sessions.clone()));

    start_session_cleanup_task(sessions, config.session.cleanup_interval_secs);

    let app = create_router(state, gate).merge(create_health_router());

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!("Listening on {addr}");

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {e}");
    }
}

/// Periodically sweep expired and revoked session tokens.
fn start_session_cleanup_task(sessions: SessionManager, interval_secs: u64) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));

        // Skip the first immediate tick
        interval.tick().await;

        loop {
            interval.tick().await;
            if let Err(e) = sessions.cleanup_expired().await {
                error!("Session token cleanup failed: {e}");
            }
        }
    });
}
