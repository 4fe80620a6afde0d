//! Router configuration for the wicket demo surface.

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use super::gate::{permission_gate, AccessGate};
use super::handlers::{
    admin, clear, confirm, data, index, login, logout, makeadmin, register, remove, AppState,
};

/// Create the main router.
///
/// The panic catcher wraps everything: the gate decides before any
/// handler runs, and a panic anywhere below it, the decision logic
/// included, still resolves to a 500 instead of tearing down the
/// connection.
pub fn create_router(state: Arc<AppState>, gate: Arc<AccessGate>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/register", get(register))
        .route("/confirm", get(confirm))
        .route("/remove", get(remove))
        .route("/login", get(login))
        .route("/logout", get(logout))
        .route("/makeadmin", get(makeadmin))
        .route("/clear", get(clear))
        .route("/data", get(data))
        .route("/admin", get(admin))
        .layer(
            ServiceBuilder::new()
                .layer(CatchPanicLayer::new())
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn_with_state(gate, permission_gate)),
        )
        .with_state(state)
}

/// Create a health check router, served outside the gate.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
