//! End-to-end tests for the permission gate.
//!
//! Drives the demo surface through axum-test with cookie persistence,
//! covering the full register -> login -> escalate -> logout lifecycle.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;

use wicket::web::{create_health_router, create_router};
use wicket::{
    AccessGate, AccessLevel, AppState, Database, PermissionPolicy, SessionManager, UserStore,
};

const DENY_MESSAGE: &str = "Permission denied!";

/// Create a test server over an in-memory database, returning the
/// database handle so tests can reach the store directly.
async fn create_test_server_with_policy(policy: PermissionPolicy) -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let pool = db.pool().clone();

    let sessions = SessionManager::new(pool.clone());
    let store = UserStore::new(pool);

    let gate = Arc::new(AccessGate::new(
        sessions.clone(),
        store.clone(),
        policy,
        DENY_MESSAGE,
    ));
    let state = Arc::new(AppState::new(store, sessions));

    let router = create_router(state, gate).merge(create_health_router());

    let mut server = TestServer::new(router).expect("Failed to create test server");
    server.do_save_cookies();

    (server, db)
}

async fn create_test_server() -> (TestServer, Database) {
    create_test_server_with_policy(PermissionPolicy::with_defaults()).await
}

#[tokio::test]
async fn test_public_paths_open_to_anonymous() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("Has user bob: false"));

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_protected_paths_closed_to_anonymous() {
    let (server, _db) = create_test_server().await;

    for path in ["/data", "/repo", "/admin"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN, "path {path}");
        assert_eq!(response.text(), DENY_MESSAGE);
    }
}

#[tokio::test]
async fn test_full_lifecycle_scenario() {
    let (server, _db) = create_test_server().await;

    // Register bob
    let response = server.get("/register").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("User bob was created: true"));

    // Login bob; the session cookie is stored by the test client
    let response = server.get("/login").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("bob is now logged in: true"));

    // User-only path now opens
    let response = server.get("/data").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("only logged in users"));

    // Admin-only path still denies: bob is no admin
    let response = server.get("/admin").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.text(), DENY_MESSAGE);

    // Escalate bob
    let response = server.get("/makeadmin").await;
    assert!(response.text().contains("bob is now administrator: true"));

    // Same request now passes and lists the users
    let response = server.get("/admin").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert!(response.text().contains("list of all users: bob"));

    // Logout closes both protected paths again
    let response = server.get("/logout").await;
    assert!(response.text().contains("bob is now logged out: true"));

    let response = server.get("/admin").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    let response = server.get("/data").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_confirm_flow() {
    let (server, _db) = create_test_server().await;

    // Confirming before registration reports false
    let response = server.get("/confirm").await;
    assert!(response.text().contains("User bob was confirmed: false"));

    server.get("/register").await;
    let response = server.get("/confirm").await;
    assert!(response.text().contains("User bob was confirmed: true"));

    // Idempotent
    let response = server.get("/confirm").await;
    assert!(response.text().contains("User bob was confirmed: true"));
}

#[tokio::test]
async fn test_remove_invalidates_session() {
    let (server, _db) = create_test_server().await;

    server.get("/register").await;
    server.get("/login").await;

    let response = server.get("/data").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = server.get("/remove").await;
    assert!(response.text().contains("User bob was removed: true"));

    // The still-saved cookie no longer grants anything
    let response = server.get("/data").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = server.get("/").await;
    assert!(response.text().contains("Has user bob: false"));
    assert!(response
        .text()
        .contains("Username stored in cookies (or blank): \n"));
}

#[tokio::test]
async fn test_clear_cookie_drops_access() {
    let (server, _db) = create_test_server().await;

    server.get("/register").await;
    server.get("/login").await;
    assert_eq!(server.get("/data").await.status_code(), StatusCode::OK);

    let response = server.get("/clear").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    // The clearing cookie overwrote the saved session cookie
    let response = server.get("/data").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    // Server-side the user still counts as logged in; only the cookie
    // is gone
    let response = server.get("/").await;
    assert!(response.text().contains("Logged in on server: true"));
}

#[tokio::test]
async fn test_relogin_after_logout() {
    let (server, _db) = create_test_server().await;

    server.get("/register").await;
    server.get("/login").await;
    server.get("/logout").await;
    assert_eq!(server.get("/data").await.status_code(), StatusCode::FORBIDDEN);

    server.get("/login").await;
    assert_eq!(server.get("/data").await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_index_reflects_cookie_identity() {
    let (server, _db) = create_test_server().await;

    server.get("/register").await;
    server.get("/login").await;

    let text = server.get("/").await.text();
    assert!(text.contains("Username stored in cookies (or blank): bob"));
    assert!(text.contains("user rights: true"));
    assert!(text.contains("admin rights: false"));

    server.get("/makeadmin").await;
    let text = server.get("/").await.text();
    assert!(text.contains("admin rights: true"));
}

#[tokio::test]
async fn test_deny_all_lockdown() {
    let policy = PermissionPolicy::new(AccessLevel::DenyAll);
    let (server, _db) = create_test_server_with_policy(policy).await;

    // Health is served outside the gated router and stays reachable
    assert_eq!(server.get("/health").await.status_code(), StatusCode::OK);

    for path in ["/", "/register", "/data", "/admin"] {
        let response = server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::FORBIDDEN, "path {path}");
        assert_eq!(response.text(), DENY_MESSAGE);
    }
}

#[tokio::test]
async fn test_custom_deny_message_body() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/admin").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.text(), DENY_MESSAGE);
}

#[tokio::test]
async fn test_fail_closed_when_store_goes_away() {
    let (server, db) = create_test_server().await;

    server.get("/register").await;
    server.get("/login").await;
    assert_eq!(server.get("/data").await.status_code(), StatusCode::OK);

    db.pool().close().await;

    // Protected paths deny once the store is unreachable
    let response = server.get("/data").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
    assert_eq!(response.text(), DENY_MESSAGE);

    let response = server.get("/admin").await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}
