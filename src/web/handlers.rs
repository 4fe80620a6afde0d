//! Demo handlers exercising the permission gate.
//!
//! A small showcase surface: each route drives one user-state or session
//! operation for a fixed demo account, and `/data` and `/admin` sit
//! behind the gate so the effect is visible from a browser.

use std::sync::Arc;

use axum::extract::State;
use axum_extra::extract::CookieJar;

use crate::auth::{SessionManager, UserStore};
use crate::web::error::ApiError;
use crate::WicketError;

/// Demo account used by the showcase routes.
const DEMO_USERNAME: &str = "bob";
const DEMO_PASSWORD: &str = "hunter1hunter1";
const DEMO_EMAIL: &str = "bob@zombo.com";

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// User-record store.
    pub store: UserStore,
    /// Session manager.
    pub sessions: SessionManager,
}

impl AppState {
    /// Create a new application state.
    pub fn new(store: UserStore, sessions: SessionManager) -> Self {
        Self { store, sessions }
    }
}

/// GET / - status overview for the demo account.
pub async fn index(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<String, ApiError> {
    let has_user = state.store.has_user(DEMO_USERNAME).await?;
    let logged_in = state.sessions.is_logged_in(DEMO_USERNAME).await?;
    let confirmed = state.store.is_confirmed(DEMO_USERNAME).await?;
    let cookie_user = state.sessions.resolve_username(&jar).await?;

    let user_rights = match &cookie_user {
        Some(username) => state.sessions.is_logged_in(username).await?,
        None => false,
    };
    let admin_rights = match &cookie_user {
        Some(username) if user_rights => state.store.is_admin(username).await?,
        _ => false,
    };

    let mut out = String::new();
    out.push_str(&format!("Has user {DEMO_USERNAME}: {has_user}\n"));
    out.push_str(&format!("Logged in on server: {logged_in}\n"));
    out.push_str(&format!("Is confirmed: {confirmed}\n"));
    out.push_str(&format!(
        "Username stored in cookies (or blank): {}\n",
        cookie_user.as_deref().unwrap_or("")
    ));
    out.push_str(&format!(
        "Current user is logged in, has a valid cookie and user rights: {user_rights}\n"
    ));
    out.push_str(&format!(
        "Current user is logged in, has a valid cookie and admin rights: {admin_rights}\n"
    ));
    out.push_str(
        "\nTry: /register, /confirm, /remove, /login, /logout, /makeadmin, /clear, /data and /admin\n",
    );

    Ok(out)
}

/// GET /register - create the demo account.
pub async fn register(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    match state
        .store
        .add_user(DEMO_USERNAME, DEMO_PASSWORD, Some(DEMO_EMAIL))
        .await
    {
        Ok(_) | Err(WicketError::AlreadyExists(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let has_user = state.store.has_user(DEMO_USERNAME).await?;
    Ok(format!("User {DEMO_USERNAME} was created: {has_user}\n"))
}

/// GET /confirm - mark the demo account as confirmed.
pub async fn confirm(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    match state.store.mark_confirmed(DEMO_USERNAME).await {
        Ok(()) | Err(WicketError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let confirmed = state.store.is_confirmed(DEMO_USERNAME).await?;
    Ok(format!("User {DEMO_USERNAME} was confirmed: {confirmed}\n"))
}

/// GET /remove - remove the demo account.
pub async fn remove(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    match state.store.remove_user(DEMO_USERNAME).await {
        Ok(()) | Err(WicketError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let gone = !state.store.has_user(DEMO_USERNAME).await?;
    Ok(format!("User {DEMO_USERNAME} was removed: {gone}\n"))
}

/// GET /login - open a session for the demo account.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, String), ApiError> {
    let (jar, _token) = state.sessions.login(jar, DEMO_USERNAME).await?;
    let logged_in = state.sessions.is_logged_in(DEMO_USERNAME).await?;
    Ok((
        jar,
        format!("{DEMO_USERNAME} is now logged in: {logged_in}\n"),
    ))
}

/// GET /logout - close every session of the demo account.
pub async fn logout(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    state.sessions.logout(DEMO_USERNAME).await?;
    let logged_out = !state.sessions.is_logged_in(DEMO_USERNAME).await?;
    Ok(format!("{DEMO_USERNAME} is now logged out: {logged_out}\n"))
}

/// GET /makeadmin - grant the demo account admin rights.
pub async fn makeadmin(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    match state.store.set_admin_status(DEMO_USERNAME, true).await {
        Ok(()) | Err(WicketError::NotFound(_)) => {}
        Err(e) => return Err(e.into()),
    }

    let is_admin = state.store.is_admin(DEMO_USERNAME).await?;
    Ok(format!(
        "{DEMO_USERNAME} is now administrator: {is_admin}\n"
    ))
}

/// GET /clear - clear the session cookie, regardless of session state.
pub async fn clear(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, String) {
    let jar = state.sessions.clear_cookie(jar);
    (jar, "Clearing session cookie\n".to_string())
}

/// GET /data - content for logged-in users.
pub async fn data() -> &'static str {
    "user page that only logged in users must see!\n"
}

/// GET /admin - content for administrators, with user introspection.
pub async fn admin(State(state): State<Arc<AppState>>) -> Result<String, ApiError> {
    let usernames = state.store.all_usernames().await?;

    let mut out =
        String::from("super secret information that only logged in administrators must see!\n\n");
    out.push_str(&format!("list of all users: {}\n", usernames.join(", ")));
    Ok(out)
}
