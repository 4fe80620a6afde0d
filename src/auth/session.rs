//! Session management for wicket.
//!
//! `SessionManager` issues opaque session tokens, carries them in an
//! HTTP-only cookie, and resolves them back to usernames on later
//! requests. Tokens live in the database, so logout and user removal
//! revoke them immediately.

use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::db::{DbPool, NewSessionToken, SessionTokenRepository, UserRepository};
use crate::{Result, WicketError};

/// Default session duration (24 hours).
pub const DEFAULT_SESSION_DURATION_SECS: u64 = 24 * 60 * 60;

/// Default session cookie name.
pub const DEFAULT_COOKIE_NAME: &str = "wicket_session";

/// Timestamp format used for token expiry columns.
const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Session manager issuing and validating cookie-bound tokens.
#[derive(Clone)]
pub struct SessionManager {
    pool: DbPool,
    cookie_name: String,
    session_duration: Duration,
}

impl SessionManager {
    /// Create a new session manager with default settings.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            session_duration: Duration::from_secs(DEFAULT_SESSION_DURATION_SECS),
        }
    }

    /// Create a session manager with a custom cookie name and duration.
    pub fn with_config(pool: DbPool, cookie_name: &str, duration_secs: u64) -> Self {
        Self {
            pool,
            cookie_name: cookie_name.to_string(),
            session_duration: Duration::from_secs(duration_secs),
        }
    }

    /// Name of the session cookie.
    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    /// Log a user in.
    ///
    /// Fails with `NotFound` if the username is not registered. On
    /// success the returned jar carries the session cookie, the
    /// server-side logged-in marker is set, and the raw token is
    /// returned alongside.
    pub async fn login(&self, jar: CookieJar, username: &str) -> Result<(CookieJar, String)> {
        let users = UserRepository::new(&self.pool);
        if !users.username_exists(username).await? {
            return Err(WicketError::NotFound("user".to_string()));
        }

        let token = Uuid::new_v4().to_string();
        let expires_at = (Utc::now()
            + chrono::Duration::from_std(self.session_duration).unwrap_or_default())
        .format(EXPIRY_FORMAT)
        .to_string();

        SessionTokenRepository::new(&self.pool)
            .create(&NewSessionToken {
                username: username.to_string(),
                token: token.clone(),
                expires_at,
            })
            .await?;

        users.set_logged_in(username, true).await?;
        users.update_last_login(username).await?;

        let cookie = Cookie::build((self.cookie_name.clone(), token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(
                self.session_duration.as_secs() as i64
            ));

        info!(username = %username, "Session opened");

        Ok((jar.add(cookie), token))
    }

    /// Log a user out.
    ///
    /// Revokes every token bound to the username and clears the
    /// server-side marker. Idempotent: logging out a user with no
    /// session, or an unknown user, is not an error.
    pub async fn logout(&self, username: &str) -> Result<()> {
        let revoked = SessionTokenRepository::new(&self.pool)
            .revoke_all_for_user(username)
            .await?;
        UserRepository::new(&self.pool)
            .set_logged_in(username, false)
            .await?;

        if revoked > 0 {
            info!(username = %username, revoked = revoked, "Session closed");
        }

        Ok(())
    }

    /// Resolve the username bound to the request's session cookie.
    ///
    /// `Ok(None)` covers every anonymous state: no cookie, unknown or
    /// revoked token, expired token, or a token whose user has been
    /// removed (tokens cascade-delete with their user). Errors are
    /// reserved for store failures.
    pub async fn resolve_username(&self, jar: &CookieJar) -> Result<Option<String>> {
        let Some(cookie) = jar.get(&self.cookie_name) else {
            return Ok(None);
        };

        let token = cookie.value();
        if token.is_empty() {
            return Ok(None);
        }

        let Some(record) = SessionTokenRepository::new(&self.pool).get_valid(token).await? else {
            debug!("Session cookie carries no valid token");
            return Ok(None);
        };

        Ok(Some(record.username))
    }

    /// Check whether a user counts as logged in.
    ///
    /// The server-side marker is authoritative: it must be set AND at
    /// least one valid token must exist. A valid cookie alone is not
    /// enough after a forced logout.
    pub async fn is_logged_in(&self, username: &str) -> Result<bool> {
        let Some(user) = UserRepository::new(&self.pool)
            .get_by_username(username)
            .await?
        else {
            return Ok(false);
        };

        if !user.logged_in {
            return Ok(false);
        }

        SessionTokenRepository::new(&self.pool)
            .has_valid_for_user(username)
            .await
    }

    /// Add a cookie-clearing header to the jar, regardless of session state.
    pub fn clear_cookie(&self, jar: CookieJar) -> CookieJar {
        let removal = Cookie::build((self.cookie_name.clone(), ""))
            .path("/")
            .max_age(time::Duration::ZERO);
        jar.add(removal)
    }

    /// Delete expired and revoked tokens.
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let removed = SessionTokenRepository::new(&self.pool)
            .cleanup_expired()
            .await?;
        if removed > 0 {
            debug!(removed = removed, "Cleaned up expired session tokens");
        }
        Ok(removed)
    }
}
