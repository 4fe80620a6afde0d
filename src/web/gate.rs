//! The authorization gate: per-request Allow/Deny decisions and the
//! axum middleware that enforces them.
//!
//! The gate resolves the caller's identity from the session cookie,
//! classifies the request path, and checks the stored user attributes
//! the classification demands. Store failures never open a protected
//! path: any error on a non-public path denies the request.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::auth::{SessionManager, UserStore};
use crate::policy::{AccessLevel, PermissionPolicy};
use crate::Result;

/// Outcome of an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Continue to the inner handler.
    Allow,
    /// Short-circuit with the rejection response.
    Deny,
}

/// Authorization decision engine.
///
/// Collaborators are injected at construction; the gate holds no other
/// state and takes no locks beyond the policy read lock.
pub struct AccessGate {
    sessions: SessionManager,
    users: UserStore,
    policy: RwLock<PermissionPolicy>,
    deny_message: String,
}

impl AccessGate {
    /// Create a new gate.
    pub fn new(
        sessions: SessionManager,
        users: UserStore,
        policy: PermissionPolicy,
        deny_message: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            users,
            policy: RwLock::new(policy),
            deny_message: deny_message.into(),
        }
    }

    /// Body of the rejection response.
    pub fn deny_message(&self) -> &str {
        &self.deny_message
    }

    /// Decide whether a request for `path` with the given cookies may
    /// proceed.
    pub async fn evaluate(&self, path: &str, jar: &CookieJar) -> Decision {
        let level = self.policy.read().await.classify(path);

        match level {
            AccessLevel::Public => Decision::Allow,
            AccessLevel::DenyAll => Decision::Deny,
            AccessLevel::UserOnly => match self.session_user(jar).await {
                Ok(Some(_)) => Decision::Allow,
                Ok(None) => Decision::Deny,
                Err(e) => {
                    warn!(path = %path, error = %e, "Store failure during authorization, denying");
                    Decision::Deny
                }
            },
            AccessLevel::AdminOnly => match self.admin_user(jar).await {
                Ok(true) => Decision::Allow,
                Ok(false) => Decision::Deny,
                Err(e) => {
                    warn!(path = %path, error = %e, "Store failure during authorization, denying");
                    Decision::Deny
                }
            },
        }
    }

    /// Resolve a username that both carries a valid cookie and is
    /// logged in server-side.
    async fn session_user(&self, jar: &CookieJar) -> Result<Option<String>> {
        let Some(username) = self.sessions.resolve_username(jar).await? else {
            return Ok(None);
        };
        if !self.sessions.is_logged_in(&username).await? {
            return Ok(None);
        }
        Ok(Some(username))
    }

    /// Check the session user additionally holds admin rights.
    async fn admin_user(&self, jar: &CookieJar) -> Result<bool> {
        let Some(username) = self.session_user(jar).await? else {
            return Ok(false);
        };
        self.users.is_admin(&username).await
    }

    /// Replace the active policy.
    pub async fn reset_policy(&self, policy: PermissionPolicy) {
        *self.policy.write().await = policy;
    }

    /// Clear every policy rule; all paths fall back to the policy default.
    pub async fn clear_policy(&self) {
        self.policy.write().await.clear();
    }
}

/// Middleware enforcing the gate's decision in front of the handler chain.
///
/// Layer it with `middleware::from_fn_with_state(gate, permission_gate)`.
pub async fn permission_gate(
    State(gate): State<Arc<AccessGate>>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();

    match gate.evaluate(&path, &jar).await {
        Decision::Allow => next.run(request).await,
        Decision::Deny => {
            debug!(path = %path, "Request rejected");
            (StatusCode::FORBIDDEN, gate.deny_message().to_owned()).into_response()
        }
    }
}
