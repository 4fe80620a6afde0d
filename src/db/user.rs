//! User records as stored in the `users` table.

/// A registered user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Row id.
    pub id: i64,
    /// Unique login name, fixed once created.
    pub username: String,
    /// Argon2 PHC hash of the password.
    pub password: String,
    /// Contact email, if one was given.
    pub email: Option<String>,
    /// Set by the email confirmation step.
    pub confirmed: bool,
    /// Grants access to admin-only paths.
    pub is_admin: bool,
    /// Server-side session marker, independent of cookie presence.
    pub logged_in: bool,
    /// Row creation time.
    pub created_at: String,
    /// Time of the most recent login, if any.
    pub last_login: Option<String>,
}

/// Fields needed to insert a user.
///
/// The remaining columns take their defaults: unconfirmed, no admin
/// rights, not logged in.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Argon2 PHC hash, produced before insertion.
    pub password: String,
    /// Contact email, if any.
    pub email: Option<String>,
}

impl NewUser {
    /// Build an insert payload without an email.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }

    /// Attach an email address.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
