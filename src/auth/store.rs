//! User record lifecycle for wicket.
//!
//! `UserStore` owns registration, confirmation, removal, and privilege
//! changes, backed by the database user repository. Reads used by the
//! authorization decision are total: unknown users answer `false`
//! rather than erroring.

use tracing::info;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::validation::{validate_email, validate_username};
use crate::db::{DbPool, NewUser, User, UserRepository};
use crate::{Result, WicketError};

/// Persistent user-state store.
#[derive(Clone)]
pub struct UserStore {
    pool: DbPool,
}

impl UserStore {
    /// Create a new store over the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Register a new user.
    ///
    /// Validates the username, password, and email, hashes the password,
    /// and creates the record with `confirmed=false` and `is_admin=false`.
    /// Fails with `AlreadyExists` if the username is taken; the existing
    /// record is not modified.
    pub async fn add_user(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<User> {
        validate_username(username)?;
        if let Some(email) = email {
            validate_email(email)?;
        }

        let repo = UserRepository::new(&self.pool);
        if repo.username_exists(username).await? {
            return Err(WicketError::AlreadyExists("user".to_string()));
        }

        let password_hash = hash_password(password)?;

        let mut new_user = NewUser::new(username, password_hash);
        if let Some(email) = email {
            new_user = new_user.with_email(email);
        }

        let user = repo.create(&new_user).await?;

        info!(username = %user.username, user_id = user.id, "New user registered");

        Ok(user)
    }

    /// Check whether a user exists.
    pub async fn has_user(&self, username: &str) -> Result<bool> {
        UserRepository::new(&self.pool).username_exists(username).await
    }

    /// Remove a user.
    ///
    /// Fails with `NotFound` if the user does not exist. Outstanding
    /// session tokens cascade-delete with the record.
    pub async fn remove_user(&self, username: &str) -> Result<()> {
        let deleted = UserRepository::new(&self.pool).delete(username).await?;
        if !deleted {
            return Err(WicketError::NotFound("user".to_string()));
        }

        info!(username = %username, "User removed");
        Ok(())
    }

    /// Mark a user's email as confirmed. Idempotent.
    pub async fn mark_confirmed(&self, username: &str) -> Result<()> {
        let updated = UserRepository::new(&self.pool)
            .set_confirmed(username, true)
            .await?;
        if !updated {
            return Err(WicketError::NotFound("user".to_string()));
        }
        Ok(())
    }

    /// Grant or revoke administrator rights.
    pub async fn set_admin_status(&self, username: &str, is_admin: bool) -> Result<()> {
        let updated = UserRepository::new(&self.pool)
            .set_admin(username, is_admin)
            .await?;
        if !updated {
            return Err(WicketError::NotFound("user".to_string()));
        }

        info!(username = %username, is_admin = is_admin, "Admin status changed");
        Ok(())
    }

    /// Check the confirmed flag. False for unknown users.
    pub async fn is_confirmed(&self, username: &str) -> Result<bool> {
        UserRepository::new(&self.pool).is_confirmed(username).await
    }

    /// Check the admin flag. False for unknown users.
    pub async fn is_admin(&self, username: &str) -> Result<bool> {
        UserRepository::new(&self.pool).is_admin(username).await
    }

    /// List all usernames in registration order.
    pub async fn all_usernames(&self) -> Result<Vec<String>> {
        UserRepository::new(&self.pool).all_usernames().await
    }

    /// Check a password against the stored hash. False for unknown users.
    pub async fn correct_password(&self, username: &str, password: &str) -> Result<bool> {
        let Some(user) = UserRepository::new(&self.pool)
            .get_by_username(username)
            .await?
        else {
            return Ok(false);
        };

        Ok(verify_password(password, &user.password).is_ok())
    }

    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}
