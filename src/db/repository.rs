//! User repository for wicket.
//!
//! CRUD operations for user records. Every mutation is a single statement
//! against the pool, so changes are visible to concurrent readers as soon
//! as the call returns.

use super::user::{NewUser, User};
use super::DbPool;
use crate::{Result, WicketError};

/// Repository for user CRUD operations.
pub struct UserRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new user in the database.
    ///
    /// Fails with `AlreadyExists` when the username is taken; the
    /// existing record is left untouched.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        sqlx::query("INSERT INTO users (username, password, email) VALUES (?, ?, ?)")
            .bind(&new_user.username)
            .bind(&new_user.password)
            .bind(&new_user.email)
            .execute(self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    WicketError::AlreadyExists("user".to_string())
                }
                other => other.into(),
            })?;

        self.get_by_username(&new_user.username)
            .await?
            .ok_or_else(|| WicketError::NotFound("user".to_string()))
    }

    /// Get a user by username.
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password, email, confirmed, is_admin, logged_in,
                    created_at, last_login
             FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Check if a username is present.
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = ?)")
                .bind(username)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }

    /// Delete a user by username.
    ///
    /// Returns true if a user was deleted. Session tokens bound to the
    /// user cascade-delete with the row.
    pub async fn delete(&self, username: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the confirmed flag. Returns true if the user exists.
    pub async fn set_confirmed(&self, username: &str, confirmed: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET confirmed = ? WHERE username = ?")
            .bind(confirmed)
            .bind(username)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the admin flag. Returns true if the user exists.
    pub async fn set_admin(&self, username: &str, is_admin: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET is_admin = ? WHERE username = ?")
            .bind(is_admin)
            .bind(username)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set the server-side logged-in marker. Returns true if the user exists.
    pub async fn set_logged_in(&self, username: &str, logged_in: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET logged_in = ? WHERE username = ?")
            .bind(logged_in)
            .bind(username)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Read the confirmed flag. False for unknown users.
    pub async fn is_confirmed(&self, username: &str) -> Result<bool> {
        let confirmed: Option<bool> =
            sqlx::query_scalar("SELECT confirmed FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(self.pool)
                .await?;
        Ok(confirmed.unwrap_or(false))
    }

    /// Read the admin flag. False for unknown users.
    pub async fn is_admin(&self, username: &str) -> Result<bool> {
        let is_admin: Option<bool> =
            sqlx::query_scalar("SELECT is_admin FROM users WHERE username = ?")
                .bind(username)
                .fetch_optional(self.pool)
                .await?;
        Ok(is_admin.unwrap_or(false))
    }

    /// Update the last login timestamp for a user.
    pub async fn update_last_login(&self, username: &str) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = datetime('now') WHERE username = ?")
            .bind(username)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// List all usernames in insertion order.
    pub async fn all_usernames(&self) -> Result<Vec<String>> {
        let usernames: Vec<String> = sqlx::query_scalar("SELECT username FROM users ORDER BY id")
            .fetch_all(self.pool)
            .await?;
        Ok(usernames)
    }

    /// Count all users.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
