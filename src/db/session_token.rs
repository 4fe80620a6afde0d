//! Session token repository for cookie authentication.
//!
//! Tokens are server-side rows, so a token can be revoked at any time
//! and removed users lose every outstanding token at once.

use super::DbPool;
use crate::Result;

/// Session token entity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SessionToken {
    /// Token ID.
    pub id: i64,
    /// Username the token is bound to.
    pub username: String,
    /// Opaque token string.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: String,
    /// Creation timestamp.
    pub created_at: String,
    /// Revocation timestamp (None if not revoked).
    pub revoked_at: Option<String>,
}

/// New session token for creation.
pub struct NewSessionToken {
    /// Username the token is bound to.
    pub username: String,
    /// Opaque token string.
    pub token: String,
    /// Expiration timestamp.
    pub expires_at: String,
}

/// Repository for session token operations.
pub struct SessionTokenRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> SessionTokenRepository<'a> {
    /// Create a new repository instance.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Create a new session token.
    pub async fn create(&self, new_token: &NewSessionToken) -> Result<SessionToken> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO session_tokens (username, token, expires_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(&new_token.username)
        .bind(&new_token.token)
        .bind(&new_token.expires_at)
        .fetch_one(self.pool)
        .await?;

        let token = sqlx::query_as::<_, SessionToken>(
            "SELECT id, username, token, expires_at, created_at, revoked_at
             FROM session_tokens WHERE id = ?",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(token)
    }

    /// Get a valid (not expired, not revoked) token by token string.
    pub async fn get_valid(&self, token: &str) -> Result<Option<SessionToken>> {
        let result = sqlx::query_as::<_, SessionToken>(
            "SELECT id, username, token, expires_at, created_at, revoked_at
             FROM session_tokens
             WHERE token = ?
               AND revoked_at IS NULL
               AND expires_at > datetime('now')",
        )
        .bind(token)
        .fetch_optional(self.pool)
        .await?;

        Ok(result)
    }

    /// Check whether a user has at least one valid token.
    pub async fn has_valid_for_user(&self, username: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                 SELECT 1 FROM session_tokens
                 WHERE username = ?
                   AND revoked_at IS NULL
                   AND expires_at > datetime('now'))",
        )
        .bind(username)
        .fetch_one(self.pool)
        .await?;

        Ok(exists)
    }

    /// Revoke a token. Returns true if a live token was revoked.
    pub async fn revoke(&self, token: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE session_tokens SET revoked_at = datetime('now')
             WHERE token = ? AND revoked_at IS NULL",
        )
        .bind(token)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Revoke all tokens for a user. Returns the number revoked.
    pub async fn revoke_all_for_user(&self, username: &str) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE session_tokens SET revoked_at = datetime('now')
             WHERE username = ? AND revoked_at IS NULL",
        )
        .bind(username)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Delete expired and revoked tokens (cleanup).
    pub async fn cleanup_expired(&self) -> Result<u64> {
        let result = sqlx::query(
            "DELETE FROM session_tokens
             WHERE expires_at < datetime('now') OR revoked_at IS NOT NULL",
        )
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
