//! Database schema and migrations for wicket.
//!
//! Migrations are applied sequentially when the database is first opened
//! or upgraded; the schema_version table tracks what has been applied.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: Initial schema - users table
    r#"
-- Users table for the permission gate's user-state model
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL UNIQUE,
    password    TEXT NOT NULL,           -- Argon2 hash
    email       TEXT,
    confirmed   INTEGER NOT NULL DEFAULT 0,
    is_admin    INTEGER NOT NULL DEFAULT 0,
    logged_in   INTEGER NOT NULL DEFAULT 0,  -- server-side session marker
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    last_login  TEXT
);

CREATE INDEX idx_users_username ON users(username);
"#,
    // v2: Session tokens table
    r#"
-- Session tokens bound to usernames; rows die with their user
CREATE TABLE session_tokens (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL REFERENCES users(username) ON DELETE CASCADE,
    token       TEXT NOT NULL UNIQUE,
    expires_at  TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    revoked_at  TEXT
);

CREATE INDEX idx_session_tokens_username ON session_tokens(username);
CREATE INDEX idx_session_tokens_token ON session_tokens(token);
"#,
];
