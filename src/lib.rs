//! wicket - a cookie-session permission gate for axum services.
//!
//! Classifies request paths as public, user-only, admin-only, or locked
//! down, resolves the caller through a cookie-bound session token, and
//! allows or denies each request before it reaches a handler. Users and
//! sessions persist in SQLite.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod policy;
pub mod web;

pub use auth::{
    hash_password, validate_password, verify_password, PasswordError, SessionManager, UserStore,
    ValidationError, DEFAULT_COOKIE_NAME, DEFAULT_SESSION_DURATION_SECS,
};
pub use config::Config;
pub use db::{Database, DbPool, NewUser, SessionToken, User, UserRepository};
pub use error::{Result, WicketError};
pub use policy::{AccessLevel, PathMatcher, PermissionPolicy, PolicyRule};
pub use web::{create_health_router, create_router, AccessGate, AppState, Decision};
