//! Web module for wicket.
//!
//! The authorization gate middleware, the demo handler surface, and the
//! router wiring them together.

pub mod error;
pub mod gate;
pub mod handlers;
pub mod router;

pub use error::ApiError;
pub use gate::{permission_gate, AccessGate, Decision};
pub use handlers::AppState;
pub use router::{create_health_router, create_router};
