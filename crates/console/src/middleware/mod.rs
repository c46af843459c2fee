//! Middleware for the console.

pub mod auth;
pub mod session;

pub use auth::{RequireOperator, clear_operator, set_operator};
pub use session::create_session_layer;
