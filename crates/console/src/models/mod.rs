//! Data models for the console.

pub mod session;

pub use session::{Operator, keys as session_keys};
