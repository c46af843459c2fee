//! Session-related types.
//!
//! Types stored in the session for the signed-in operator, the per-session
//! authenticity token, and the one-shot flash slots.

use serde::{Deserialize, Serialize};

/// Session-stored operator identity.
///
/// Minimal data stored in the session to identify the signed-in operator and
/// the capabilities they hold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Operator {
    /// Display name shown in the console header.
    pub name: String,
    /// Whether this operator may create orders on behalf of customers.
    pub manage_orders: bool,
}

/// Session keys.
pub mod keys {
    /// Key for storing the signed-in operator.
    pub const OPERATOR: &str = "operator";

    /// Key for the per-session authenticity token.
    pub const FORM_TOKEN: &str = "form_token";

    /// Key for the one-shot error message list (consumed on first read).
    pub const FLASH_ERRORS: &str = "flash_errors";
}
