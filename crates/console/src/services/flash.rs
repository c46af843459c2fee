//! One-shot flash messages over the session.
//!
//! The submission workflow itself returns an explicit outcome value; these
//! helpers exist only for the POST/redirect/GET glue, where failure messages
//! must survive exactly one redirect. Reading consumes the slot, so a later
//! unrelated page view never redisplays stale errors.

use tower_sessions::Session;

use crate::models::session_keys;

/// Store the error message list for one-time display after a redirect.
///
/// # Errors
///
/// Returns the session store error if the write fails.
pub async fn push_errors(
    session: &Session,
    errors: Vec<String>,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::FLASH_ERRORS, errors).await
}

/// Take the stored error messages, clearing the slot.
///
/// Returns an empty list when nothing is stored.
pub async fn take_errors(session: &Session) -> Vec<String> {
    session
        .remove::<Vec<String>>(session_keys::FLASH_ERRORS)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}
