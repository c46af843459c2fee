//! Per-session authenticity tokens.
//!
//! Every data-querying or state-changing endpoint requires the token issued
//! for the caller's session, so a request forged from another origin cannot
//! ride an operator's cookie. The token is minted once per session, embedded
//! in the rendered page, and compared in constant time on each request.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::Rng;
use tower_sessions::Session;

use crate::models::session_keys;

/// Random bytes behind one token.
const TOKEN_BYTES: usize = 32;

/// Get the session's authenticity token, minting one if needed.
///
/// # Errors
///
/// Returns the session store error if the token cannot be persisted.
pub async fn issue(session: &Session) -> Result<String, tower_sessions::session::Error> {
    if let Some(token) = session.get::<String>(session_keys::FORM_TOKEN).await? {
        return Ok(token);
    }

    let token = generate();
    session.insert(session_keys::FORM_TOKEN, &token).await?;
    Ok(token)
}

/// Check a provided token against the session's token.
///
/// A session without an issued token never verifies.
pub async fn verify(session: &Session, provided: &str) -> bool {
    session
        .get::<String>(session_keys::FORM_TOKEN)
        .await
        .ok()
        .flatten()
        .is_some_and(|expected| constant_time_eq(&expected, provided))
}

fn generate() -> String {
    let bytes: [u8; TOKEN_BYTES] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Compare two strings without short-circuiting on the first mismatch.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq("abc123", "abc123"));
        assert!(!constant_time_eq("abc123", "abc124"));
        assert!(!constant_time_eq("abc123", "abc12"));
        assert!(!constant_time_eq("", "x"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn test_generate_is_url_safe_and_unique() {
        let a = generate();
        let b = generate();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
