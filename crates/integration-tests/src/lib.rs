//! Integration tests for Order Desk.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the console against a test store
//! cargo run -p order-desk-console
//!
//! # Run integration tests
//! cargo test -p order-desk-integration-tests -- --ignored
//! ```
//!
//! The tests in `tests/` drive the console over HTTP with a cookie-holding
//! client; all of them are `#[ignore]`d because they need a running server
//! and a commerce platform to talk to. `ORDER_DESK_BASE_URL` and
//! `ORDER_DESK_OPERATOR_KEY` select the instance under test.
