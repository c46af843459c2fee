//! Order Desk Core - Shared types library.
//!
//! This crate provides common types used across the Order Desk components:
//! - `console` - Operator-facing order entry service
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. Every value
//! that crosses a component boundary (IDs, phone numbers, emails, money) has
//! a parsed, validated representation here so the rest of the workspace never
//! passes raw strings around.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
