//! Business logic for the console.

pub mod catalog;
pub mod flash;
pub mod orders;
pub mod tokens;
