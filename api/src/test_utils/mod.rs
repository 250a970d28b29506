//! Test utilities
//!
//! Manual mock implementations and test fixtures for unit testing.
//!
//! Why manual mocks instead of mockall?
//! - mockall has lifetime issues with traits returning `&str`
//! - Manual mocks are more explicit and easier to debug
//! - The in-memory event store mirrors the SQLite retention rule, so service
//!   tests exercise the same ordering the real store applies

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
