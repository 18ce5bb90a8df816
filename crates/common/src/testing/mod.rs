//! Testing utilities
//!
//! - **[`mocks`]**: Mock implementations of the auth traits

pub mod mocks;

pub use mocks::MockTokenExchange;
