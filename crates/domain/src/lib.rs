//! # Glide Domain
//!
//! Data types shared by the Glide Concourse client crates.
//!
//! This crate contains:
//! - Resource records decoded from the `/api/v1` list endpoints
//! - The build event record streamed from `builds/{id}/events`
//! - The error type and `Result` alias used across the workspace
//! - Connection settings and protocol constants
//!
//! ## Architecture
//! - No dependencies on other Glide crates
//! - No I/O; records are plain `serde` values

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
