//! # Glide Infrastructure
//!
//! HTTP implementation of the Concourse CI API client.
//!
//! This crate contains:
//! - Connection settings loading from the environment
//! - The authenticating transport (bearer token on every request)
//! - `ConcourseClient`: list endpoints and build event streaming
//! - Conversions from transport errors into `GlideError`
//!
//! ## Architecture
//! - Depends on `glide-domain` for records and errors
//! - Depends on `glide-common` for the password grant and token cache
//! - Contains all I/O

pub mod api;
pub mod config;
pub mod errors;
pub mod http;

// Re-export commonly used items
pub use api::{ConcourseClient, ConcourseClientBuilder};
pub use config::{EnvSource, ProcessEnv};
pub use errors::InfraError;
pub use http::{AuthenticatedTransport, HttpClientBuilder};
