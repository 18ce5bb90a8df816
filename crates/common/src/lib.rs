//! Authentication utilities shared across Glide crates.
//!
//! - [`auth`]: OAuth2 password grant against the Concourse identity provider
//!   and a concurrent token cache
//! - [`testing`]: mock token exchange (feature `test-utils`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use auth::{
    AccessToken, GrantError, PasswordGrantClient, PasswordGrantConfig, TokenCache, TokenExchange,
    TokenSource,
};
