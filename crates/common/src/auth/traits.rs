//! Traits for token acquisition
//!
//! These traits separate the token cache from the identity provider and the
//! HTTP transport from the token cache, so each side can be replaced in
//! tests.

use std::sync::Arc;

use async_trait::async_trait;

use super::client::GrantError;
use super::types::AccessToken;

/// Performs one credential exchange against an identity provider.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Exchange a username and password for a fresh access token.
    ///
    /// # Errors
    /// Returns error if the request fails or the provider rejects the
    /// credentials
    async fn exchange(&self, username: &str, password: &str) -> Result<AccessToken, GrantError>;
}

/// Supplies a currently valid access token.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Return a valid token, acquiring a new one if needed.
    ///
    /// # Errors
    /// Returns error if a new token is needed and cannot be obtained
    async fn token(&self) -> Result<Arc<AccessToken>, GrantError>;
}
