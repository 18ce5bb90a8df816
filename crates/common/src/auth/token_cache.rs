//! Token cache with on-demand refresh
//!
//! Holds the most recent access token and replaces it when it is missing or
//! no longer valid. Concurrent callers that find an invalid token may each
//! run an exchange; the last completed exchange is the one kept. Exchanges
//! are idempotent, so overlapping refreshes only cost an extra request.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, info};

use super::client::GrantError;
use super::traits::{TokenExchange, TokenSource};
use super::types::AccessToken;

/// Access token cache for one set of credentials.
///
/// The lock only guards reading and replacing the `Arc`; it is never held
/// across the exchange itself.
pub struct TokenCache<E: TokenExchange + 'static> {
    exchange: E,
    username: String,
    password: String,
    current: RwLock<Option<Arc<AccessToken>>>,
    exchanges: AtomicU64,
}

impl<E: TokenExchange + 'static> TokenCache<E> {
    /// Create an empty cache.
    ///
    /// # Arguments
    /// * `exchange` - Identity provider client used on refresh
    /// * `username` / `password` - Resource owner credentials
    #[must_use]
    pub fn new(exchange: E, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            exchange,
            username: username.into(),
            password: password.into(),
            current: RwLock::new(None),
            exchanges: AtomicU64::new(0),
        }
    }

    /// Get a valid access token, running the exchange if the cached one is
    /// missing or expired.
    ///
    /// # Errors
    /// Returns the exchange error; the cached value is left untouched.
    pub async fn token(&self) -> Result<Arc<AccessToken>, GrantError> {
        if let Some(token) = self.current() {
            if token.is_valid() {
                return Ok(token);
            }
            debug!(seconds_until_expiry = ?token.seconds_until_expiry(), "cached token expired");
        }

        let token = Arc::new(self.exchange.exchange(&self.username, &self.password).await?);
        self.exchanges.fetch_add(1, Ordering::Relaxed);
        *self.current.write() = Some(Arc::clone(&token));

        info!(
            username = %self.username,
            seconds_until_expiry = ?token.seconds_until_expiry(),
            "access token refreshed"
        );

        Ok(token)
    }

    /// Cached token, valid or not, without refreshing.
    #[must_use]
    pub fn current(&self) -> Option<Arc<AccessToken>> {
        self.current.read().clone()
    }

    /// Replace the cached token.
    pub fn store(&self, token: AccessToken) {
        *self.current.write() = Some(Arc::new(token));
    }

    /// Drop the cached token so the next call re-authenticates.
    pub fn clear(&self) {
        *self.current.write() = None;
    }

    /// Number of completed exchanges since creation.
    #[must_use]
    pub fn exchange_count(&self) -> u64 {
        self.exchanges.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl<E: TokenExchange + 'static> TokenSource for TokenCache<E> {
    async fn token(&self) -> Result<Arc<AccessToken>, GrantError> {
        TokenCache::token(self).await
    }
}
