//! OAuth 2.0 password grant and token caching
//!
//! Concourse issues bearer tokens from its built-in identity provider at
//! `/sky/issuer/token`. This module exchanges a username and password for a
//! token and keeps the most recent one until it is about to expire.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │   TokenCache     │  TokenSource: cached token, refresh on demand
//! └────────┬─────────┘
//!          │
//!          └──► TokenExchange
//!                    │
//!                    └──► PasswordGrantClient  (HTTP password grant)
//! ```
//!
//! # Usage Example
//!
//! ```no_run
//! use glide_common::auth::{PasswordGrantClient, PasswordGrantConfig, TokenCache};
//!
//! # async fn run() -> Result<(), glide_common::auth::GrantError> {
//! let config = PasswordGrantConfig::for_service("https://ci.example.com");
//! let client = PasswordGrantClient::new(config, reqwest::Client::new());
//! let cache = TokenCache::new(client, "admin", "secret");
//!
//! // Exchanges on first use, then serves the cached token until it expires
//! let token = cache.token().await?;
//! println!("{}", token.authorization_header());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod token_cache;
pub mod traits;
pub mod types;

pub use client::{GrantError, PasswordGrantClient};
pub use token_cache::TokenCache;
pub use traits::{TokenExchange, TokenSource};
pub use types::{AccessToken, OAuthError, PasswordGrantConfig, TokenResponse};
