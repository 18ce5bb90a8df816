//! Protocol constants
//!
//! Values fixed by the Concourse API and its `fly` CLI identity.

// Environment variables consulted for unset connection fields
pub const ENV_URL: &str = "CONCOURSE_URL";
pub const ENV_USERNAME: &str = "CONCOURSE_USERNAME";
pub const ENV_PASSWORD: &str = "CONCOURSE_PASSWORD";

// Identity provider (password grant)
pub const TOKEN_PATH: &str = "/sky/issuer/token";
pub const OAUTH_CLIENT_ID: &str = "fly";
pub const OAUTH_CLIENT_SECRET: &str = "Zmx5";
pub const OAUTH_SCOPES: [&str; 5] = ["openid", "profile", "email", "federated:id", "groups"];

/// Tokens are treated as expired this many seconds before their expiry.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 10;

// Resource API
pub const API_PREFIX: [&str; 2] = ["api", "v1"];

/// Event name that marks the graceful end of a build event stream.
pub const END_EVENT_NAME: &str = "end";
