//! OAuth 2.0 types for the password grant
//!
//! Token, token response and provider configuration used when exchanging a
//! Concourse username and password for a bearer token.

use std::fmt;

use chrono::{DateTime, Utc};
use glide_domain::constants::{
    OAUTH_CLIENT_ID, OAUTH_CLIENT_SECRET, OAUTH_SCOPES, TOKEN_EXPIRY_MARGIN_SECS, TOKEN_PATH,
};
use serde::{Deserialize, Serialize};

/// Bearer credential returned by the identity provider.
///
/// Tokens are replaced on refresh, never mutated, and shared as
/// `Arc<AccessToken>` between concurrent requests.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,

    /// Token type (always "Bearer" for Concourse)
    pub token_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// Absolute expiration timestamp; `None` means the token does not expire
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    /// Create a token whose expiry is `expires_in` seconds from now.
    ///
    /// A non-positive `expires_in` yields a token without expiry.
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires_in: i64) -> Self {
        let expires_at =
            (expires_in > 0).then(|| Utc::now() + chrono::Duration::seconds(expires_in));
        Self::with_expiry(access_token, expires_at)
    }

    #[must_use]
    pub fn with_expiry(access_token: impl Into<String>, expires_at: Option<DateTime<Utc>>) -> Self {
        Self {
            access_token: access_token.into(),
            token_type: "Bearer".to_string(),
            refresh_token: None,
            expires_at,
        }
    }

    /// A token is valid while it is non-empty and more than
    /// [`TOKEN_EXPIRY_MARGIN_SECS`] away from expiring.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.access_token.is_empty() {
            return false;
        }
        match self.expires_at {
            Some(expires_at) => {
                Utc::now() + chrono::Duration::seconds(TOKEN_EXPIRY_MARGIN_SECS) < expires_at
            }
            None => true,
        }
    }

    #[must_use]
    pub fn seconds_until_expiry(&self) -> Option<i64> {
        self.expires_at.map(|expires_at| (expires_at - Utc::now()).num_seconds())
    }

    /// Value for the `Authorization` header.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Token endpoint response (RFC 6749 §5.1).
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl From<TokenResponse> for AccessToken {
    fn from(response: TokenResponse) -> Self {
        let mut token = Self::new(response.access_token, response.expires_in.unwrap_or(0));
        if let Some(token_type) = response.token_type.filter(|t| !t.is_empty()) {
            token.token_type = token_type;
        }
        token.refresh_token = response.refresh_token;
        token
    }
}

/// Error body returned by the token endpoint (RFC 6749 §5.2).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error_description {
            Some(description) => write!(f, "{}: {}", self.error, description),
            None => write!(f, "{}", self.error),
        }
    }
}

/// Identity provider settings for the password grant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordGrantConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub scopes: Vec<String>,
}

impl PasswordGrantConfig {
    /// Configuration used by the `fly` CLI against the given Concourse URL.
    #[must_use]
    pub fn for_service(base_url: &str) -> Self {
        Self {
            token_url: format!("{}{}", base_url.trim_end_matches('/'), TOKEN_PATH),
            client_id: OAUTH_CLIENT_ID.to_string(),
            client_secret: OAUTH_CLIENT_SECRET.to_string(),
            scopes: OAUTH_SCOPES.iter().map(ToString::to_string).collect(),
        }
    }

    /// Scopes joined with spaces, as sent in the `scope` form field.
    #[must_use]
    pub fn scope_string(&self) -> String {
        self.scopes.join(" ")
    }
}
