//! OAuth 2.0 password grant client
//!
//! Exchanges a username and password for an access token at the Concourse
//! identity provider (`/sky/issuer/token`). Client credentials are sent with
//! HTTP basic auth; the resource owner credentials and scopes go in the form
//! body.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::traits::TokenExchange;
use super::types::{AccessToken, OAuthError, PasswordGrantConfig, TokenResponse};

/// Error type for password grant operations
#[derive(Debug)]
pub enum GrantError {
    /// HTTP request failed before a response arrived
    RequestFailed(reqwest::Error),

    /// The identity provider answered with a non-2xx status
    Rejected { status: u16, error: Option<OAuthError>, body: String },

    /// Failed to parse the token response
    ParseError(String),

    /// The response parsed but carried no access token
    MissingAccessToken,
}

impl std::fmt::Display for GrantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RequestFailed(e) => write!(f, "token request failed: {e}"),
            Self::Rejected { status, error: Some(error), .. } => {
                write!(f, "password grant rejected ({status}): {error}")
            }
            Self::Rejected { status, body, .. } => {
                write!(f, "password grant rejected ({status}): {body}")
            }
            Self::ParseError(msg) => write!(f, "token response parse error: {msg}"),
            Self::MissingAccessToken => write!(f, "token response missing access_token"),
        }
    }
}

impl std::error::Error for GrantError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RequestFailed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for GrantError {
    fn from(err: reqwest::Error) -> Self {
        Self::RequestFailed(err)
    }
}

/// Password grant client for one identity provider.
#[derive(Debug, Clone)]
pub struct PasswordGrantClient {
    config: PasswordGrantConfig,
    client: Client,
}

impl PasswordGrantClient {
    /// Create a client that sends token requests through `client`.
    ///
    /// # Examples
    /// ```
    /// use glide_common::auth::{PasswordGrantClient, PasswordGrantConfig};
    ///
    /// let config = PasswordGrantConfig::for_service("https://ci.example.com");
    /// let client = PasswordGrantClient::new(config, reqwest::Client::new());
    /// assert_eq!(client.config().client_id, "fly");
    /// ```
    #[must_use]
    pub fn new(config: PasswordGrantConfig, client: Client) -> Self {
        Self { config, client }
    }

    /// Exchange resource owner credentials for an access token.
    ///
    /// # Errors
    /// Returns error if:
    /// - The request cannot be sent
    /// - The provider rejects the credentials
    /// - The response cannot be parsed or lacks an access token
    pub async fn password_grant(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccessToken, GrantError> {
        let params = [
            ("grant_type", "password"),
            ("username", username),
            ("password", password),
            ("scope", &self.config.scope_string()),
        ];

        debug!(token_url = %self.config.token_url, username, "requesting password grant");

        let response = self
            .client
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = serde_json::from_str::<OAuthError>(&body).ok();
            warn!(status = status.as_u16(), error = ?error, "password grant rejected");
            return Err(GrantError::Rejected { status: status.as_u16(), error, body });
        }

        let body = response.text().await?;
        let token_response: TokenResponse =
            serde_json::from_str(&body).map_err(|e| GrantError::ParseError(e.to_string()))?;

        if token_response.access_token.is_empty() {
            return Err(GrantError::MissingAccessToken);
        }

        Ok(token_response.into())
    }

    #[must_use]
    pub fn config(&self) -> &PasswordGrantConfig {
        &self.config
    }
}

#[async_trait]
impl TokenExchange for PasswordGrantClient {
    async fn exchange(&self, username: &str, password: &str) -> Result<AccessToken, GrantError> {
        self.password_grant(username, password).await
    }
}
