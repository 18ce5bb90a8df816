use std::sync::Arc;
use std::time::Duration;

use glide_common::auth::{AccessToken, TokenSource};
use glide_domain::Result;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Client as ReqwestClient, Request, RequestBuilder, Response};
use tracing::debug;

use crate::errors::InfraError;

/// Transport that attaches a bearer token to every outbound request.
///
/// The token comes from a [`TokenSource`], which refreshes it on demand.
#[derive(Clone)]
pub struct AuthenticatedTransport {
    client: ReqwestClient,
    tokens: Arc<dyn TokenSource>,
}

impl AuthenticatedTransport {
    pub fn new(client: ReqwestClient, tokens: Arc<dyn TokenSource>) -> Self {
        Self { client, tokens }
    }

    /// Current valid token, refreshed if needed.
    pub async fn token(&self) -> Result<Arc<AccessToken>> {
        Ok(self.tokens.token().await.map_err(InfraError::from)?)
    }

    /// Attach the bearer token to a request that will be executed elsewhere.
    pub async fn authorize(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.token().await?;
        Ok(builder.bearer_auth(&token.access_token))
    }

    /// Execute `request` with the bearer token attached.
    pub async fn send(&self, mut request: Request) -> Result<Response> {
        let token = self.token().await?;
        let value = HeaderValue::from_str(&token.authorization_header()).map_err(|err| {
            glide_domain::GlideError::Auth(format!("token is not a valid header value: {err}"))
        })?;
        request.headers_mut().insert(AUTHORIZATION, value);

        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "sending HTTP request");

        match self.client.execute(request).await {
            Ok(response) => {
                debug!(%method, %url, status = %response.status(), "received HTTP response");
                Ok(response)
            }
            Err(err) => {
                debug!(%method, %url, error = %err, "HTTP request failed");
                Err(InfraError::from(err).into())
            }
        }
    }

    /// The wrapped client, without token injection.
    pub fn client(&self) -> &ReqwestClient {
        &self.client
    }
}

impl std::fmt::Debug for AuthenticatedTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticatedTransport").finish_non_exhaustive()
    }
}

/// Builder for the base HTTP client.
///
/// No total request timeout is set by default, since event streams stay
/// open for the whole build.
#[derive(Debug)]
pub struct HttpClientBuilder {
    connect_timeout: Duration,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    default_headers: Option<reqwest::header::HeaderMap>,
    no_proxy: bool,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            timeout: None,
            user_agent: Some(concat!("glide/", env!("CARGO_PKG_VERSION")).to_string()),
            default_headers: None,
            no_proxy: false,
        }
    }
}

impl HttpClientBuilder {
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Total request timeout. Applies to event streams as well.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    pub fn default_headers(mut self, headers: reqwest::header::HeaderMap) -> Self {
        self.default_headers = Some(headers);
        self
    }

    /// Ignore system proxy settings.
    pub fn no_proxy(mut self) -> Self {
        self.no_proxy = true;
        self
    }

    pub fn build(self) -> Result<ReqwestClient> {
        let mut builder = ReqwestClient::builder().connect_timeout(self.connect_timeout);

        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }

        if let Some(headers) = self.default_headers {
            builder = builder.default_headers(headers);
        }

        if self.no_proxy {
            builder = builder.no_proxy();
        }

        Ok(builder.build().map_err(InfraError::from)?)
    }
}
