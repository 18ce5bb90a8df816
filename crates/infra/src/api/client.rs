//! Concourse API client
//!
//! Owns the connection settings and two run-once cells: the settings after
//! environment fill-in, and the authenticating transport built from them.
//! Both are initialised by the first caller that needs them, exactly once,
//! even when many requests start concurrently.

use std::sync::Arc;

use glide_common::auth::{AccessToken, PasswordGrantClient, PasswordGrantConfig, TokenCache};
use glide_domain::constants::API_PREFIX;
use glide_domain::{ConnectionSettings, Result};
use once_cell::sync::OnceCell;
use reqwest::{Method, Request, Response};
use tracing::{debug, info, instrument};
use url::Url;

use crate::config::{fill_from_env, EnvSource, ProcessEnv};
use crate::errors::InfraError;
use crate::http::{AuthenticatedTransport, HttpClientBuilder};

/// Client for the Concourse HTTP API.
///
/// Cheap to share: wrap it in an `Arc` or pass `&ConcourseClient` to
/// concurrent tasks.
pub struct ConcourseClient {
    settings: ConnectionSettings,
    http: reqwest::Client,
    env: Arc<dyn EnvSource>,
    resolved: OnceCell<ConnectionSettings>,
    transport: OnceCell<AuthenticatedTransport>,
}

impl ConcourseClient {
    /// Create a client for explicit settings. Unset or empty fields are read
    /// from the environment on first use.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(settings: ConnectionSettings) -> Result<Self> {
        Self::builder().settings(settings).build()
    }

    /// Create a client configured entirely from `CONCOURSE_*` variables.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for fluent configuration
    pub fn builder() -> ConcourseClientBuilder {
        ConcourseClientBuilder::default()
    }

    /// Settings after environment fill-in. The environment is consulted
    /// once per client.
    pub fn settings(&self) -> &ConnectionSettings {
        self.resolved.get_or_init(|| {
            debug!("resolving connection settings");
            fill_from_env(&self.settings, self.env.as_ref())
        })
    }

    /// Full URL for an API resource: `{url}/api/v1/{segments}`.
    ///
    /// Segments are joined and cleaned like a path: empty and `.` segments
    /// are dropped and `..` removes the previous one. Performs no I/O.
    ///
    /// # Examples
    /// ```
    /// use glide_domain::ConnectionSettings;
    /// use glide_infra::api::ConcourseClient;
    ///
    /// let settings = ConnectionSettings::new("https://ci.example.com/", "admin", "secret");
    /// let client = ConcourseClient::new(settings).unwrap();
    /// assert_eq!(
    ///     client.api_path(&["teams", "main", "pipelines"]),
    ///     "https://ci.example.com/api/v1/teams/main/pipelines"
    /// );
    /// ```
    pub fn api_path(&self, segments: &[&str]) -> String {
        let mut all: Vec<&str> = API_PREFIX.to_vec();
        all.extend_from_slice(segments);
        let path = clean_path(&all);
        format!("{}/{}", self.settings().base_url(), path)
    }

    /// The authenticating transport, built on first use.
    pub fn transport(&self) -> &AuthenticatedTransport {
        self.transport.get_or_init(|| {
            let settings = self.settings();
            let grant = PasswordGrantClient::new(
                PasswordGrantConfig::for_service(settings.base_url()),
                self.http.clone(),
            );
            let tokens = TokenCache::new(grant, settings.username(), settings.password());

            info!(
                url = %settings.base_url(),
                username = %settings.username(),
                "API transport initialised"
            );
            AuthenticatedTransport::new(self.http.clone(), Arc::new(tokens))
        })
    }

    /// Send a request with a valid bearer token attached.
    ///
    /// # Errors
    ///
    /// Returns error if a token cannot be obtained or the transport fails.
    /// Non-2xx responses are returned as `Ok`.
    pub async fn dispatch(&self, request: Request) -> Result<Response> {
        self.transport().send(request).await
    }

    /// Current valid access token, exchanging credentials if needed.
    ///
    /// # Errors
    ///
    /// Returns error if the password grant fails
    #[instrument(skip(self))]
    pub async fn token(&self) -> Result<Arc<AccessToken>> {
        self.transport().token().await
    }

    /// Authenticated GET against an API resource.
    pub(crate) async fn get(&self, segments: &[&str]) -> Result<Response> {
        let url = self.api_url(segments)?;
        debug!(%url, "GET request");
        let request = Request::new(Method::GET, url);
        self.dispatch(request).await
    }

    pub(crate) fn api_url(&self, segments: &[&str]) -> Result<Url> {
        Ok(Url::parse(&self.api_path(segments)).map_err(InfraError::from)?)
    }
}

impl std::fmt::Debug for ConcourseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcourseClient")
            .field("url", &self.settings.url)
            .field("username", &self.settings.username)
            .field("initialised", &self.transport.get().is_some())
            .finish_non_exhaustive()
    }
}

/// Join path segments, dropping empty and `.` segments and resolving `..`.
fn clean_path(segments: &[&str]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in segments.iter().flat_map(|segment| segment.split('/')) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }
    parts.join("/")
}

/// Builder for [`ConcourseClient`].
#[derive(Default)]
pub struct ConcourseClientBuilder {
    settings: ConnectionSettings,
    http: Option<reqwest::Client>,
    env: Option<Arc<dyn EnvSource>>,
}

impl ConcourseClientBuilder {
    pub fn settings(mut self, settings: ConnectionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.settings.url = Some(url.into());
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.settings.username = Some(username.into());
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.settings.password = Some(password.into());
        self
    }

    /// Base client used for the password grant and all API requests.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Environment consulted for unset fields. Defaults to [`ProcessEnv`].
    pub fn env_source(mut self, env: Arc<dyn EnvSource>) -> Self {
        self.env = Some(env);
        self
    }

    /// # Errors
    ///
    /// Returns error if no HTTP client was supplied and the default one
    /// cannot be built
    pub fn build(self) -> Result<ConcourseClient> {
        let http = match self.http {
            Some(client) => client,
            None => HttpClientBuilder::default().build()?,
        };

        Ok(ConcourseClient {
            settings: self.settings,
            http,
            env: self.env.unwrap_or_else(|| Arc::new(ProcessEnv)),
            resolved: OnceCell::new(),
            transport: OnceCell::new(),
        })
    }
}
