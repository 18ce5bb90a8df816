//! Connection settings

use serde::{Deserialize, Serialize};

/// Where and as whom the client connects.
///
/// Fields left as `None` may be filled from the process environment the
/// first time the client issues a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    /// Base URL of the Concourse web node, e.g. `https://ci.example.com`
    pub url: Option<String>,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl ConnectionSettings {
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: Some(url.into()),
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    /// Base URL without a trailing slash, or an empty string when unset.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.url.as_deref().unwrap_or_default().trim_end_matches('/')
    }

    #[must_use]
    pub fn username(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_deref().unwrap_or_default()
    }
}
