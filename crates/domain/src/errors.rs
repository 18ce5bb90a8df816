//! Error types used throughout the client

use std::fmt;

use thiserror::Error;

/// Main error type for Glide
#[derive(Error, Debug)]
pub enum GlideError {
    /// The request could not be built (missing or malformed URL, client
    /// construction failure).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The transport failed before a complete response was available.
    #[error("Network error: {0}")]
    Network(String),

    /// The identity provider rejected the password grant.
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error(transparent)]
    Http(#[from] HttpError),

    /// A 200 response carried a body that is not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl GlideError {
    /// Stable label for structured logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Network(_) => "network",
            Self::Auth(_) => "auth",
            Self::Http(_) => "http",
            Self::Decode(_) => "decode",
        }
    }

    /// The HTTP status when this is a non-2xx response error.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http(err) => Some(err.status),
            _ => None,
        }
    }
}

/// A non-2xx response from a resource or event-stream endpoint.
///
/// The body is kept exactly as received, even when empty or not UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpError {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpError {
    #[must_use]
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, body: body.into() }
    }

    /// Body decoded lossily as UTF-8.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http error: {}: {}", self.status, self.body_text())
    }
}

impl std::error::Error for HttpError {}

/// Result type alias for Glide operations
pub type Result<T> = std::result::Result<T, GlideError>;
