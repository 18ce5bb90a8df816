//! Conversions from external infrastructure errors into domain errors.

use glide_common::auth::GrantError;
use glide_domain::{GlideError, HttpError};
use reqwest::Error as ReqwestError;
use reqwest_eventsource::{CannotCloneRequestError, Error as EventSourceError};

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub GlideError);

impl From<InfraError> for GlideError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<GlideError> for InfraError {
    fn from(value: GlideError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoGlideError {
    fn into_glide(self) -> GlideError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → GlideError */
/* -------------------------------------------------------------------------- */

impl IntoGlideError for ReqwestError {
    fn into_glide(self) -> GlideError {
        if self.is_builder() {
            return GlideError::Config(format!("invalid request: {self}"));
        }

        if self.is_timeout() {
            return GlideError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return GlideError::Network(format!("HTTP connection failure: {self}"));
        }

        // Only produced by `error_for_status`; the body is already gone
        if let Some(status) = self.status() {
            return GlideError::Http(HttpError::new(status.as_u16(), Vec::new()));
        }

        GlideError::Network(self.to_string())
    }
}

impl From<ReqwestError> for InfraError {
    fn from(value: ReqwestError) -> Self {
        InfraError(value.into_glide())
    }
}

/* -------------------------------------------------------------------------- */
/* GrantError → GlideError */
/* -------------------------------------------------------------------------- */

impl IntoGlideError for GrantError {
    fn into_glide(self) -> GlideError {
        match self {
            GrantError::RequestFailed(err) => {
                GlideError::Network(format!("token request failed: {err}"))
            }
            other => GlideError::Auth(other.to_string()),
        }
    }
}

impl From<GrantError> for InfraError {
    fn from(value: GrantError) -> Self {
        InfraError(value.into_glide())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest_eventsource errors → GlideError */
/* -------------------------------------------------------------------------- */

impl IntoGlideError for EventSourceError {
    fn into_glide(self) -> GlideError {
        match self {
            EventSourceError::InvalidStatusCode(status, _) => {
                GlideError::Http(HttpError::new(status.as_u16(), Vec::new()))
            }
            EventSourceError::Transport(err) => err.into_glide(),
            other => GlideError::Network(format!("event stream failed: {other}")),
        }
    }
}

impl From<EventSourceError> for InfraError {
    fn from(value: EventSourceError) -> Self {
        InfraError(value.into_glide())
    }
}

impl From<CannotCloneRequestError> for InfraError {
    fn from(value: CannotCloneRequestError) -> Self {
        InfraError(GlideError::Config(format!("event stream request: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → GlideError */
/* -------------------------------------------------------------------------- */

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(GlideError::Decode(value.to_string()))
    }
}

/* -------------------------------------------------------------------------- */
/* url::ParseError → GlideError */
/* -------------------------------------------------------------------------- */

impl From<url::ParseError> for InfraError {
    fn from(value: url::ParseError) -> Self {
        InfraError(GlideError::Config(format!("invalid service URL: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
