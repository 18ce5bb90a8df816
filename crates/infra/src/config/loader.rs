//! Connection settings loader
//!
//! Fills connection fields the caller left unset from the process
//! environment.
//!
//! ## Environment Variables
//! - `CONCOURSE_URL`: Base URL of the Concourse web node
//! - `CONCOURSE_USERNAME`: Username for the password grant
//! - `CONCOURSE_PASSWORD`: Password for the password grant
//!
//! Explicitly set fields always win. Empty fields and empty variables are
//! treated as unset.

use glide_domain::constants::{ENV_PASSWORD, ENV_URL, ENV_USERNAME};
use glide_domain::ConnectionSettings;

/// Source of environment variables.
///
/// [`ProcessEnv`] reads the real process environment; tests supply their
/// own map.
pub trait EnvSource: Send + Sync {
    /// Value of `key`, or `None` when unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Return `settings` with every unset field filled from `env`.
///
/// A field is unset when it is `None` or empty. Each variable is read only
/// when its field is unset.
pub fn fill_from_env(settings: &ConnectionSettings, env: &dyn EnvSource) -> ConnectionSettings {
    let lookup = |key: &str| env.var(key).filter(|value| !value.is_empty());
    let explicit = |field: &Option<String>| field.clone().filter(|value| !value.is_empty());

    let filled = ConnectionSettings {
        url: explicit(&settings.url).or_else(|| lookup(ENV_URL)),
        username: explicit(&settings.username).or_else(|| lookup(ENV_USERNAME)),
        password: explicit(&settings.password).or_else(|| lookup(ENV_PASSWORD)),
    };

    if filled.url.is_none() {
        tracing::warn!(var = ENV_URL, "no service URL configured");
    }
    tracing::debug!(url = %filled.base_url(), username = %filled.username(), "connection settings resolved");

    filled
}
