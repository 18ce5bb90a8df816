//! Mock implementations of the auth traits
//!
//! Provides mock objects for testing purposes.

// Allow missing error/panic docs for test mocks - they are designed to be simple
// and errors are clearly indicated by their return types
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::auth::{AccessToken, GrantError, OAuthError, TokenExchange};

type CredentialLog = Arc<Mutex<Vec<(String, String)>>>;

/// Mock token exchange for testing
///
/// Issues `token-1`, `token-2`, ... with a fixed lifetime and records the
/// credentials it was called with.
#[derive(Debug, Clone)]
pub struct MockTokenExchange {
    lifetime_secs: i64,
    calls: Arc<AtomicU64>,
    should_fail: Arc<AtomicBool>,
    credentials: CredentialLog,
}

impl MockTokenExchange {
    /// Create a mock whose tokens expire `lifetime_secs` after issue.
    ///
    /// A non-positive lifetime issues tokens without expiry.
    pub fn new(lifetime_secs: i64) -> Self {
        Self {
            lifetime_secs,
            calls: Arc::new(AtomicU64::new(0)),
            should_fail: Arc::new(AtomicBool::new(false)),
            credentials: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Force subsequent exchanges to fail with a 401 rejection.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.should_fail.store(should_fail, Ordering::SeqCst);
    }

    /// Number of exchange attempts, successful or not.
    #[must_use]
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Credentials passed to each exchange, in call order.
    #[must_use]
    pub fn credentials(&self) -> Vec<(String, String)> {
        self.credentials.lock().unwrap().clone()
    }
}

impl Default for MockTokenExchange {
    fn default() -> Self {
        Self::new(3600)
    }
}

#[async_trait]
impl TokenExchange for MockTokenExchange {
    async fn exchange(&self, username: &str, password: &str) -> Result<AccessToken, GrantError> {
        // SAFETY: Mutex poisoning is acceptable in test mocks
        self.credentials.lock().unwrap().push((username.to_string(), password.to_string()));

        if self.should_fail.load(Ordering::SeqCst) {
            self.calls.fetch_add(1, Ordering::SeqCst);
            return Err(GrantError::Rejected {
                status: 401,
                error: Some(OAuthError {
                    error: "invalid_grant".to_string(),
                    error_description: None,
                }),
                body: String::new(),
            });
        }

        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AccessToken::new(format!("token-{n}"), self.lifetime_secs))
    }
}
