use std::time::SystemTime;

use tokio::sync::Mutex;
use tracing::debug;

use crate::errors::AuthError;
use crate::telemetry::refresh::RefreshAttempt;

use super::{CachedToken, IssuedToken, TokenSnapshot};

/// Lock-guarded access token shared by every request a client makes.
///
/// The lock is held across the refresh call so concurrent callers queue behind
/// a single authentication request and pick up its result.
#[derive(Debug)]
pub struct TokenCache {
    state: Mutex<CachedToken>,
    context: String,
}

impl TokenCache {
    /// `context` tags the refresh events this cache logs.
    pub fn new(context: impl Into<String>) -> Self {
        Self {
            state: Mutex::new(CachedToken::empty()),
            context: context.into(),
        }
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    /// Returns a token valid right now, calling `refresh` only when the cached one is
    /// missing or expired. A failed refresh leaves the cached state untouched.
    pub async fn obtain_token<F, Fut>(&self, refresh: F) -> Result<String, AuthError>
    where
        F: FnOnce() -> Fut + Send,
        Fut: std::future::Future<Output = Result<IssuedToken, AuthError>> + Send,
    {
        let mut state = self.state.lock().await;
        if let Some(token) = state.valid_at(SystemTime::now()) {
            return Ok(token.to_string());
        }

        debug!(cached = !state.is_empty(), "access token missing or expired");
        let attempt = RefreshAttempt::begin(&self.context);
        let stored = match refresh().await {
            Ok(issued) => {
                let lifetime = issued.expires_in;
                state
                    .replace(issued, SystemTime::now())
                    .map(|token| (token.to_string(), lifetime))
            }
            Err(err) => Err(err),
        };
        match stored {
            Ok((token, lifetime)) => {
                attempt.succeeded(lifetime);
                Ok(token)
            }
            Err(err) => {
                attempt.failed(&err);
                Err(err)
            }
        }
    }

    /// Drops the cached token so the next `obtain_token` refreshes.
    pub async fn invalidate(&self) {
        self.state.lock().await.clear();
    }

    pub async fn snapshot(&self) -> Option<TokenSnapshot> {
        self.state.lock().await.to_snapshot()
    }
}
