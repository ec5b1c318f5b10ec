use std::time::{Duration, Instant};

use tracing::{Level, event};
use uuid::Uuid;

use crate::errors::AuthError;

/// One token refresh as seen in the logs.
///
/// Each attempt gets its own id so the start and outcome lines of a refresh
/// can be paired. Token values are never emitted.
#[derive(Debug)]
pub struct RefreshAttempt<'a> {
    attempt_id: Uuid,
    context: &'a str,
    started: Instant,
}

impl<'a> RefreshAttempt<'a> {
    /// Opens an attempt under `context` and logs `refresh.start`.
    pub fn begin(context: &'a str) -> Self {
        let attempt = Self {
            attempt_id: Uuid::new_v4(),
            context,
            started: Instant::now(),
        };
        event!(
            Level::INFO,
            attempt_id = %attempt.attempt_id,
            context = %attempt.context,
            "refresh.start"
        );
        attempt
    }

    pub fn attempt_id(&self) -> Uuid {
        self.attempt_id
    }

    pub fn context(&self) -> &str {
        self.context
    }

    pub fn succeeded(&self, lifetime: Duration) {
        event!(
            Level::INFO,
            attempt_id = %self.attempt_id,
            context = %self.context,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            lifetime_secs = lifetime.as_secs(),
            "refresh.success"
        );
    }

    pub fn failed(&self, error: &AuthError) {
        event!(
            Level::ERROR,
            attempt_id = %self.attempt_id,
            context = %self.context,
            elapsed_ms = self.started.elapsed().as_millis() as u64,
            error = %error,
            "refresh.failure"
        );
    }
}
