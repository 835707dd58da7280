//! Bounded-retry decoration for the classification client.
//!
//! The client itself makes exactly one attempt per call; callers that want
//! resilience wrap it here instead of the client growing retry logic.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::classify::{ClassificationResult, ClassifierClient};
use crate::error::{Result, ShapeError};
use crate::normalize::NormalizedFace;

/// Bounded attempts with exponential backoff between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Must be at least 1.
    pub max_attempts: u32,
    /// Sleep before the second attempt; doubles for each attempt after that.
    pub initial_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(ShapeError::InvalidConfig("max_attempts must be >= 1".into()));
        }
        Ok(())
    }

    /// Backoff slept after attempt number `attempt` (1-based) fails.
    fn backoff_after(&self, attempt: u32) -> Duration {
        self.initial_backoff * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    /// Run `op` up to `max_attempts` times.
    ///
    /// Only transient errors (see [`ShapeError::is_transient`]) are retried;
    /// successes and deterministic failures return immediately.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.validate()?;

        let mut attempt = 1;
        loop {
            match op().await {
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    let delay = self.backoff_after(attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "classification attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

/// A [`ClassifierClient`] decorated with a [`RetryPolicy`].
pub struct RetryingClassifier {
    inner: ClassifierClient,
    policy: RetryPolicy,
}

impl RetryingClassifier {
    pub fn new(inner: ClassifierClient, policy: RetryPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self { inner, policy })
    }

    /// Submit `face`, retrying transient failures per the policy.
    pub async fn classify(&self, face: &NormalizedFace) -> Result<ClassificationResult> {
        self.policy.run(|| self.inner.classify(face)).await
    }
}
