//! Simulated backend calls
//!
//! There is no real backend: every submission resolves successfully after
//! a fixed, per-operation delay. The [`Submitter`] trait is the seam that
//! lets callers swap the delayed simulator for an instant or counting one.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::identity::{Clock, IdSource, SystemClock, UuidIds};

/// Latency of a simulated login
pub const LOGIN_DELAY: Duration = Duration::from_millis(1500);

/// Latency of a simulated registration
pub const REGISTER_DELAY: Duration = Duration::from_millis(2000);

/// Latency of a simulated comment post
pub const COMMENT_POST_DELAY: Duration = Duration::from_millis(1000);

/// A kind of backend call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Login,
    Register,
    PostComment,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Login => write!(f, "login"),
            Operation::Register => write!(f, "register"),
            Operation::PostComment => write!(f, "post_comment"),
        }
    }
}

/// Delay applied to each operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionDelays {
    pub login: Duration,
    pub register: Duration,
    pub post_comment: Duration,
}

impl SubmissionDelays {
    /// Resolve every operation immediately
    pub fn zero() -> Self {
        Self {
            login: Duration::ZERO,
            register: Duration::ZERO,
            post_comment: Duration::ZERO,
        }
    }

    pub fn for_operation(&self, operation: Operation) -> Duration {
        match operation {
            Operation::Login => self.login,
            Operation::Register => self.register,
            Operation::PostComment => self.post_comment,
        }
    }
}

impl Default for SubmissionDelays {
    fn default() -> Self {
        Self {
            login: LOGIN_DELAY,
            register: REGISTER_DELAY,
            post_comment: COMMENT_POST_DELAY,
        }
    }
}

/// Proof that a submission completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: String,
    pub operation: Operation,
    pub payload: serde_json::Value,
    pub completed_at: DateTime<Utc>,
}

/// Something that accepts submissions
///
/// Implementations never fail; a submission that starts always produces a
/// [`Receipt`].
#[async_trait]
pub trait Submitter: Send + Sync {
    async fn submit(&self, operation: Operation, payload: serde_json::Value) -> Receipt;

    /// Submitter name, for logging
    fn name(&self) -> &'static str;
}

/// Delayed, always-successful stand-in for the backend
#[derive(Clone)]
pub struct SubmissionSimulator {
    delays: SubmissionDelays,
    ids: Arc<dyn IdSource>,
    clock: Arc<dyn Clock>,
}

impl SubmissionSimulator {
    /// Simulator using the named per-operation delays
    pub fn new() -> Self {
        Self::with_delays(SubmissionDelays::default())
    }

    pub fn with_delays(delays: SubmissionDelays) -> Self {
        Self {
            delays,
            ids: Arc::new(UuidIds),
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the token generator used for receipt ids
    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn delays(&self) -> SubmissionDelays {
        self.delays
    }
}

impl Default for SubmissionSimulator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Submitter for SubmissionSimulator {
    async fn submit(&self, operation: Operation, payload: serde_json::Value) -> Receipt {
        let delay = self.delays.for_operation(operation);
        tracing::debug!(%operation, delay_ms = delay.as_millis() as u64, "simulating submission");

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let receipt = Receipt {
            id: self.ids.next_id(),
            operation,
            payload,
            completed_at: self.clock.now(),
        };
        tracing::info!(%operation, receipt = %receipt.id, "submission completed");
        receipt
    }

    fn name(&self) -> &'static str {
        "simulator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::SequentialIds;
    use serde_json::json;
    use std::time::Instant;

    #[test]
    fn test_named_delays() {
        let delays = SubmissionDelays::default();
        assert_eq!(delays.for_operation(Operation::Login), Duration::from_millis(1500));
        assert_eq!(delays.for_operation(Operation::Register), Duration::from_millis(2000));
        assert_eq!(delays.for_operation(Operation::PostComment), Duration::from_millis(1000));
    }

    #[tokio::test]
    async fn test_zero_delay_resolves_with_payload() {
        let simulator = SubmissionSimulator::with_delays(SubmissionDelays::zero())
            .with_ids(Arc::new(SequentialIds::new("receipt")));

        let receipt = simulator
            .submit(Operation::Login, json!({"email": "jane@example.com"}))
            .await;

        assert_eq!(receipt.id, "receipt-1");
        assert_eq!(receipt.operation, Operation::Login);
        assert_eq!(receipt.payload["email"], "jane@example.com");
    }

    #[tokio::test]
    async fn test_delay_is_applied() {
        let delays = SubmissionDelays {
            post_comment: Duration::from_millis(30),
            ..SubmissionDelays::zero()
        };
        let simulator = SubmissionSimulator::with_delays(delays);

        let started = Instant::now();
        simulator.submit(Operation::PostComment, json!({})).await;
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
