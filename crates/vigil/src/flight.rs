//! Bookkeeping for a submission that has been handed to a submitter
//!
//! The controller keeps a [`Flight`]; the pending value returned to the
//! caller keeps the matching [`FlightHandle`]. If the handle is dropped
//! before the submitter finishes (the caller dropped the pending value or
//! cancelled the future awaiting it), the flight is marked abandoned and
//! the controller may start a new submission.

use serde_json::Value;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::simulator::Receipt;

const RUNNING: u8 = 0;
const COMPLETED: u8 = 1;
const ABANDONED: u8 = 2;

/// Payload key carrying the submission token
const SUBMISSION_ID: &str = "submission_id";

/// Controller-side record of an outstanding submission
#[derive(Debug)]
pub(crate) struct Flight {
    id: String,
    status: Arc<AtomicU8>,
}

/// Caller-side half of a [`Flight`]
#[derive(Debug)]
pub(crate) struct FlightHandle {
    status: Arc<AtomicU8>,
}

impl Flight {
    pub(crate) fn start(id: String) -> (Self, FlightHandle) {
        let status = Arc::new(AtomicU8::new(RUNNING));
        let handle = FlightHandle {
            status: Arc::clone(&status),
        };
        (Self { id, status }, handle)
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn is_abandoned(&self) -> bool {
        self.status.load(Ordering::SeqCst) == ABANDONED
    }

    /// Whether the receipt was produced by this submission
    pub(crate) fn issued(&self, receipt: &Receipt) -> bool {
        receipt.payload.get(SUBMISSION_ID).and_then(Value::as_str) == Some(self.id.as_str())
    }
}

impl FlightHandle {
    /// The submitter returned a receipt
    pub(crate) fn complete(&self) {
        let _ = self
            .status
            .compare_exchange(RUNNING, COMPLETED, Ordering::SeqCst, Ordering::SeqCst);
    }
}

impl Drop for FlightHandle {
    fn drop(&mut self) {
        let _ = self
            .status
            .compare_exchange(RUNNING, ABANDONED, Ordering::SeqCst, Ordering::SeqCst);
    }
}
