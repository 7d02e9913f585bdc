//! Login and registration form controller
//!
//! A controller owns one form's values, its per-field errors and the
//! `submitting` flag. It moves through a small state machine:
//!
//! ```text
//! Idle --submit(valid)--> Submitting --resolve--> Idle (cleared)
//! Idle --submit(invalid)--> Idle (with errors)
//! ```
//!
//! `submit` is inert while a submission is outstanding. Dropping the
//! [`PendingSubmission`] before it resolves (or cancelling the future that
//! awaits it) returns the form to idle with its values intact.

use serde_json::{json, Map, Value};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use vigil_validation::{validate_form, Field, FieldError, FieldValues, FormMode, ValidationErrors};

use crate::error::FormError;
use crate::flight::{Flight, FlightHandle};
use crate::identity::{IdSource, UuidIds};
use crate::notify::{Notification, NotificationSink};
use crate::simulator::{Operation, Receipt, Submitter};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

const REDACTED: &str = "[redacted]";

/// Live state of one form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub values: FieldValues,
    pub errors: ValidationErrors,
    /// Never true while `errors` is non-empty. Refreshed on every call
    /// that changes the controller; use [`FormController::is_submitting`]
    /// for the live value.
    pub submitting: bool,
}

/// A submission that has been handed to the submitter
pub struct PendingSubmission {
    id: String,
    operation: Operation,
    future: BoxFuture<'static, Receipt>,
    handle: FlightHandle,
}

impl PendingSubmission {
    /// Token identifying this submission in the payload
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Wait for the submitter to resolve
    pub async fn wait(mut self) -> Receipt {
        let receipt = (&mut self.future).await;
        self.handle.complete();
        receipt
    }
}

impl std::fmt::Debug for PendingSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSubmission")
            .field("id", &self.id)
            .field("operation", &self.operation)
            .finish_non_exhaustive()
    }
}

/// Result of calling [`FormController::submit`]
#[derive(Debug)]
pub enum SubmitAttempt {
    /// Validation passed and the submitter was invoked
    Started(PendingSubmission),
    /// Validation failed; nothing was submitted
    Rejected(ValidationErrors),
    /// A submission is already outstanding
    Busy,
}

/// Result of [`FormController::submit_and_wait`]
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Completed(Receipt),
    Rejected(ValidationErrors),
    Busy,
}

/// Controller for a single login or registration form
pub struct FormController {
    mode: FormMode,
    state: FormState,
    submitter: Arc<dyn Submitter>,
    sink: Arc<dyn NotificationSink>,
    ids: Arc<dyn IdSource>,
    flight: Option<Flight>,
}

impl FormController {
    pub fn new(mode: FormMode, submitter: Arc<dyn Submitter>, sink: Arc<dyn NotificationSink>) -> Self {
        Self {
            mode,
            state: FormState::default(),
            submitter,
            sink,
            ids: Arc::new(UuidIds),
            flight: None,
        }
    }

    pub fn login(submitter: Arc<dyn Submitter>, sink: Arc<dyn NotificationSink>) -> Self {
        Self::new(FormMode::Login, submitter, sink)
    }

    pub fn register(submitter: Arc<dyn Submitter>, sink: Arc<dyn NotificationSink>) -> Self {
        Self::new(FormMode::Register, submitter, sink)
    }

    /// Replace the generator of submission tokens
    pub fn with_ids(mut self, ids: Arc<dyn IdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn values(&self) -> &FieldValues {
        &self.state.values
    }

    pub fn value(&self, field: Field) -> &str {
        self.state.values.get(field)
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.state.errors
    }

    pub fn error(&self, field: Field) -> Option<&FieldError> {
        self.state.errors.get(field)
    }

    pub fn is_submitting(&self) -> bool {
        self.flight.as_ref().is_some_and(|flight| !flight.is_abandoned())
    }

    /// Whether the submit button should be enabled
    pub fn can_submit(&self) -> bool {
        !self.is_submitting()
    }

    /// Record a keystroke
    ///
    /// Overwrites the value and drops the stale error of this field only;
    /// errors on other fields stay until they change or the form is
    /// submitted again.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> Result<(), FormError> {
        if !self.mode.contains(field) {
            return Err(FormError::FieldNotInForm {
                field,
                mode: self.mode,
            });
        }

        self.settle();
        self.state.values.set(field, value);
        if self.state.errors.clear(field).is_some() {
            tracing::debug!(mode = %self.mode, %field, "cleared stale field error");
        }
        Ok(())
    }

    /// Validate every field and, if all pass, start a submission
    ///
    /// The error set is replaced wholesale by the result of validation.
    pub fn submit(&mut self) -> SubmitAttempt {
        self.settle();
        if self.flight.is_some() {
            tracing::debug!(mode = %self.mode, "submit ignored while a submission is outstanding");
            return SubmitAttempt::Busy;
        }

        let errors = validate_form(&self.state.values, self.mode);
        self.state.errors = errors.clone();

        if !errors.is_empty() {
            let invalid: Vec<Field> = errors.fields().collect();
            tracing::debug!(mode = %self.mode, fields = ?invalid, "form rejected");
            return SubmitAttempt::Rejected(errors);
        }

        let id = self.ids.next_id();
        let (flight, handle) = Flight::start(id.clone());
        self.flight = Some(flight);
        self.state.submitting = true;

        let operation = self.operation();
        let payload = self.payload(&id);
        let submitter = Arc::clone(&self.submitter);

        tracing::info!(mode = %self.mode, submission = %id, submitter = submitter.name(), "submitting form");

        let future: BoxFuture<'static, Receipt> =
            Box::pin(async move { submitter.submit(operation, payload).await });

        SubmitAttempt::Started(PendingSubmission {
            id,
            operation,
            future,
            handle,
        })
    }

    /// Finish an outstanding submission
    ///
    /// Clears every value and error and emits the success notification.
    /// Returns `false` (and changes nothing) unless the receipt belongs to
    /// the submission this form has outstanding.
    pub fn resolve(&mut self, receipt: &Receipt) -> bool {
        self.settle();
        let Some(flight) = &self.flight else {
            tracing::warn!(mode = %self.mode, receipt = %receipt.id, "resolve called with no submission outstanding");
            return false;
        };
        if receipt.operation != self.operation() {
            tracing::warn!(
                mode = %self.mode,
                operation = %receipt.operation,
                "receipt belongs to a different operation"
            );
            return false;
        }
        if !flight.issued(receipt) {
            tracing::warn!(
                mode = %self.mode,
                submission = %flight.id(),
                receipt = %receipt.id,
                "receipt belongs to a different submission"
            );
            return false;
        }

        self.flight = None;
        self.state = FormState::default();

        let notification = match self.mode {
            FormMode::Login => Notification::success(
                "Login Successful",
                "Welcome back! You have been logged in successfully.",
            ),
            FormMode::Register => Notification::success(
                "Registration Successful",
                "Your account has been created successfully!",
            ),
        };
        self.sink.notify(notification);
        true
    }

    /// Submit, wait for the submitter and resolve in one step
    pub async fn submit_and_wait(&mut self) -> SubmitOutcome {
        match self.submit() {
            SubmitAttempt::Started(pending) => {
                let receipt = pending.wait().await;
                self.resolve(&receipt);
                SubmitOutcome::Completed(receipt)
            }
            SubmitAttempt::Rejected(errors) => SubmitOutcome::Rejected(errors),
            SubmitAttempt::Busy => SubmitOutcome::Busy,
        }
    }

    /// Forget a submission whose pending value was dropped unresolved
    fn settle(&mut self) {
        if !self.flight.as_ref().is_some_and(Flight::is_abandoned) {
            return;
        }
        if let Some(flight) = self.flight.take() {
            tracing::warn!(mode = %self.mode, submission = %flight.id(), "submission dropped before it resolved");
        }
        self.state.submitting = false;
    }

    fn operation(&self) -> Operation {
        match self.mode {
            FormMode::Login => Operation::Login,
            FormMode::Register => Operation::Register,
        }
    }

    fn payload(&self, id: &str) -> Value {
        let fields: Map<String, Value> = self
            .mode
            .fields()
            .iter()
            .map(|field| {
                let value = if field.is_secret() {
                    REDACTED
                } else {
                    self.state.values.get(*field)
                };
                (field.as_str().to_string(), Value::from(value))
            })
            .collect();

        json!({
            "submission_id": id,
            "mode": self.mode,
            "fields": fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::SequentialIds;
    use crate::notify::MemorySink;
    use crate::simulator::{SubmissionDelays, SubmissionSimulator};
    use pretty_assertions::assert_eq;

    fn instant() -> Arc<dyn Submitter> {
        Arc::new(SubmissionSimulator::with_delays(SubmissionDelays::zero()))
    }

    #[test]
    fn test_set_field_rejects_fields_outside_the_form() {
        let mut form = FormController::login(instant(), Arc::new(MemorySink::new()));
        let err = form.set_field(Field::Username, "jane").unwrap_err();
        assert_eq!(
            err,
            FormError::FieldNotInForm {
                field: Field::Username,
                mode: FormMode::Login
            }
        );
        assert_eq!(form.value(Field::Username), "");
    }

    #[test]
    fn test_set_field_clears_only_its_own_error() {
        let mut form = FormController::login(instant(), Arc::new(MemorySink::new()));
        assert!(matches!(form.submit(), SubmitAttempt::Rejected(_)));
        assert_eq!(form.errors().len(), 2);

        form.set_field(Field::Email, "jane").unwrap();
        assert!(!form.errors().has_error(Field::Email));
        assert!(form.errors().has_error(Field::Password));

        // not revalidated until the next submit
        assert_eq!(form.value(Field::Email), "jane");
    }

    #[test]
    fn test_rejected_submit_does_not_start_submitting() {
        let mut form = FormController::register(instant(), Arc::new(MemorySink::new()));
        match form.submit() {
            SubmitAttempt::Rejected(errors) => assert_eq!(&errors, form.errors()),
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(!form.is_submitting());
        assert!(form.can_submit());
    }

    #[test]
    fn test_payload_redacts_passwords() {
        let mut form = FormController::login(instant(), Arc::new(MemorySink::new()))
            .with_ids(Arc::new(SequentialIds::new("login")));
        form.set_field(Field::Email, "jane@example.com").unwrap();
        form.set_field(Field::Password, "hunter2").unwrap();

        let payload = form.payload("login-1");
        assert_eq!(payload["submission_id"], "login-1");
        assert_eq!(payload["mode"], "login");
        assert_eq!(payload["fields"]["email"], "jane@example.com");
        assert_eq!(payload["fields"]["password"], REDACTED);
    }

    #[tokio::test]
    async fn test_valid_submit_enters_submitting_then_clears() {
        let sink = Arc::new(MemorySink::new());
        let mut form = FormController::login(instant(), sink.clone())
            .with_ids(Arc::new(SequentialIds::new("login")));
        form.set_field(Field::Email, "jane@example.com").unwrap();
        form.set_field(Field::Password, "whatever").unwrap();

        let pending = match form.submit() {
            SubmitAttempt::Started(pending) => pending,
            other => panic!("expected submission to start, got {:?}", other),
        };
        assert_eq!(pending.id(), "login-1");
        assert!(form.is_submitting());
        assert!(form.errors().is_empty());
        assert!(!form.can_submit());

        let receipt = pending.wait().await;
        assert!(form.resolve(&receipt));

        assert_eq!(form.state(), &FormState::default());
        let notification = sink.last().unwrap();
        assert_eq!(notification.title, "Login Successful");
    }

    #[tokio::test]
    async fn test_resolve_without_submission_is_ignored() {
        let sink = Arc::new(MemorySink::new());
        let simulator = SubmissionSimulator::with_delays(SubmissionDelays::zero());
        let receipt = simulator.submit(Operation::Login, json!({})).await;

        let mut form = FormController::login(instant(), sink.clone());
        form.set_field(Field::Email, "kept@example.com").unwrap();

        assert!(!form.resolve(&receipt));
        assert_eq!(form.value(Field::Email), "kept@example.com");
        assert!(sink.notifications().is_empty());
    }

    #[test]
    fn test_dropped_submission_returns_form_to_idle() {
        let mut form = FormController::login(instant(), Arc::new(MemorySink::new()))
            .with_ids(Arc::new(SequentialIds::new("login")));
        form.set_field(Field::Email, "jane@example.com").unwrap();
        form.set_field(Field::Password, "whatever").unwrap();

        let pending = match form.submit() {
            SubmitAttempt::Started(pending) => pending,
            other => panic!("expected submission to start, got {:?}", other),
        };
        assert!(form.is_submitting());

        drop(pending);
        assert!(!form.is_submitting());
        assert!(form.can_submit());

        match form.submit() {
            SubmitAttempt::Started(pending) => assert_eq!(pending.id(), "login-2"),
            other => panic!("expected a new submission to start, got {:?}", other),
        }
        assert_eq!(form.value(Field::Email), "jane@example.com");
    }

    #[tokio::test]
    async fn test_receipt_must_carry_the_outstanding_submission_id() {
        let sink = Arc::new(MemorySink::new());
        let mut form = FormController::login(instant(), sink.clone())
            .with_ids(Arc::new(SequentialIds::new("login")));
        form.set_field(Field::Email, "jane@example.com").unwrap();
        form.set_field(Field::Password, "whatever").unwrap();

        let pending = match form.submit() {
            SubmitAttempt::Started(pending) => pending,
            other => panic!("expected submission to start, got {:?}", other),
        };

        let simulator = SubmissionSimulator::with_delays(SubmissionDelays::zero());
        let stranger = simulator
            .submit(Operation::Login, json!({ "submission_id": "someone-else" }))
            .await;
        assert!(!form.resolve(&stranger));
        assert!(form.is_submitting());
        assert!(sink.notifications().is_empty());

        let receipt = pending.wait().await;
        assert!(form.resolve(&receipt));
        assert!(!form.is_submitting());
    }
}
