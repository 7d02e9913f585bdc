//! # vigil
//!
//! Form logic for a community health-information site: the login and
//! registration forms, a simulated backend and the comment board.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vigil::{Field, FormController, MemorySink, SubmissionDelays, SubmissionSimulator, SubmitOutcome};
//!
//! #[tokio::main]
//! async fn main() {
//!     let sink = Arc::new(MemorySink::new());
//!     let submitter = Arc::new(SubmissionSimulator::with_delays(SubmissionDelays::zero()));
//!     let mut login = FormController::login(submitter, sink.clone());
//!
//!     login.set_field(Field::Email, "jane@example.com").unwrap();
//!     login.set_field(Field::Password, "any password").unwrap();
//!
//!     assert!(matches!(login.submit_and_wait().await, SubmitOutcome::Completed(_)));
//!     assert_eq!(sink.last().unwrap().title, "Login Successful");
//! }
//! ```

pub mod comments;
pub mod config;
pub mod error;
mod flight;
pub mod form;
pub mod identity;
pub mod notify;
pub mod simulator;

pub use comments::{
    Comment, CommentAttempt, CommentBoard, CommentDraft, CommentStore, PendingComment, PostOutcome,
    PostedComment,
};
pub use config::Config;
pub use error::{CommentError, FormError};
pub use form::{FormController, FormState, PendingSubmission, SubmitAttempt, SubmitOutcome};
pub use identity::{Clock, FixedClock, IdSource, SequentialIds, SystemClock, UuidIds};
pub use notify::{MemorySink, Notification, NotificationSink, Severity, TeeSink, TracingSink};
pub use simulator::{
    Operation, Receipt, SubmissionDelays, SubmissionSimulator, Submitter, COMMENT_POST_DELAY,
    LOGIN_DELAY, REGISTER_DELAY,
};

// Field rules live in their own crate
pub use vigil_validation::{
    validate_field, validate_form, Field, FieldError, FieldErrorKind, FieldValues, FormMode,
    ValidationErrors,
};
