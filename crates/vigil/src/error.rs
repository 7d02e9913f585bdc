// File: src/error.rs
// Purpose: Error types for controller misuse and comment rejection

use vigil_validation::{Field, FormMode};

/// Misuse of a form controller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("field `{field}` is not part of the {mode} form")]
    FieldNotInForm { field: Field, mode: FormMode },
}

/// Why a comment was not accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommentError {
    #[error("Please enter a comment before submitting.")]
    Empty,

    #[error("Please enter at least {min} characters.")]
    TooShort { min: usize },

    #[error("Comments are limited to {max} characters.")]
    TooLong { max: usize },
}

impl CommentError {
    /// Notification title for this rejection
    pub fn title(&self) -> &'static str {
        match self {
            CommentError::Empty => "Comment Required",
            CommentError::TooShort { .. } => "Comment Too Short",
            CommentError::TooLong { .. } => "Comment Too Long",
        }
    }
}
