//! Errors raised by [`GradeBook`](super::GradeBook) operations.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BookError {
    /// No subject matched the given id or name.
    #[error("subject not found: {0}")]
    SubjectNotFound(String),

    #[error("grade not found in {subject}: {grade}")]
    GradeNotFound { subject: String, grade: String },

    #[error("objective not found in {subject}: {objective}")]
    ObjectiveNotFound { subject: String, objective: String },

    /// Input rejected by validation; carries every problem found.
    #[error("invalid input: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl From<Vec<String>> for BookError {
    fn from(errors: Vec<String>) -> Self {
        BookError::Invalid(errors)
    }
}
