//! Structural error types
//!
//! Validation findings are never errors in this crate; they are reports.
//! `FrameError` covers misuse of the API itself: an unknown constraint kind,
//! a column handed to a table-wide check, ragged input and the like.

use thiserror::Error;

use crate::codes::ErrorCode;

/// Result type alias for frame-validation operations
pub type FrameResult<T> = Result<T, FrameError>;

/// Structural failures that callers should surface as server errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// No error variant is mapped to this constraint kind
    #[error("Support for `{kind}` constraint not implemented")]
    UnsupportedConstraint { kind: String },

    /// String does not name any known error code
    #[error("Unknown error code: {0}")]
    UnknownCode(String),

    /// A column-scoped check got a table, or the other way around
    #[error("{code} expects a {expected}")]
    ShapeMismatch {
        code: ErrorCode,
        expected: &'static str,
    },

    /// A table-wide check references a field the table does not have
    #[error("Field not found in table: {0}")]
    MissingField(String),

    /// Row labels and values (or record widths) disagree in length
    #[error("Length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },

    /// The same field name appears twice in a table
    #[error("Duplicate field: {0}")]
    DuplicateField(String),
}

impl FrameError {
    /// HTTP status a transport layer should use for this failure
    pub fn status_code(&self) -> u16 {
        500
    }

    /// Returns true if this error came from constraint dispatch
    pub fn is_dispatch_failure(&self) -> bool {
        matches!(self, FrameError::UnsupportedConstraint { .. })
    }
}
