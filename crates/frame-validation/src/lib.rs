//! Frame Validation
//!
//! Column-wise validation and error reporting for tabular submissions.
//!
//! A batch of rows arrives as a [`Table`] of named [`Column`]s. Each kind
//! of violation is a [`FieldError`] variant that picks the offending rows
//! out of a column and reports them under a stable uppercase code:
//!
//! ```text
//! { "reason": "MIN_VALUE", "indexes": [2], "limit_value": 0 }
//! ```
//!
//! Reports for one field are collected in a [`FieldErrors`]; per-field
//! collectors merge into an [`ErrorBody`] keyed by field name. Whether the
//! submission is rejected is up to the caller.
//!
//! # Modules
//!
//! - [`types`]: values, row labels, columns and tables
//! - [`codes`]: the closed registry of error codes
//! - [`taxonomy`]: error variants and their detection rules
//! - [`constraints`]: constraint descriptors and their dispatch
//! - [`collector`]: per-field accumulation and the merged error body
//! - [`validators`]: a driver that runs field declarations over a table
//!
//! # Example
//!
//! ```rust
//! use frame_validation::{Column, Constraint, FieldErrors, FieldError, Limit};
//!
//! let ages = Column::new(["5", "abc", "-3"]);
//! let mut errors = FieldErrors::for_field("age");
//!
//! errors.record(&FieldError::NonNumericValue, Some((&ages).into())).unwrap();
//! errors
//!     .record_from_constraint(&Constraint::MaxLength(1), Some((&ages).into()))
//!     .unwrap();
//!
//! assert_eq!(errors.len(), 2);
//!
//! // Kinds without an error variant are a dispatch failure, not a silent skip
//! assert!(errors.record_from_constraint(&Constraint::Email, None).is_err());
//! ```

// Public modules
pub mod codes;
pub mod collector;
pub mod config;
pub mod constraints;
pub mod errors;
pub mod formats;
pub mod report;
pub mod taxonomy;
pub mod types;
pub mod validators;

// Re-export commonly used types
pub use codes::ErrorCode;
pub use collector::{ErrorBody, FieldErrors};
pub use config::ValidationConfig;
pub use constraints::{Constraint, ConstraintKind, Limit};
pub use errors::{FrameError, FrameResult};
pub use report::ViolationReport;
pub use taxonomy::{FieldError, FrameData};
pub use types::{Column, RowIndex, Table, Value};
pub use validators::{validate_column, validate_table, FieldKind, FieldSpec, NON_FIELD_ERRORS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
