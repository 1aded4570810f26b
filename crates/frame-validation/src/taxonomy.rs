//! Error taxonomy
//!
//! One variant per kind of violation. Each variant knows its code, how to
//! pick the offending rows out of a column (or a table, for cross-field
//! checks) and which parameters to put in its report.
//!
//! # Example
//!
//! ```rust
//! use frame_validation::{Column, FieldError, FrameData};
//! use serde_json::json;
//!
//! let column = Column::new([1, 10, -1]);
//! let report = FieldError::min_value(0)
//!     .to_report(Some(FrameData::from(&column)))
//!     .unwrap();
//!
//! assert_eq!(
//!     report.to_json(),
//!     json!({"reason": "MIN_VALUE", "indexes": [2], "limit_value": 0})
//! );
//! ```

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::codes::ErrorCode;
use crate::constraints::{Constraint, Limit};
use crate::errors::{FrameError, FrameResult};
use crate::formats;
use crate::report::ViolationReport;
use crate::types::{Column, RowIndex, Table, Value};

// ============================================================================
// Input Shape
// ============================================================================

/// Data an error variant scans: one column or a whole table
#[derive(Debug, Clone, Copy)]
pub enum FrameData<'a> {
    Column(&'a Column),
    Table(&'a Table),
}

impl<'a> From<&'a Column> for FrameData<'a> {
    fn from(column: &'a Column) -> Self {
        Self::Column(column)
    }
}

impl<'a> From<&'a Table> for FrameData<'a> {
    fn from(table: &'a Table) -> Self {
        Self::Table(table)
    }
}

// ============================================================================
// Error Variants
// ============================================================================

/// A kind of field violation together with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Value is not an integer literal
    NonNumericValue,
    /// Field is absent from the submission
    FieldRequired,
    /// Value is null
    NullNotAllowed,
    /// Value is below `min_value`
    MinValue { min_value: Limit },
    /// Value is above `max_value`
    MaxValue { max_value: Limit },
    /// Text is shorter than `min_value` characters
    MinLength { min_value: usize },
    /// Text is longer than `max_value` characters
    MaxLength { max_value: usize },
    /// Row repeats an earlier row over these fields
    NonUniqueTogether { unique_together_fields: Vec<String> },
    /// Value does not parse as a date under `format`
    IncorrectDateFormat { format: String },
    /// Value does not parse as a date-time under `format`
    IncorrectDateTimeFormat { format: String },
    /// Row's file extension is not supported (flag column is false)
    ImageFormatNotSupported { supported_extensions: Vec<String> },
    /// Every row of the given column references an unknown identifier
    IdentifierNotFound,
    /// Value is the empty string
    BlankNotAllowed,
}

impl FieldError {
    pub fn min_value(limit: impl Into<Limit>) -> Self {
        Self::MinValue {
            min_value: limit.into(),
        }
    }

    pub fn max_value(limit: impl Into<Limit>) -> Self {
        Self::MaxValue {
            max_value: limit.into(),
        }
    }

    pub fn min_length(min_value: usize) -> Self {
        Self::MinLength { min_value }
    }

    pub fn max_length(max_value: usize) -> Self {
        Self::MaxLength { max_value }
    }

    pub fn non_unique_together<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self::NonUniqueTogether {
            unique_together_fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn incorrect_date_format(format: impl Into<String>) -> Self {
        Self::IncorrectDateFormat {
            format: format.into(),
        }
    }

    pub fn incorrect_datetime_format(format: impl Into<String>) -> Self {
        Self::IncorrectDateTimeFormat {
            format: format.into(),
        }
    }

    pub fn image_format_not_supported<S: Into<String>>(
        extensions: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::ImageFormatNotSupported {
            supported_extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Map a constraint descriptor onto its error variant
    ///
    /// Kinds without a variant fail with [`FrameError::UnsupportedConstraint`].
    pub fn from_constraint(constraint: &Constraint) -> FrameResult<Self> {
        match constraint {
            Constraint::MinValue(limit) => Ok(Self::MinValue { min_value: *limit }),
            Constraint::MaxValue(limit) => Ok(Self::MaxValue { max_value: *limit }),
            Constraint::MinLength(len) => Ok(Self::MinLength { min_value: *len }),
            Constraint::MaxLength(len) => Ok(Self::MaxLength { max_value: *len }),
            Constraint::UniqueTogether(fields) => Ok(Self::NonUniqueTogether {
                unique_together_fields: fields.clone(),
            }),
            Constraint::Regex(_)
            | Constraint::Email
            | Constraint::Url
            | Constraint::StepValue(_)
            | Constraint::FileExtension(_)
            | Constraint::Choices(_) => Err(FrameError::UnsupportedConstraint {
                kind: constraint.kind().name().to_string(),
            }),
        }
    }

    /// Outward-facing code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NonNumericValue => ErrorCode::NonNumericValue,
            Self::FieldRequired => ErrorCode::FieldRequired,
            Self::NullNotAllowed => ErrorCode::NullNotAllowed,
            Self::MinValue { .. } => ErrorCode::MinValue,
            Self::MaxValue { .. } => ErrorCode::MaxValue,
            Self::MinLength { .. } => ErrorCode::MinLength,
            Self::MaxLength { .. } => ErrorCode::MaxLength,
            Self::NonUniqueTogether { .. } => ErrorCode::NonUniqueTogether,
            Self::IncorrectDateFormat { .. } => ErrorCode::IncorrectDateFormat,
            Self::IncorrectDateTimeFormat { .. } => ErrorCode::IncorrectDateTimeFormat,
            Self::ImageFormatNotSupported { .. } => ErrorCode::ImageFormatNotSupported,
            Self::IdentifierNotFound => ErrorCode::IdentifierNotFound,
            Self::BlankNotAllowed => ErrorCode::BlankNotAllowed,
        }
    }

    /// Scan `data` and build the report
    ///
    /// With no data the report has no indexes. Handing a column to a
    /// table-wide variant (or the reverse) is a [`FrameError::ShapeMismatch`].
    pub fn to_report(&self, data: Option<FrameData<'_>>) -> FrameResult<ViolationReport> {
        let indexes = match data {
            None => Vec::new(),
            Some(data) => self.offending_rows(data)?,
        };
        Ok(self.attach_params(ViolationReport::new(self.code(), indexes)))
    }

    fn offending_rows(&self, data: FrameData<'_>) -> FrameResult<Vec<RowIndex>> {
        match (self, data) {
            (
                Self::NonUniqueTogether {
                    unique_together_fields,
                },
                FrameData::Table(table),
            ) => duplicated_rows(table, unique_together_fields),
            (Self::NonUniqueTogether { .. }, FrameData::Column(_)) => {
                Err(FrameError::ShapeMismatch {
                    code: self.code(),
                    expected: "table",
                })
            }
            (_, FrameData::Table(_)) => Err(FrameError::ShapeMismatch {
                code: self.code(),
                expected: "column",
            }),
            (_, FrameData::Column(column)) => Ok(self.scan_column(column)),
        }
    }

    fn scan_column(&self, column: &Column) -> Vec<RowIndex> {
        match self {
            Self::NonNumericValue => column
                .filter(|v| !v.is_null() && !formats::is_numeric_text(&v.as_text())),
            Self::NullNotAllowed => column.filter(Value::is_null),
            Self::MinValue { min_value } => {
                column.filter(|v| min_value.compare(v) == Some(Ordering::Less))
            }
            Self::MaxValue { max_value } => {
                column.filter(|v| max_value.compare(v) == Some(Ordering::Greater))
            }
            Self::MinLength { min_value } => {
                column.filter(|v| text_length(v).map_or(false, |len| len < *min_value))
            }
            Self::MaxLength { max_value } => {
                column.filter(|v| text_length(v).map_or(false, |len| len > *max_value))
            }
            Self::IncorrectDateFormat { format } | Self::IncorrectDateTimeFormat { format } => {
                unparseable_dates(column, format)
            }
            Self::ImageFormatNotSupported { .. } => {
                column.filter(|v| matches!(v, Value::Bool(false)))
            }
            Self::IdentifierNotFound => column.index().to_vec(),
            Self::BlankNotAllowed => column.filter(|v| v.as_str() == Some("")),
            // Not row-scoped over a single column
            Self::FieldRequired | Self::NonUniqueTogether { .. } => Vec::new(),
        }
    }

    fn attach_params(&self, report: ViolationReport) -> ViolationReport {
        match self {
            Self::MinValue { min_value: limit } | Self::MaxValue { max_value: limit } => {
                report.with_param("limit_value", limit_json(limit))
            }
            Self::MinLength { min_value: len } | Self::MaxLength { max_value: len } => {
                report.with_param("limit_value", *len)
            }
            Self::NonUniqueTogether {
                unique_together_fields,
            } => report.with_param("unique_together_fields", unique_together_fields.clone()),
            Self::IncorrectDateFormat { format } | Self::IncorrectDateTimeFormat { format } => {
                report.with_param("format", format.clone())
            }
            Self::ImageFormatNotSupported {
                supported_extensions,
            } => report.with_param("supported_extensions", supported_extensions.clone()),
            Self::NonNumericValue
            | Self::FieldRequired
            | Self::NullNotAllowed
            | Self::IdentifierNotFound
            | Self::BlankNotAllowed => report,
        }
    }
}

// ============================================================================
// Detection Helpers
// ============================================================================

fn limit_json(limit: &Limit) -> serde_json::Value {
    match limit {
        Limit::Int(i) => serde_json::Value::from(*i),
        Limit::Float(f) => serde_json::Value::from(*f),
    }
}

fn text_length(value: &Value) -> Option<usize> {
    value.as_str().map(|s| s.chars().count())
}

/// Shared by the date and date-time variants
fn unparseable_dates(column: &Column, format: &str) -> Vec<RowIndex> {
    column.filter(|v| !formats::value_parses_as_date(v, format))
}

/// Hashable view of a cell for duplicate detection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum CellKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    String(String),
}

impl From<&Value> for CellKey {
    fn from(value: &Value) -> Self {
        match value {
            v if v.is_null() => CellKey::Null,
            Value::Bool(b) => CellKey::Bool(*b),
            Value::Int(i) => CellKey::Int(*i),
            Value::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => CellKey::Int(*f as i64),
            // -0.0 and 0.0 are caught by the integral arm above
            Value::Float(f) => CellKey::Float(f.to_bits()),
            Value::String(s) => CellKey::String(s.clone()),
            Value::Null => CellKey::Null,
        }
    }
}

/// Rows that repeat an earlier row over `fields` (all fields when empty)
fn duplicated_rows(table: &Table, fields: &[String]) -> FrameResult<Vec<RowIndex>> {
    let columns: Vec<&Column> = if fields.is_empty() {
        table
            .field_names()
            .into_iter()
            .filter_map(|name| table.column(name))
            .collect()
    } else {
        fields
            .iter()
            .map(|field| {
                table
                    .column(field)
                    .ok_or_else(|| FrameError::MissingField(field.clone()))
            })
            .collect::<FrameResult<_>>()?
    };

    let mut seen: HashSet<Vec<CellKey>> = HashSet::with_capacity(table.len());
    let mut duplicates = Vec::new();

    for (position, label) in table.index().iter().enumerate() {
        let key: Vec<CellKey> = columns
            .iter()
            .map(|column| CellKey::from(&column.values()[position]))
            .collect();
        if !seen.insert(key) {
            duplicates.push(label.clone());
        }
    }

    Ok(duplicates)
}
