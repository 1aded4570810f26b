//! Constraint descriptors
//!
//! A constraint names a rule a field was declared with and carries its
//! limit or field list. Only some kinds map onto an error variant; see
//! [`FieldError::from_constraint`](crate::taxonomy::FieldError::from_constraint).

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use crate::types::Value;

// ============================================================================
// Limit
// ============================================================================

/// Numeric limit of a value constraint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Limit {
    Int(i64),
    Float(f64),
}

impl Limit {
    /// Limit as a float for comparisons
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Int(i) => *i as f64,
            Self::Float(f) => *f,
        }
    }

    /// Compare a cell value against the limit
    ///
    /// Only integers and non-NaN floats are comparable; everything else
    /// returns `None`.
    pub fn compare(&self, value: &Value) -> Option<Ordering> {
        match (value, self) {
            (Value::Int(v), Self::Int(limit)) => Some(v.cmp(limit)),
            _ => value.as_f64()?.partial_cmp(&self.as_f64()),
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Limit {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Limit {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Limit {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

// ============================================================================
// Constraint
// ============================================================================

/// A declared field constraint
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Value must be at least the limit
    MinValue(Limit),
    /// Value must be at most the limit
    MaxValue(Limit),
    /// Text must be at least this many characters
    MinLength(usize),
    /// Text must be at most this many characters
    MaxLength(usize),
    /// Rows must be unique over these fields
    UniqueTogether(Vec<String>),
    /// Text must match a regular expression
    Regex(String),
    /// Text must be an email address
    Email,
    /// Text must be a URL
    Url,
    /// Value must be a multiple of the step
    StepValue(Limit),
    /// File name must end in one of the extensions
    FileExtension(Vec<String>),
    /// Value must be one of the listed choices
    Choices(Vec<Value>),
}

/// Discriminant of a [`Constraint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    MinValue,
    MaxValue,
    MinLength,
    MaxLength,
    UniqueTogether,
    Regex,
    Email,
    Url,
    StepValue,
    FileExtension,
    Choices,
}

impl ConstraintKind {
    /// Stable snake_case name used in logs and dispatch failures
    pub fn name(&self) -> &'static str {
        match self {
            Self::MinValue => "min_value",
            Self::MaxValue => "max_value",
            Self::MinLength => "min_length",
            Self::MaxLength => "max_length",
            Self::UniqueTogether => "unique_together",
            Self::Regex => "regex",
            Self::Email => "email",
            Self::Url => "url",
            Self::StepValue => "step_value",
            Self::FileExtension => "file_extension",
            Self::Choices => "choices",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Constraint {
    /// Kind of this constraint
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::MinValue(_) => ConstraintKind::MinValue,
            Self::MaxValue(_) => ConstraintKind::MaxValue,
            Self::MinLength(_) => ConstraintKind::MinLength,
            Self::MaxLength(_) => ConstraintKind::MaxLength,
            Self::UniqueTogether(_) => ConstraintKind::UniqueTogether,
            Self::Regex(_) => ConstraintKind::Regex,
            Self::Email => ConstraintKind::Email,
            Self::Url => ConstraintKind::Url,
            Self::StepValue(_) => ConstraintKind::StepValue,
            Self::FileExtension(_) => ConstraintKind::FileExtension,
            Self::Choices(_) => ConstraintKind::Choices,
        }
    }

    /// The constraint's parameter as JSON (`Null` for parameterless kinds)
    pub fn limit_value(&self) -> serde_json::Value {
        match self {
            Self::MinValue(limit) | Self::MaxValue(limit) | Self::StepValue(limit) => {
                serde_json::to_value(limit).unwrap_or(serde_json::Value::Null)
            }
            Self::MinLength(len) | Self::MaxLength(len) => serde_json::Value::from(*len),
            Self::UniqueTogether(items) | Self::FileExtension(items) => {
                serde_json::Value::from(items.clone())
            }
            Self::Regex(pattern) => serde_json::Value::from(pattern.clone()),
            Self::Choices(values) => {
                serde_json::Value::Array(values.iter().cloned().map(Into::into).collect())
            }
            Self::Email | Self::Url => serde_json::Value::Null,
        }
    }

    /// Whether the constraint is checked against a whole table
    pub fn is_table_scoped(&self) -> bool {
        matches!(self, Self::UniqueTogether(_))
    }
}
