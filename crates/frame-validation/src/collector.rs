//! Error accumulation
//!
//! [`FieldErrors`] collects the reports of one field (or one form) during a
//! single validation pass. [`ErrorBody`] merges per-field collectors into
//! the `{field_name: [report, ...]}` payload returned to the client.

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::codes::ErrorCode;
use crate::constraints::Constraint;
use crate::errors::FrameResult;
use crate::report::ViolationReport;
use crate::taxonomy::{FieldError, FrameData};

// ============================================================================
// Field Errors
// ============================================================================

/// Ordered reports for one field
///
/// Reports keep the order they were recorded in. Nothing is deduplicated
/// or merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    field: Option<String>,
    reports: Vec<ViolationReport>,
}

impl FieldErrors {
    /// Create a new empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collector labelled with a field name (used in logs)
    pub fn for_field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            reports: Vec::new(),
        }
    }

    /// Field this collector belongs to, if labelled
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Scan `data` with `error` and append the report
    ///
    /// On a structural failure nothing is appended.
    pub fn record(&mut self, error: &FieldError, data: Option<FrameData<'_>>) -> FrameResult<()> {
        match error.to_report(data) {
            Ok(report) => {
                self.push(report);
                Ok(())
            }
            Err(err) => {
                warn!(field = ?self.field, code = %error.code(), "failed to build report: {}", err);
                Err(err)
            }
        }
    }

    /// Translate a constraint descriptor into its error variant, then record it
    pub fn record_from_constraint(
        &mut self,
        constraint: &Constraint,
        data: Option<FrameData<'_>>,
    ) -> FrameResult<()> {
        let error = FieldError::from_constraint(constraint).map_err(|err| {
            warn!(field = ?self.field, kind = %constraint.kind(), "unsupported constraint");
            err
        })?;
        self.record(&error, data)
    }

    /// Append a prepared report
    pub fn push(&mut self, report: ViolationReport) {
        debug!(
            field = ?self.field,
            reason = %report.reason,
            rows = report.indexes.len(),
            "recorded violation report"
        );
        self.reports.push(report);
    }

    /// Reports in recording order
    pub fn reports(&self) -> &[ViolationReport] {
        &self.reports
    }

    /// Take the reports out
    pub fn into_reports(self) -> Vec<ViolationReport> {
        self.reports
    }

    /// Codes of the recorded reports, in order
    pub fn codes(&self) -> Vec<ErrorCode> {
        self.reports.iter().map(|report| report.reason).collect()
    }

    /// Number of recorded reports
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Check if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    /// Drop all reports so the collector can serve another submission
    pub fn clear(&mut self) {
        self.reports.clear();
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.reports.serialize(serializer)
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} violation report(s)", self.reports.len())
    }
}

// ============================================================================
// Error Body
// ============================================================================

/// Per-field payloads merged into one error body
///
/// Fields serialize in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorBody {
    fields: BTreeMap<String, Vec<ViolationReport>>,
}

impl ErrorBody {
    /// Create a new empty body
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field's reports; empty collectors are skipped
    ///
    /// Inserting the same field twice appends in call order.
    pub fn insert(&mut self, field: impl Into<String>, errors: FieldErrors) {
        if errors.is_empty() {
            return;
        }
        self.fields
            .entry(field.into())
            .or_default()
            .extend(errors.into_reports());
    }

    /// Reports recorded for a field
    pub fn get(&self, field: &str) -> Option<&[ViolationReport]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Fields with at least one report, in name order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields with reports
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no field has reports
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Ok if nothing was reported, Err with the body otherwise
    pub fn into_result(self) -> Result<(), ErrorBody> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// HTTP status a transport layer should use for this body
    pub fn status_code(&self) -> u16 {
        400
    }

    /// Body as a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed for {} field(s)", self.fields.len())
    }
}

impl std::error::Error for ErrorBody {}
