//! Validation driver
//!
//! Runs a submitted table through its field declarations and collects the
//! resulting reports. The driver never decides whether the submission is
//! rejected; it hands back an [`ErrorBody`] and leaves that to the caller.

use tracing::{debug, warn};

use crate::codes::ErrorCode;
use crate::collector::{ErrorBody, FieldErrors};
use crate::config::ValidationConfig;
use crate::constraints::Constraint;
use crate::errors::{FrameError, FrameResult};
use crate::formats;
use crate::taxonomy::{FieldError, FrameData};
use crate::types::{Column, Table, Value};

/// Key under which table-wide findings are reported
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

// ============================================================================
// Field Declarations
// ============================================================================

/// What a field holds
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldKind {
    /// No kind-specific check
    #[default]
    Any,
    /// Integer values, possibly submitted as text
    Integer,
    /// Free text
    Text,
    /// Date text under a strftime-style format
    Date { format: String },
    /// Date-time text under a strftime-style format
    DateTime { format: String },
    /// Image file names restricted to some extensions
    Image { supported_extensions: Vec<String> },
    /// References to existing records
    Identifier { known: Vec<Value> },
}

/// Declaration of one field of the submitted table
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    /// Field (column) name
    pub name: String,
    /// Kind of values
    pub kind: FieldKind,
    /// Whether the column must be present
    pub required: bool,
    /// Whether null cells are accepted
    pub allow_null: bool,
    /// Whether empty strings are accepted (text fields)
    pub allow_blank: bool,
    /// Declared constraints, checked in order
    pub constraints: Vec<Constraint>,
}

impl FieldSpec {
    /// Create a required, non-null, non-blank field
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            allow_null: false,
            allow_blank: false,
            constraints: Vec::new(),
        }
    }

    /// Allow the column to be absent
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Accept null cells
    pub fn nullable(mut self) -> Self {
        self.allow_null = true;
        self
    }

    /// Accept empty strings
    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    /// Add a constraint
    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Validate one column against its declaration
///
/// `column` is `None` when the field was not submitted at all.
///
/// # Example
///
/// ```
/// use frame_validation::{Column, Constraint, FieldKind, FieldSpec, Limit, ValidationConfig};
/// use frame_validation::validators::validate_column;
///
/// let spec = FieldSpec::new("age", FieldKind::Integer)
///     .constraint(Constraint::MinValue(Limit::from(0)));
/// let column = Column::new(["5", "abc", "-3"]);
///
/// let errors = validate_column(&spec, Some(&column), &ValidationConfig::default()).unwrap();
/// assert_eq!(errors.len(), 2);
/// ```
pub fn validate_column(
    spec: &FieldSpec,
    column: Option<&Column>,
    config: &ValidationConfig,
) -> FrameResult<FieldErrors> {
    let mut errors = FieldErrors::for_field(spec.name.clone());

    let column = match column {
        Some(column) => column,
        None => {
            if spec.required {
                errors.record(&FieldError::FieldRequired, None)?;
            }
            debug!(field = %spec.name, reports = errors.len(), "field missing from submission");
            return Ok(errors);
        }
    };

    if !spec.allow_null {
        record_kept(&mut errors, &FieldError::NullNotAllowed, column, config)?;
    }

    let working = if config.skip_nulls {
        column.without_nulls()
    } else {
        column.clone()
    };

    if spec.kind == FieldKind::Text && !spec.allow_blank {
        record_kept(&mut errors, &FieldError::BlankNotAllowed, &working, config)?;
    }

    let working = validate_kind(spec, working, &mut errors, config)?;

    for constraint in &spec.constraints {
        if constraint.is_table_scoped() {
            warn!(
                field = %spec.name,
                kind = %constraint.kind(),
                "table-wide constraint declared on a field"
            );
            return Err(FrameError::ShapeMismatch {
                code: ErrorCode::NonUniqueTogether,
                expected: "table",
            });
        }
        let error = FieldError::from_constraint(constraint).map_err(|err| {
            warn!(field = %spec.name, kind = %constraint.kind(), "unsupported constraint");
            err
        })?;
        record_kept(&mut errors, &error, &working, config)?;
    }

    debug!(
        field = %spec.name,
        rows = column.len(),
        reports = errors.len(),
        "validated field"
    );
    Ok(errors)
}

/// Validate a whole table
///
/// Each field spec is checked against its column, then each field list in
/// `unique_together` against the table. Table-wide findings go under
/// [`NON_FIELD_ERRORS`].
pub fn validate_table(
    specs: &[FieldSpec],
    table: &Table,
    unique_together: &[Vec<String>],
    config: &ValidationConfig,
) -> FrameResult<ErrorBody> {
    let mut body = ErrorBody::new();

    for spec in specs {
        let errors = validate_column(spec, table.column(&spec.name), config)?;
        body.insert(spec.name.clone(), errors);
    }

    let mut non_field = FieldErrors::for_field(NON_FIELD_ERRORS);
    for fields in unique_together {
        let report = FieldError::non_unique_together(fields.iter().cloned())
            .to_report(Some(FrameData::from(table)))?;
        if config.keeps(report.indexes.len()) {
            non_field.push(report);
        }
    }
    body.insert(NON_FIELD_ERRORS, non_field);

    debug!(rows = table.len(), fields = body.len(), "validated table");
    Ok(body)
}

// ============================================================================
// Kind Checks
// ============================================================================

/// Run the kind-specific check; returns the rows later constraints should see
fn validate_kind(
    spec: &FieldSpec,
    working: Column,
    errors: &mut FieldErrors,
    config: &ValidationConfig,
) -> FrameResult<Column> {
    match &spec.kind {
        FieldKind::Integer => {
            if config.numeric_check {
                record_kept(errors, &FieldError::NonNumericValue, &working, config)?;
            }
            // Range constraints only look at rows that read as integers
            Ok(working
                .retain(|v| v.is_null() || formats::is_numeric_text(&v.as_text()))
                .map(coerce_integer))
        }
        FieldKind::Date { format } => {
            record_kept(errors, &FieldError::incorrect_date_format(format.clone()), &working, config)?;
            Ok(working)
        }
        FieldKind::DateTime { format } => {
            let error = FieldError::incorrect_datetime_format(format.clone());
            record_kept(errors, &error, &working, config)?;
            Ok(working)
        }
        FieldKind::Image {
            supported_extensions,
        } => {
            let flags = formats::extension_flags(&working, supported_extensions);
            let error = FieldError::image_format_not_supported(supported_extensions.iter().cloned());
            record_kept(errors, &error, &flags, config)?;
            Ok(working)
        }
        FieldKind::Identifier { known } => {
            let unknown = working.retain(|v| !v.is_null() && !known.contains(v));
            record_kept(errors, &FieldError::IdentifierNotFound, &unknown, config)?;
            Ok(working)
        }
        FieldKind::Any | FieldKind::Text => Ok(working),
    }
}

fn coerce_integer(value: &Value) -> Value {
    match value {
        Value::String(s) => s.parse::<i64>().map(Value::Int).unwrap_or_else(|_| value.clone()),
        other => other.clone(),
    }
}

fn record_kept(
    errors: &mut FieldErrors,
    error: &FieldError,
    column: &Column,
    config: &ValidationConfig,
) -> FrameResult<()> {
    let report = error.to_report(Some(FrameData::from(column)))?;
    if config.keeps(report.indexes.len()) {
        errors.push(report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::Limit;
    use crate::types::RowIndex;
    use serde_json::json;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    /// Log sink shared between a test and its subscriber
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogBuffer {
        type Writer = LogBuffer;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let buffer = LogBuffer::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(buffer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, buffer.contents())
    }

    fn default_config() -> ValidationConfig {
        ValidationConfig::default()
    }

    #[test]
    fn test_missing_required_field() {
        let spec = FieldSpec::new("name", FieldKind::Text);
        let errors = validate_column(&spec, None, &default_config()).unwrap();
        assert_eq!(errors.codes(), vec![ErrorCode::FieldRequired]);
        assert!(errors.reports()[0].indexes.is_empty());
    }

    #[test]
    fn test_missing_optional_field() {
        let spec = FieldSpec::new("name", FieldKind::Text).optional();
        let errors = validate_column(&spec, None, &default_config()).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_text_field() {
        let spec = FieldSpec::new("name", FieldKind::Text)
            .constraint(Constraint::MinLength(2))
            .constraint(Constraint::MaxLength(4));
        let column = Column::new(vec![
            Value::from("Al"),
            Value::Null,
            Value::from(""),
            Value::from("Bartholomew"),
            Value::from("B"),
        ]);

        let errors = validate_column(&spec, Some(&column), &default_config()).unwrap();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            json!([
                {"reason": "NULL_NOT_ALLOWED", "indexes": [1]},
                {"reason": "BLANK_NOT_ALLOWED", "indexes": [2]},
                {"reason": "MIN_LENGTH_VALUE", "indexes": [2, 4], "limit_value": 2},
                {"reason": "MAX_LENGTH_VALUE", "indexes": [3], "limit_value": 4}
            ])
        );
    }

    #[test]
    fn test_nullable_blank_text_field() {
        let spec = FieldSpec::new("note", FieldKind::Text).nullable().allow_blank();
        let column = Column::new(vec![Value::Null, Value::from("")]);
        let errors = validate_column(&spec, Some(&column), &default_config()).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_integer_field_range_sees_numeric_rows_only() {
        let spec = FieldSpec::new("age", FieldKind::Integer)
            .constraint(Constraint::MinValue(Limit::from(0)))
            .constraint(Constraint::MaxValue(Limit::from(120)));
        let column = Column::new(vec![
            Value::from("5"),
            Value::from("abc"),
            Value::from("-3"),
            Value::Int(130),
        ]);

        let errors = validate_column(&spec, Some(&column), &default_config()).unwrap();
        assert_eq!(
            errors.codes(),
            vec![ErrorCode::NonNumericValue, ErrorCode::MinValue, ErrorCode::MaxValue]
        );
        assert_eq!(errors.reports()[0].indexes, vec![RowIndex::Position(1)]);
        assert_eq!(errors.reports()[1].indexes, vec![RowIndex::Position(2)]);
        assert_eq!(errors.reports()[2].indexes, vec![RowIndex::Position(3)]);
    }

    #[test]
    fn test_integer_field_without_numeric_check() {
        let spec = FieldSpec::new("age", FieldKind::Integer);
        let column = Column::new(["x"]);
        let config = ValidationConfig::new().numeric_check(false);
        let errors = validate_column(&spec, Some(&column), &config).unwrap();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_date_fields() {
        let column = Column::new(vec![Value::from("2021-01-01"), Value::from("01/01/2021")]);

        let date = FieldSpec::new("born", FieldKind::Date { format: "%Y-%m-%d".into() });
        let errors = validate_column(&date, Some(&column), &default_config()).unwrap();
        assert_eq!(errors.codes(), vec![ErrorCode::IncorrectDateFormat]);
        assert_eq!(errors.reports()[0].indexes, vec![RowIndex::Position(1)]);

        let datetime = FieldSpec::new("at", FieldKind::DateTime { format: "%Y-%m-%d".into() });
        let errors = validate_column(&datetime, Some(&column), &default_config()).unwrap();
        assert_eq!(errors.codes(), vec![ErrorCode::IncorrectDateTimeFormat]);
    }

    #[test]
    fn test_nullable_date_skips_nulls() {
        let spec = FieldSpec::new("born", FieldKind::Date { format: "%Y-%m-%d".into() }).nullable();
        let column = Column::new(vec![Value::Null, Value::from("2021-01-01")]);

        let errors = validate_column(&spec, Some(&column), &default_config()).unwrap();
        assert!(errors.is_empty());

        let config = ValidationConfig::new().skip_nulls(false);
        let errors = validate_column(&spec, Some(&column), &config).unwrap();
        assert_eq!(errors.codes(), vec![ErrorCode::IncorrectDateFormat]);
    }

    #[test]
    fn test_image_field() {
        let spec = FieldSpec::new(
            "avatar",
            FieldKind::Image {
                supported_extensions: vec!["png".into(), "jpg".into()],
            },
        );
        let column = Column::new(["me.png", "me.tiff", "me.JPG"]);
        let errors = validate_column(&spec, Some(&column), &default_config()).unwrap();
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!([{
                "reason": "IMAGE_FORMAT_NOT_SUPPORTED",
                "indexes": [1],
                "supported_extensions": ["png", "jpg"]
            }])
        );
    }

    #[test]
    fn test_identifier_field() {
        let spec = FieldSpec::new(
            "owner",
            FieldKind::Identifier {
                known: vec![Value::Int(1), Value::Int(2)],
            },
        );
        let column = Column::new([1, 3, 2, 4]);
        let errors = validate_column(&spec, Some(&column), &default_config()).unwrap();
        assert_eq!(errors.codes(), vec![ErrorCode::IdentifierNotFound]);
        assert_eq!(
            errors.reports()[0].indexes,
            vec![RowIndex::Position(1), RowIndex::Position(3)]
        );
    }

    #[test]
    fn test_include_empty_reports() {
        let spec = FieldSpec::new("name", FieldKind::Text);
        let column = Column::new(["ok"]);
        let config = ValidationConfig::new().include_empty_reports(true);
        let errors = validate_column(&spec, Some(&column), &config).unwrap();
        assert_eq!(
            errors.codes(),
            vec![ErrorCode::NullNotAllowed, ErrorCode::BlankNotAllowed]
        );
        assert!(errors.reports().iter().all(|r| r.is_empty()));
    }

    #[test]
    fn test_unsupported_constraint_is_fatal() {
        let spec = FieldSpec::new("email", FieldKind::Text).constraint(Constraint::Email);
        let column = Column::new(["a@b.c"]);
        let (result, logs) =
            with_captured_logs(|| validate_column(&spec, Some(&column), &default_config()));
        assert!(matches!(result, Err(FrameError::UnsupportedConstraint { .. })));
        assert!(logs.contains("unsupported constraint"));
        assert!(logs.contains("kind=email"));
    }

    #[test]
    fn test_unique_together_on_field_is_shape_mismatch() {
        let spec = FieldSpec::new("a", FieldKind::Any)
            .constraint(Constraint::UniqueTogether(vec!["a".into()]));
        let column = Column::new([1, 1]);
        let (result, logs) =
            with_captured_logs(|| validate_column(&spec, Some(&column), &default_config()));
        assert_eq!(
            result,
            Err(FrameError::ShapeMismatch {
                code: ErrorCode::NonUniqueTogether,
                expected: "table",
            })
        );
        assert!(logs.contains("table-wide constraint declared on a field"));
    }

    #[test]
    fn test_table_wide_constraint_rejected_before_other_checks() {
        // Rejected even when the column holds no rows to scan
        let spec = FieldSpec::new("a", FieldKind::Any)
            .constraint(Constraint::UniqueTogether(vec![]));
        let result = validate_column(&spec, Some(&Column::new(Vec::<Value>::new())), &default_config());
        assert!(matches!(result, Err(FrameError::ShapeMismatch { expected: "table", .. })));
    }

    #[test]
    fn test_validate_table() {
        let table = Table::from_records(
            ["a", "b"],
            vec![
                vec![Value::Int(1), Value::Int(2)],
                vec![Value::Int(1), Value::Int(2)],
                vec![Value::Int(-1), Value::Null],
            ],
        )
        .unwrap();
        let specs = vec![
            FieldSpec::new("a", FieldKind::Integer).constraint(Constraint::MinValue(Limit::from(0))),
            FieldSpec::new("b", FieldKind::Integer),
            FieldSpec::new("c", FieldKind::Text),
        ];
        let unique = vec![vec!["a".to_string(), "b".to_string()]];

        let body = validate_table(&specs, &table, &unique, &default_config()).unwrap();
        assert_eq!(
            body.to_json(),
            json!({
                "a": [{"reason": "MIN_VALUE", "indexes": [2], "limit_value": 0}],
                "b": [{"reason": "NULL_NOT_ALLOWED", "indexes": [2]}],
                "c": [{"reason": "FIELD_REQUIRED", "indexes": []}],
                "non_field_errors": [{
                    "reason": "NON_UNIQUE_TOGETHER",
                    "indexes": [1],
                    "unique_together_fields": ["a", "b"]
                }]
            })
        );
    }

    #[test]
    fn test_validate_clean_table() {
        let table = Table::from_records(["a"], vec![vec![1], vec![2]]).unwrap();
        let specs = vec![FieldSpec::new("a", FieldKind::Integer)];
        let body = validate_table(&specs, &table, &[vec!["a".to_string()]], &default_config()).unwrap();
        assert!(body.into_result().is_ok());
    }
}
