//! Tabular data model
//!
//! This module defines the scalar values, row labels, columns and tables that
//! the error taxonomy reads. Nothing in this crate mutates a column once it
//! has been handed over for validation.

use crate::errors::{FrameError, FrameResult};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;

// ============================================================================
// Value Enum - Cell values to be validated
// ============================================================================

/// A single cell of submitted data
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (i64)
    Int(i64),
    /// Float value (f64), NaN counts as missing
    Float(f64),
    /// String value
    String(String),
}

impl Value {
    /// Get human-readable type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::String(_) => "string",
        }
    }

    /// Check if value is missing (`Null` or a NaN float)
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value, if it has one
    ///
    /// Booleans and numeric-looking strings are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// String contents, if the value is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text rendering used by text-oriented checks
    ///
    /// Floats always keep a fractional part or exponent (`5.0`, `1e+20`),
    /// so an integral float never reads as a plain integer.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Null => Cow::Borrowed("None"),
            Self::Bool(true) => Cow::Borrowed("True"),
            Self::Bool(false) => Cow::Borrowed("False"),
            Self::Int(i) => Cow::Owned(i.to_string()),
            Self::Float(f) => Cow::Owned(float_text(*f)),
            Self::String(s) => Cow::Borrowed(s),
        }
    }
}

fn float_text(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_string();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let magnitude = f.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{:e}", f);
        // `1e20` -> `1e+20`
        return match text.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => format!("{}e+{}", mantissa, exp),
            _ => text,
        };
    }
    let text = f.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            // Nested structures are not cells; keep their JSON text
            nested => Value::String(nested.to_string()),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s),
        }
    }
}

// ============================================================================
// Row Index
// ============================================================================

/// Label of one row, kept verbatim in reports
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowIndex {
    /// Integer label (positional by default)
    Position(i64),
    /// Arbitrary string label
    Label(String),
}

impl fmt::Display for RowIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Position(i) => write!(f, "{}", i),
            Self::Label(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RowIndex {
    fn from(i: i64) -> Self {
        Self::Position(i)
    }
}

impl From<usize> for RowIndex {
    fn from(i: usize) -> Self {
        Self::Position(i as i64)
    }
}

impl From<&str> for RowIndex {
    fn from(s: &str) -> Self {
        Self::Label(s.to_string())
    }
}

impl From<String> for RowIndex {
    fn from(s: String) -> Self {
        Self::Label(s)
    }
}

fn positional_index(len: usize) -> Vec<RowIndex> {
    (0..len).map(RowIndex::from).collect()
}

// ============================================================================
// Column
// ============================================================================

/// One field across all submitted rows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Column {
    name: Option<String>,
    index: Vec<RowIndex>,
    values: Vec<Value>,
}

impl Column {
    /// Create a column with positional labels `0..n`
    pub fn new<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self {
            name: None,
            index: positional_index(values.len()),
            values,
        }
    }

    /// Create a column with caller-supplied row labels
    pub fn with_index<I, V>(
        index: impl IntoIterator<Item = I>,
        values: impl IntoIterator<Item = V>,
    ) -> FrameResult<Self>
    where
        I: Into<RowIndex>,
        V: Into<Value>,
    {
        let index: Vec<RowIndex> = index.into_iter().map(Into::into).collect();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if index.len() != values.len() {
            return Err(FrameError::LengthMismatch {
                expected: index.len(),
                found: values.len(),
            });
        }
        Ok(Self {
            name: None,
            index,
            values,
        })
    }

    /// Attach a field name
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Field name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the column has no rows
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row labels in order
    pub fn index(&self) -> &[RowIndex] {
        &self.index
    }

    /// Values in row order
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Iterate `(label, value)` pairs in row order
    pub fn iter(&self) -> impl Iterator<Item = (&RowIndex, &Value)> {
        self.index.iter().zip(self.values.iter())
    }

    /// Look up the value stored under a label
    pub fn get(&self, label: &RowIndex) -> Option<&Value> {
        self.iter().find(|(idx, _)| *idx == label).map(|(_, v)| v)
    }

    /// Labels of the rows whose value satisfies `predicate`, in row order
    pub fn filter<F>(&self, mut predicate: F) -> Vec<RowIndex>
    where
        F: FnMut(&Value) -> bool,
    {
        self.iter()
            .filter(|(_, value)| predicate(value))
            .map(|(idx, _)| idx.clone())
            .collect()
    }

    /// Copy of the column keeping only the rows whose value satisfies `predicate`
    pub fn retain<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Value) -> bool,
    {
        let (index, values): (Vec<RowIndex>, Vec<Value>) = self
            .iter()
            .filter(|(_, value)| predicate(value))
            .map(|(idx, value)| (idx.clone(), value.clone()))
            .unzip();
        Self {
            name: self.name.clone(),
            index,
            values,
        }
    }

    /// Copy of the column without null rows
    pub fn without_nulls(&self) -> Self {
        self.retain(|value| !value.is_null())
    }

    /// New column with the same labels and transformed values
    pub fn map<F>(&self, f: F) -> Self
    where
        F: FnMut(&Value) -> Value,
    {
        Self {
            name: self.name.clone(),
            index: self.index.clone(),
            values: self.values.iter().map(f).collect(),
        }
    }
}

// ============================================================================
// Table
// ============================================================================

/// Named columns sharing one row index
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    index: Vec<RowIndex>,
    columns: Vec<(String, Column)>,
}

impl Table {
    /// Build a table from named columns
    ///
    /// Every column must carry the same row labels as the first one.
    pub fn from_columns<S: Into<String>>(
        columns: impl IntoIterator<Item = (S, Column)>,
    ) -> FrameResult<Self> {
        let mut table = Self::default();
        let mut seen = HashSet::new();

        for (position, (name, column)) in columns.into_iter().enumerate() {
            let name = name.into();
            if !seen.insert(name.clone()) {
                return Err(FrameError::DuplicateField(name));
            }
            if position == 0 {
                table.index = column.index().to_vec();
            } else if column.index() != table.index.as_slice() {
                return Err(FrameError::LengthMismatch {
                    expected: table.index.len(),
                    found: column.len(),
                });
            }
            let column = column.named(name.clone());
            table.columns.push((name, column));
        }

        Ok(table)
    }

    /// Build a table from row tuples with positional labels
    pub fn from_records<S, R, V>(
        fields: impl IntoIterator<Item = S>,
        rows: impl IntoIterator<Item = R>,
    ) -> FrameResult<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        let mut cells: Vec<Vec<Value>> = vec![Vec::new(); fields.len()];

        for row in rows {
            let row: Vec<Value> = row.into_iter().map(Into::into).collect();
            if row.len() != fields.len() {
                return Err(FrameError::LengthMismatch {
                    expected: fields.len(),
                    found: row.len(),
                });
            }
            for (column, value) in cells.iter_mut().zip(row) {
                column.push(value);
            }
        }

        Self::from_columns(
            fields
                .into_iter()
                .zip(cells)
                .map(|(name, values)| (name, Column::new(values))),
        )
    }

    /// Get a column by field name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, column)| column)
    }

    /// Check if the table has a field
    pub fn contains(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Field names in column order
    pub fn field_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Shared row labels
    pub fn index(&self) -> &[RowIndex] {
        &self.index
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the table has no rows
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Values of row `position` restricted to `fields`, in field order
    ///
    /// Returns `None` if a field is unknown or the row is out of range.
    pub fn row(&self, position: usize, fields: &[&str]) -> Option<Vec<&Value>> {
        if position >= self.len() {
            return None;
        }
        fields
            .iter()
            .map(|field| self.column(field).map(|column| &column.values()[position]))
            .collect()
    }
}
