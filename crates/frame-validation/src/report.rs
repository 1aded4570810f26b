//! Violation reports
//!
//! A report is the serialized finding of one error variant:
//!
//! ```text
//! { "reason": "MIN_VALUE", "indexes": [2], "limit_value": 0 }
//! ```

use serde::{Deserialize, Serialize};

use crate::codes::ErrorCode;
use crate::types::RowIndex;

/// One failed constraint with the offending rows and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationReport {
    /// Code of the error variant
    pub reason: ErrorCode,
    /// Offending row labels in column order
    pub indexes: Vec<RowIndex>,
    /// Variant-specific keys merged into the top level
    #[serde(flatten)]
    pub params: serde_json::Map<String, serde_json::Value>,
}

impl ViolationReport {
    /// Create a report without extra parameters
    pub fn new(reason: ErrorCode, indexes: Vec<RowIndex>) -> Self {
        Self {
            reason,
            indexes,
            params: serde_json::Map::new(),
        }
    }

    /// Add an extra key
    pub fn with_param(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    /// True when no row violated the rule
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Get an extra key
    pub fn param(&self, key: &str) -> Option<&serde_json::Value> {
        self.params.get(key)
    }

    /// Report as a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}
