//! Configuration options for the validation driver
//!
//! These knobs only shape how [`validate_column`](crate::validators::validate_column)
//! runs the taxonomy; the error variants themselves take no configuration.

// ============================================================================
// Validation Config
// ============================================================================

/// Configuration options for a validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationConfig {
    /// Record reports even when no row violated the rule
    pub include_empty_reports: bool,

    /// Drop null rows before value checks (after the null check itself)
    pub skip_nulls: bool,

    /// Run NON_NUMERIC_VALUE on integer fields before range checks
    pub numeric_check: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            include_empty_reports: false,
            skip_nulls: true,
            numeric_check: true,
        }
    }
}

impl ValidationConfig {
    /// Create a new validation config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep reports without offending rows
    pub fn include_empty_reports(mut self, include: bool) -> Self {
        self.include_empty_reports = include;
        self
    }

    /// Drop null rows before value checks
    pub fn skip_nulls(mut self, skip: bool) -> Self {
        self.skip_nulls = skip;
        self
    }

    /// Run the numeric check on integer fields
    pub fn numeric_check(mut self, check: bool) -> Self {
        self.numeric_check = check;
        self
    }

    /// Whether a report should be kept under this config
    pub fn keeps(&self, rows: usize) -> bool {
        rows > 0 || self.include_empty_reports
    }
}

// ============================================================================
// Tests
// ============================================================================
