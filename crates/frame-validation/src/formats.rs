//! Cell-level format checks
//!
//! Pre-compiled patterns and parsers shared by the error taxonomy: numeric
//! text, strftime-style dates and file extensions.

use chrono::format::{parse, Parsed, StrftimeItems};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{Column, Value};

// ============================================================================
// Pre-compiled Regex Patterns
// ============================================================================

/// Optional run of leading minus signs followed by numeric characters
///
/// Numeric means the Unicode `N` categories plus the CJK ideographs used as
/// primary numerals, which are letters (`Lo`) by category.
static NUMERIC_TEXT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-*[\p{N}零一二三四五六七八九十百千万萬亿億兆]+$").unwrap());

// ============================================================================
// Format Validators
// ============================================================================

/// Check whether text reads as an integer
///
/// Leading minus signs are stripped, then the rest must be non-empty and
/// made of numeric characters only. Decimal points and exponents fail.
///
/// # Example
/// ```
/// use frame_validation::formats::is_numeric_text;
///
/// assert!(is_numeric_text("5"));
/// assert!(is_numeric_text("-3"));
/// assert!(!is_numeric_text("abc"));
/// assert!(!is_numeric_text("1.5"));
/// assert!(!is_numeric_text("-"));
/// ```
pub fn is_numeric_text(value: &str) -> bool {
    NUMERIC_TEXT_REGEX.is_match(value)
}

/// Check whether text parses as a date under a strftime-style format
///
/// The format may carry time fields (`%Y-%m-%d %H:%M:%S`); the text must
/// then match them too. Fields the format leaves out take strptime's
/// defaults: month and day 1, year 1900. So `%Y-%m` accepts `2021-05` and
/// `%H:%M` accepts `10:30`.
///
/// # Example
/// ```
/// use frame_validation::formats::parses_as_date;
///
/// assert!(parses_as_date("2021-01-01", "%Y-%m-%d"));
/// assert!(parses_as_date("2021-01-01 10:30:00", "%Y-%m-%d %H:%M:%S"));
/// assert!(!parses_as_date("not-a-date", "%Y-%m-%d"));
/// assert!(!parses_as_date("2021-02-30", "%Y-%m-%d"));
/// assert!(parses_as_date("2021-05", "%Y-%m"));
/// assert!(parses_as_date("10:30", "%H:%M"));
/// ```
pub fn parses_as_date(value: &str, format: &str) -> bool {
    let mut parsed = Parsed::new();
    if parse(&mut parsed, value, StrftimeItems::new(format)).is_err() {
        return false;
    }
    if parsed.to_naive_date().is_ok() {
        return true;
    }

    // Setters refuse to overwrite a parsed field, so only gaps are filled
    let _ = parsed.set_month(1);
    let _ = parsed.set_day(1);
    if parsed.to_naive_date().is_ok() {
        return true;
    }
    let _ = parsed.set_year(1900);
    parsed.to_naive_date().is_ok()
}

/// Check whether a cell can be coerced to a date
///
/// Only strings can; nulls and every other type fail.
pub fn value_parses_as_date(value: &Value, format: &str) -> bool {
    match value {
        Value::String(s) => parses_as_date(s, format),
        _ => false,
    }
}

/// Extension of a file name (text after the last `.`), lowercased
///
/// # Example
/// ```
/// use frame_validation::formats::file_extension;
///
/// assert_eq!(file_extension("photo.JPG"), Some("jpg".to_string()));
/// assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
/// assert_eq!(file_extension("README"), None);
/// ```
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

/// Turn a column of file names into the "extension supported" flag column
///
/// Extensions compare case-insensitively and may be given with or without
/// the leading dot. Nulls stay null; any other non-string is unsupported.
pub fn extension_flags<S: AsRef<str>>(file_names: &Column, supported: &[S]) -> Column {
    let supported: Vec<String> = supported
        .iter()
        .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
        .collect();

    file_names.map(|value| match value {
        v if v.is_null() => Value::Null,
        Value::String(name) => Value::Bool(
            file_extension(name).map_or(false, |ext| supported.iter().any(|s| *s == ext)),
        ),
        _ => Value::Bool(false),
    })
}
