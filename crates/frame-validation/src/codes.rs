//! Error code registry
//!
//! Every error variant reports under one stable, uppercase code. The set is
//! closed and checked at compile time.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::FrameError;

/// Outward-facing code of an error variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    NonNumericValue,
    FieldRequired,
    NullNotAllowed,
    MinValue,
    MaxValue,
    MinLength,
    MaxLength,
    NonUniqueTogether,
    IncorrectDateFormat,
    IncorrectDateTimeFormat,
    ImageFormatNotSupported,
    IdentifierNotFound,
    BlankNotAllowed,
}

impl ErrorCode {
    /// Every code, in declaration order
    pub const ALL: [ErrorCode; 13] = [
        ErrorCode::NonNumericValue,
        ErrorCode::FieldRequired,
        ErrorCode::NullNotAllowed,
        ErrorCode::MinValue,
        ErrorCode::MaxValue,
        ErrorCode::MinLength,
        ErrorCode::MaxLength,
        ErrorCode::NonUniqueTogether,
        ErrorCode::IncorrectDateFormat,
        ErrorCode::IncorrectDateTimeFormat,
        ErrorCode::ImageFormatNotSupported,
        ErrorCode::IdentifierNotFound,
        ErrorCode::BlankNotAllowed,
    ];

    /// The code string carried in the `reason` key of a report
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NonNumericValue => "NON_NUMERIC_VALUE",
            Self::FieldRequired => "FIELD_REQUIRED",
            Self::NullNotAllowed => "NULL_NOT_ALLOWED",
            Self::MinValue => "MIN_VALUE",
            Self::MaxValue => "MAX_VALUE",
            Self::MinLength => "MIN_LENGTH_VALUE",
            Self::MaxLength => "MAX_LENGTH_VALUE",
            Self::NonUniqueTogether => "NON_UNIQUE_TOGETHER",
            Self::IncorrectDateFormat => "INCORRECT_DATE_FORMAT",
            Self::IncorrectDateTimeFormat => "INCORRECT_DATETIME_FORMAT",
            Self::ImageFormatNotSupported => "IMAGE_FORMAT_NOT_SUPPORTED",
            Self::IdentifierNotFound => "IDENTIFIER_NOT_FOUND",
            Self::BlankNotAllowed => "BLANK_NOT_ALLOWED",
        }
    }
}

const fn is_upper_code(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if !(b.is_ascii_uppercase() || b == b'_') {
            return false;
        }
        i += 1;
    }
    true
}

// A code that is empty or not uppercase fails the build.
const _: () = {
    let mut i = 0;
    while i < ErrorCode::ALL.len() {
        assert!(is_upper_code(ErrorCode::ALL[i].as_str()));
        i += 1;
    }
};

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = FrameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| FrameError::UnknownCode(s.to_string()))
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}
