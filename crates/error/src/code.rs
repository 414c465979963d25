use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric error codes following the QGATE-XXXX format.
///
/// ## Code Ranges
/// - **2000-2999**: Validation errors (terminal rejections)
/// - **3000-3999**: Generation errors (recoverable via fallback)
/// - **4000-4999**: Cache errors (always recovered locally)
/// - **5000-5999**: Internal/System errors
///
/// Codes are stable across versions (semver contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[non_exhaustive]
pub enum ErrorCode {
    // === Validation Errors (2000-2999) ===
    /// QGATE-2001: Input is not syntactically valid SQL for the target dialect
    SyntaxError = 2001,
    /// QGATE-2002: Forbidden keyword token, or the statement is not a read-only projection
    SecurityViolation = 2002,
    /// QGATE-2003: Referenced table is outside the configured allowlist
    TableNotAllowed = 2003,
    /// QGATE-2004: Statement shape does not support appending a row limit
    LimitUnsupported = 2004,

    // === Generation Errors (3000-3999) ===
    /// QGATE-3001: The external generator failed or returned unusable content
    GenerationFailed = 3001,

    // === Cache Errors (4000-4999) ===
    /// QGATE-4001: Cache backend unreachable; treated as a miss at every call site
    CacheUnavailable = 4001,

    // === Internal Errors (5000-5999) ===
    /// QGATE-5002: Serialization/deserialization failed
    SerializationFailed = 5002,
    /// QGATE-5003: Unexpected internal state
    Internal = 5003,

    /// QGATE-9999: Unknown/unclassified error
    Unknown = 9999,
}

impl ErrorCode {
    /// Get the numeric code value
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Get the formatted code string (e.g., "QGATE-2003")
    pub fn as_str(&self) -> String {
        format!("QGATE-{:04}", self.as_u16())
    }

    /// Get the error category
    pub fn category(&self) -> ErrorCategory {
        match self.as_u16() {
            2000..=2999 => ErrorCategory::Validation,
            3000..=3999 => ErrorCategory::Generation,
            4000..=4999 => ErrorCategory::Cache,
            5000..=5999 => ErrorCategory::Internal,
            _ => ErrorCategory::Unknown,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        code.as_str()
    }
}

impl TryFrom<String> for ErrorCode {
    type Error = String;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        let code = s
            .strip_prefix("QGATE-")
            .and_then(|n| n.parse::<u16>().ok())
            .ok_or_else(|| format!("Invalid error code: {}", s))?;

        Ok(match code {
            2001 => ErrorCode::SyntaxError,
            2002 => ErrorCode::SecurityViolation,
            2003 => ErrorCode::TableNotAllowed,
            2004 => ErrorCode::LimitUnsupported,
            3001 => ErrorCode::GenerationFailed,
            4001 => ErrorCode::CacheUnavailable,
            5002 => ErrorCode::SerializationFailed,
            5003 => ErrorCode::Internal,
            _ => ErrorCode::Unknown,
        })
    }
}

/// Coarse classification of error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Generation,
    Cache,
    Internal,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_formatting() {
        assert_eq!(ErrorCode::SyntaxError.as_str(), "QGATE-2001");
        assert_eq!(ErrorCode::TableNotAllowed.as_str(), "QGATE-2003");
        assert_eq!(ErrorCode::Unknown.as_str(), "QGATE-9999");
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            ErrorCode::SecurityViolation.category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            ErrorCode::GenerationFailed.category(),
            ErrorCategory::Generation
        );
        assert_eq!(ErrorCode::CacheUnavailable.category(), ErrorCategory::Cache);
        assert_eq!(ErrorCode::Internal.category(), ErrorCategory::Internal);
    }

    #[test]
    fn test_string_roundtrip() {
        let code = ErrorCode::LimitUnsupported;
        let s: String = code.into();
        assert_eq!(s, "QGATE-2004");
        let back = ErrorCode::try_from(s).unwrap();
        assert_eq!(back, ErrorCode::LimitUnsupported);
    }

    #[test]
    fn test_unrecognized_code_maps_to_unknown() {
        let back = ErrorCode::try_from("QGATE-8888".to_string()).unwrap();
        assert_eq!(back, ErrorCode::Unknown);

        assert!(ErrorCode::try_from("garbage".to_string()).is_err());
    }
}
