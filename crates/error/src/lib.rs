//! # querygate-error
//!
//! Unified error types for the Querygate text-to-SQL guardrail pipeline.
//!
//! All errors carry:
//! - Numeric error codes (QGATE-XXXX)
//! - Structured JSON context
//! - Actionable hints for the calling layer

mod code;
mod context;
mod convert;
mod suggest;

pub use code::{ErrorCategory, ErrorCode};
pub use context::ErrorContext;
pub use suggest::closest_match;

use serde::{Deserialize, Serialize};
use std::fmt;

/// The unified error type surfaced by the Querygate core.
///
/// Validator rejections keep their specific kind and offending detail so a
/// calling layer can map them to a precise 4xx-equivalent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateError {
    /// Numeric error code (e.g., "QGATE-2002")
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Structured context for programmatic handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,

    /// Actionable suggestion for the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl GateError {
    /// Create a new error with code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            hint: None,
        }
    }

    /// Add structured context
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Add an actionable hint
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// True when the error is a validator rejection (terminal for the request)
    pub fn is_rejection(&self) -> bool {
        self.code.category() == ErrorCategory::Validation
    }

    /// Serialize to JSON for API responses
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            tracing::warn!("Failed to serialize GateError: {}", e);
            format!(
                r#"{{"code":"{}","message":"Serialization failed"}}"#,
                self.code
            )
        })
    }
}

impl fmt::Display for GateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " (Hint: {})", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for GateError {}

/// Result type alias for Querygate operations
pub type Result<T> = std::result::Result<T, GateError>;
