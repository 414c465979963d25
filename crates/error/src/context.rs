//! # Error Contexts
//!
//! Structured metadata for errors, so calling layers can handle rejections
//! programmatically instead of parsing messages.

use serde::{Deserialize, Serialize};

/// Structured context attached to a [`crate::GateError`].
///
/// Each variant provides the fields relevant to that error kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ErrorContext {
    /// Context for QGATE-2001 (SyntaxError)
    Syntax {
        /// The parser's description of the offending fragment
        detail: String,
    },

    /// Context for QGATE-2002 (SecurityViolation)
    Security {
        /// The forbidden keyword token or the rejected statement kind
        token_or_kind: String,
    },

    /// Context for QGATE-2003 (TableNotAllowed)
    TableNotAllowed {
        table: String,
        /// Depth of the scope the reference appeared in (0 = outermost FROM/JOIN)
        scope_depth: usize,
        allowed_tables: Vec<String>,
    },

    /// Context for QGATE-2004 (LimitUnsupported)
    Limit { reason: String },

    /// Context for QGATE-3001 (GenerationFailed)
    Generation { source: String },

    /// Generic key-value context for extensibility
    Generic {
        #[serde(flatten)]
        data: std::collections::HashMap<String, serde_json::Value>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_context_serde_roundtrip() {
        let ctx = ErrorContext::TableNotAllowed {
            table: "users".to_string(),
            scope_depth: 1,
            allowed_tables: vec!["dim_date".to_string(), "fact_sales".to_string()],
        };

        let json = serde_json::to_string(&ctx).unwrap();
        assert!(json.contains("\"type\":\"table_not_allowed\""));

        let de: ErrorContext = serde_json::from_str(&json).unwrap();
        match de {
            ErrorContext::TableNotAllowed {
                table, scope_depth, ..
            } => {
                assert_eq!(table, "users");
                assert_eq!(scope_depth, 1);
            }
            _ => panic!("Wrong variant"),
        }
    }
}
