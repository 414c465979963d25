use querygate_error::{closest_match, ErrorCode, ErrorContext, GateError};
use thiserror::Error;

use crate::policy::GuardPolicy;

/// Pipeline-local error kinds. Each stage returns a discriminated result;
/// nothing here is a caught-and-rethrown blanket error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("SQL parse error: {0}")]
    Parse(String),

    #[error("Security violation: {0}")]
    Security(String),

    #[error("Table not allowed: {table}")]
    TableNotAllowed { table: String, scope_depth: usize },

    #[error("Cannot apply row limit: {0}")]
    LimitUnsupported(String),
}

impl GuardError {
    /// Convert into the coded error surfaced to callers, attaching structured
    /// context and a hint where one is useful.
    pub fn to_gate_error(self, policy: &GuardPolicy) -> GateError {
        match self {
            GuardError::Parse(detail) => {
                GateError::new(ErrorCode::SyntaxError, format!("SQL parse error: {}", detail))
                    .with_context(ErrorContext::Syntax { detail })
                    .with_hint("The candidate statement is not valid SQL for the target dialect")
            }
            GuardError::Security(token_or_kind) => GateError::new(
                ErrorCode::SecurityViolation,
                format!("Security violation: {}", token_or_kind),
            )
            .with_context(ErrorContext::Security { token_or_kind })
            .with_hint("Only a single read-only SELECT statement is accepted"),
            GuardError::TableNotAllowed { table, scope_depth } => {
                let allowed = policy.allowed_tables_sorted();
                let mut error = GateError::new(
                    ErrorCode::TableNotAllowed,
                    format!("Table '{}' is not in the allowlist", table),
                )
                .with_context(ErrorContext::TableNotAllowed {
                    table: table.clone(),
                    scope_depth,
                    allowed_tables: allowed.clone(),
                });
                if let Some(suggestion) = closest_match(&table, &allowed) {
                    error = error.with_hint(format!("Did you mean '{}'?", suggestion));
                }
                error
            }
            GuardError::LimitUnsupported(reason) => GateError::new(
                ErrorCode::LimitUnsupported,
                format!("Cannot apply row limit: {}", reason),
            )
            .with_context(ErrorContext::Limit { reason })
            .with_hint("Rewrite the query so a plain LIMIT can be appended to the outer statement"),
        }
    }
}
