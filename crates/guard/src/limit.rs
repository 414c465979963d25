//! Row-limit enforcement.
//!
//! The configured ceiling is authoritative: every existing row-limiting
//! clause on the outermost statement is removed and replaced with
//! `LIMIT max_rows`, even when the original requested fewer rows. Limits
//! inside subqueries are left untouched; they do not affect the cardinality
//! of the final result set.

use sqlparser::ast::{Expr, Statement, Value};

use crate::error::GuardError;

/// Rewrite the outermost query to carry exactly one `LIMIT max_rows` clause
/// and render the final SQL text.
pub fn enforce_limit(stmt: Statement, max_rows: u64) -> Result<String, GuardError> {
    let Statement::Query(mut query) = stmt else {
        // Security validation runs first; reaching here with a non-query is a
        // pipeline ordering bug, surfaced rather than silently skipped.
        return Err(GuardError::LimitUnsupported(
            "statement is not a query".to_string(),
        ));
    };

    // FETCH FIRST n ROWS is an equivalent row-limiting clause; strip it so the
    // statement ends up with a single LIMIT. WITH TIES / PERCENT variants
    // change row selection semantics and cannot be replaced by a plain LIMIT.
    if let Some(fetch) = &query.fetch {
        if fetch.with_ties {
            return Err(GuardError::LimitUnsupported(
                "FETCH ... WITH TIES".to_string(),
            ));
        }
        if fetch.percent {
            return Err(GuardError::LimitUnsupported("FETCH ... PERCENT".to_string()));
        }
        query.fetch = None;
    }

    if !query.limit_by.is_empty() {
        return Err(GuardError::LimitUnsupported("LIMIT ... BY".to_string()));
    }

    query.limit = Some(Expr::Value(Value::Number(max_rows.to_string(), false)));

    Ok(Statement::Query(query).to_string())
}
