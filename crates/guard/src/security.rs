//! Two-layer security validation.
//!
//! The textual prefilter and the structural check are intentionally
//! overlapping: the textual layer catches payloads the parser would
//! mis-classify or split into a statement list, the structural layer catches
//! statement forms that carry no forbidden keyword. Failing either one rejects
//! the candidate.

use sqlparser::ast::{SetExpr, Statement};

use crate::error::GuardError;
use crate::policy::GuardPolicy;
use crate::Guardrail;

/// Layer 1: reject if any forbidden keyword appears as a whole token anywhere
/// in the text, any casing. Runs on the normalized text before parsing.
///
/// Matching is token-level, not substring: a column named `created_at` does
/// not trip `CREATE`. String literals are scanned too — a quoted `'DROP'` is
/// rejected, trading false positives for a smaller bypass surface.
pub fn scan_forbidden_tokens(sql: &str, policy: &GuardPolicy) -> Result<(), GuardError> {
    for token in tokenize(sql) {
        if policy.is_forbidden_token(token) {
            return Err(GuardError::Security(token.to_uppercase()));
        }
    }
    Ok(())
}

/// Identifier-shaped tokens in text order.
fn tokenize(sql: &str) -> impl Iterator<Item = &str> {
    sql.split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
}

/// The parse result must be exactly one statement. Statement lists are a
/// security rejection, not a parse error: `SELECT ...; SELECT ...` is valid
/// SQL that this pipeline refuses to run.
pub fn single_statement(statements: &[Statement]) -> Result<&Statement, GuardError> {
    match statements {
        [stmt] => Ok(stmt),
        [] => Err(GuardError::Security("empty statement".to_string())),
        _ => Err(GuardError::Security(format!(
            "statement list ({} statements)",
            statements.len()
        ))),
    }
}

/// Layer 2: the root must be a single read-only projection.
pub struct ReadOnlyGuard;

impl Guardrail for ReadOnlyGuard {
    fn name(&self) -> &'static str {
        "read_only"
    }

    fn check(&self, stmt: &Statement, _policy: &GuardPolicy) -> Result<(), GuardError> {
        match stmt {
            Statement::Query(query) => {
                if !query.locks.is_empty() {
                    return Err(GuardError::Security(
                        "locking clause (FOR UPDATE/SHARE)".to_string(),
                    ));
                }
                ensure_projection(&query.body)
            }
            other => Err(GuardError::Security(statement_kind(other))),
        }
    }
}

/// Every leaf of the set-expression tree must be a plain SELECT.
fn ensure_projection(body: &SetExpr) -> Result<(), GuardError> {
    match body {
        SetExpr::Select(_) => Ok(()),
        SetExpr::Query(query) => ensure_projection(&query.body),
        SetExpr::SetOperation { left, right, .. } => {
            ensure_projection(left)?;
            ensure_projection(right)
        }
        other => Err(GuardError::Security(format!(
            "{} is not a read-only projection",
            set_expr_kind(other)
        ))),
    }
}

fn set_expr_kind(body: &SetExpr) -> &'static str {
    match body {
        SetExpr::Values(_) => "VALUES",
        SetExpr::Insert(_) => "INSERT",
        SetExpr::Update(_) => "UPDATE",
        SetExpr::Table(_) => "TABLE",
        _ => "NON-SELECT",
    }
}

/// Name a rejected statement by its leading keyword(s), e.g. "DROP".
fn statement_kind(stmt: &Statement) -> String {
    stmt.to_string()
        .split_whitespace()
        .next()
        .unwrap_or("UNKNOWN")
        .to_uppercase()
}
