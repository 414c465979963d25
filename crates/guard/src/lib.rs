//! SQL safety validation and rewriting for Querygate.
//!
//! Candidate SQL from an untrusted generator passes through a fixed pipeline:
//!
//! 1. **Normalize**: rewrite known dialect-incompatible literal forms (`normalize`).
//! 2. **Textual prefilter**: reject forbidden keyword tokens before parsing (`security`).
//! 3. **Parse**: text to AST via `sqlparser`, Postgres dialect (`parse`).
//! 4. **Structural security**: single read-only SELECT-shaped statement (`security`).
//! 5. **Allowlist**: every table reference at every scope depth (`allowlist`).
//! 6. **Limit rewrite**: exactly one outer `LIMIT` at the configured ceiling (`limit`).
//!
//! Every accepted output parses as one SELECT, is bounded at `max_rows`, and
//! references only allowlisted tables. The cost estimator (`cost`) is advisory
//! and never rejects.
pub mod allowlist;
pub mod cost;
pub mod error;
pub mod limit;
pub mod normalize;
pub mod parse;
pub mod policy;
pub mod security;

pub use cost::{estimate_cost, CostEstimate, RiskTier};
pub use error::GuardError;
pub use normalize::normalize;
pub use policy::GuardPolicy;

use sqlparser::ast::Statement;

/// One validation stage operating on a parsed statement.
///
/// Stages are independent so they can be unit-tested and reordered; the
/// textual prefilter and the limit rewriter sit outside this trait because
/// they transform text, not judge a statement.
pub trait Guardrail {
    fn name(&self) -> &'static str;
    fn check(&self, stmt: &Statement, policy: &GuardPolicy) -> Result<(), GuardError>;
}

/// Run the full validation and rewriting pipeline over candidate SQL.
///
/// Returns the final safe statement text, or the first rejection. Rejections
/// are terminal: the pipeline never patches and resubmits a rejected
/// candidate.
pub fn validate_and_clean(sql: &str, policy: &GuardPolicy) -> Result<String, GuardError> {
    let normalized = normalize(sql);

    // Layer 1: textual keyword prefilter, before parsing, so injection via a
    // second statement is reported as the keyword rather than a shape error.
    security::scan_forbidden_tokens(&normalized, policy)?;

    let statements = parse::parse_statements(&normalized)?;
    let stmt = security::single_statement(&statements)?;

    let guardrails: [&dyn Guardrail; 2] = [&security::ReadOnlyGuard, &allowlist::AllowlistGuard];
    for guardrail in guardrails {
        guardrail.check(stmt, policy).inspect_err(|e| {
            tracing::warn!(target: "guard", stage = guardrail.name(), error = %e, "Rejected candidate SQL");
        })?;
    }

    let final_sql = limit::enforce_limit(stmt.clone(), policy.max_rows)?;

    tracing::debug!(target: "guard", sql = %final_sql, "Accepted candidate SQL");
    Ok(final_sql)
}
