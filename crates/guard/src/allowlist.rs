//! Table allowlist validation.
//!
//! Walks the statement tree pre-order, left-to-right, collecting every
//! relation reference at every query nesting depth — top-level FROM/JOIN,
//! subqueries, derived tables, and CTE bodies alike. No scope is exempt, and
//! a statement referencing even one disallowed table is wholly rejected.

use std::ops::ControlFlow;

use sqlparser::ast::{ObjectName, Query, Statement, Visit, Visitor};

use crate::error::GuardError;
use crate::policy::GuardPolicy;
use crate::Guardrail;

/// A table reference found during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub name: String,
    /// 0 = outermost query scope; +1 per nested subquery/CTE body
    pub scope_depth: usize,
}

struct TableCollector<'a> {
    /// When set, traversal breaks on the first disallowed name.
    policy: Option<&'a GuardPolicy>,
    depth: usize,
    refs: Vec<TableRef>,
}

impl Visitor for TableCollector<'_> {
    type Break = GuardError;

    fn pre_visit_query(&mut self, _query: &Query) -> ControlFlow<Self::Break> {
        self.depth += 1;
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, _query: &Query) -> ControlFlow<Self::Break> {
        self.depth -= 1;
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<Self::Break> {
        // Last path segment: `analytics.fact_sales` is judged by table name,
        // matching the case-insensitive allowlist entries.
        let name = relation
            .0
            .last()
            .map(|ident| ident.value.clone())
            .unwrap_or_default();

        let scope_depth = self.depth.saturating_sub(1);
        self.refs.push(TableRef {
            name: name.clone(),
            scope_depth,
        });

        if let Some(policy) = self.policy {
            if !policy.is_table_allowed(&name) {
                return ControlFlow::Break(GuardError::TableNotAllowed {
                    table: name,
                    scope_depth,
                });
            }
        }
        ControlFlow::Continue(())
    }
}

/// Collect every table reference in the statement, in traversal order.
pub fn table_refs(stmt: &Statement) -> Vec<TableRef> {
    let mut collector = TableCollector {
        policy: None,
        depth: 0,
        refs: Vec::new(),
    };
    let _ = stmt.visit(&mut collector);
    collector.refs
}

/// The allowlist stage: rejects on the first out-of-allowlist reference,
/// naming exactly that table.
pub struct AllowlistGuard;

impl Guardrail for AllowlistGuard {
    fn name(&self) -> &'static str {
        "allowlist"
    }

    fn check(&self, stmt: &Statement, policy: &GuardPolicy) -> Result<(), GuardError> {
        let mut collector = TableCollector {
            policy: Some(policy),
            depth: 0,
            refs: Vec::new(),
        };
        match stmt.visit(&mut collector) {
            ControlFlow::Break(err) => Err(err),
            ControlFlow::Continue(()) => Ok(()),
        }
    }
}
