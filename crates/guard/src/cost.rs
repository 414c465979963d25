//! Heuristic structural cost scoring.
//!
//! Advisory only: the estimate is exposed for observability and monitoring
//! collaborators and never causes a rejection. Estimation failures degrade to
//! `{score: 0, tier: Unknown}`.

use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};
use sqlparser::ast::{Expr, Query, SetExpr, Visit, Visitor};

use crate::parse::parse_statements;

const JOIN_WEIGHT: u32 = 10;
const AGGREGATION_WEIGHT: u32 = 5;
const SUBQUERY_WEIGHT: u32 = 20;
const WINDOW_WEIGHT: u32 = 15;

const AGGREGATE_FUNCTIONS: &[&str] = &[
    "SUM", "COUNT", "AVG", "MIN", "MAX", "STDDEV", "VARIANCE", "ARRAY_AGG", "STRING_AGG",
];

/// Advisory risk classification; never blocks execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub score: u32,
    pub tier: RiskTier,
    pub joins: u32,
    pub aggregations: u32,
    pub subqueries: u32,
    pub window_functions: u32,
}

impl CostEstimate {
    fn unknown() -> Self {
        Self {
            score: 0,
            tier: RiskTier::Unknown,
            joins: 0,
            aggregations: 0,
            subqueries: 0,
            window_functions: 0,
        }
    }
}

#[derive(Default)]
struct CostVisitor {
    query_nodes: u32,
    joins: u32,
    aggregations: u32,
    window_functions: u32,
}

impl CostVisitor {
    /// Count JOINs in the SELECT leaves of a set-expression tree, without
    /// descending into nested Query nodes (those are visited separately).
    fn count_joins(body: &SetExpr) -> u32 {
        match body {
            SetExpr::Select(select) => select
                .from
                .iter()
                .map(|twj| twj.joins.len() as u32)
                .sum(),
            SetExpr::SetOperation { left, right, .. } => {
                Self::count_joins(left) + Self::count_joins(right)
            }
            _ => 0,
        }
    }
}

impl Visitor for CostVisitor {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        self.query_nodes += 1;
        self.joins += Self::count_joins(&query.body);
        ControlFlow::Continue(())
    }

    fn pre_visit_expr(&mut self, expr: &Expr) -> ControlFlow<Self::Break> {
        if let Expr::Function(func) = expr {
            let name = func.name.to_string().to_uppercase();
            if func.over.is_some() {
                self.window_functions += 1;
            } else if AGGREGATE_FUNCTIONS.contains(&name.as_str()) {
                self.aggregations += 1;
            }
        }
        ControlFlow::Continue(())
    }
}

/// Score a statement's structural complexity.
///
/// Weights: 10 per join, 5 per aggregation, 20 per subquery, 15 per window
/// function. Tiers: score > 50 high, > 20 medium, else low.
pub fn estimate_cost(sql: &str) -> CostEstimate {
    let statements = match parse_statements(sql) {
        Ok(stmts) => stmts,
        Err(e) => {
            tracing::debug!(target: "guard", error = %e, "Cost estimation degraded to unknown");
            return CostEstimate::unknown();
        }
    };
    let Some(stmt) = statements.first() else {
        return CostEstimate::unknown();
    };

    let mut visitor = CostVisitor::default();
    let _ = stmt.visit(&mut visitor);

    let subqueries = visitor.query_nodes.saturating_sub(1);
    let score = JOIN_WEIGHT * visitor.joins
        + AGGREGATION_WEIGHT * visitor.aggregations
        + SUBQUERY_WEIGHT * subqueries
        + WINDOW_WEIGHT * visitor.window_functions;

    let tier = if score > 50 {
        RiskTier::High
    } else if score > 20 {
        RiskTier::Medium
    } else {
        RiskTier::Low
    };

    CostEstimate {
        score,
        tier,
        joins: visitor.joins,
        aggregations: visitor.aggregations,
        subqueries,
        window_functions: visitor.window_functions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_select_is_low() {
        let estimate = estimate_cost("SELECT a FROM dim_date");
        assert_eq!(estimate.score, 0);
        assert_eq!(estimate.tier, RiskTier::Low);
    }

    #[test]
    fn test_join_and_aggregation_weights() {
        // 2 joins (20) + 1 aggregation (5) = 25 -> medium
        let estimate = estimate_cost(
            "SELECT p.category, SUM(f.revenue) \
             FROM fact_sales f \
             JOIN dim_product p ON f.product_id = p.product_id \
             JOIN dim_date d ON f.date_key = d.date_key \
             GROUP BY p.category",
        );
        assert_eq!(estimate.joins, 2);
        assert_eq!(estimate.aggregations, 1);
        assert_eq!(estimate.score, 25);
        assert_eq!(estimate.tier, RiskTier::Medium);
    }

    #[test]
    fn test_subqueries_and_windows_push_high() {
        // 2 subqueries (40) + 1 window (15) = 55 -> high
        let estimate = estimate_cost(
            "SELECT a, RANK() OVER (ORDER BY a) \
             FROM (SELECT a FROM dim_date) t \
             WHERE a IN (SELECT b FROM dim_product)",
        );
        assert_eq!(estimate.subqueries, 2);
        assert_eq!(estimate.window_functions, 1);
        assert_eq!(estimate.score, 55);
        assert_eq!(estimate.tier, RiskTier::High);
    }

    #[test]
    fn test_tier_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&RiskTier::High).unwrap(), "\"high\"");
        assert_eq!(
            serde_json::to_string(&RiskTier::Unknown).unwrap(),
            "\"unknown\""
        );
    }

    #[test]
    fn test_unparsable_degrades_to_unknown() {
        let estimate = estimate_cost("not sql at all");
        assert_eq!(estimate.score, 0);
        assert_eq!(estimate.tier, RiskTier::Unknown);
    }
}
