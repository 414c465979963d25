//! Deterministic fallback answers.
//!
//! When no generator is configured, or generation fails, a small catalog of
//! fixed templates keeps the service answering the questions it is most often
//! asked. Templates are written against the star schema and pass the
//! validation pipeline like any generated candidate; they are not exempt.

/// One fallback template. A rule fires when any one of its trigger groups has
/// every word present in the lowercased question.
struct FallbackRule {
    triggers: &'static [&'static [&'static str]],
    sql: &'static str,
    explanation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackAnswer {
    pub sql: String,
    pub explanation: String,
}

const RULES: &[FallbackRule] = &[
    // Last quarter's revenue by category
    FallbackRule {
        triggers: &[&["지난", "분기"], &["quarter"]],
        sql: "SELECT p.category, SUM(f.revenue) AS total_revenue \
              FROM fact_sales AS f \
              JOIN dim_product AS p ON f.product_id = p.product_id \
              JOIN dim_date AS d ON f.date_key = d.date_key \
              WHERE d.year = EXTRACT(YEAR FROM CURRENT_DATE - INTERVAL '3 months') \
              AND d.quarter = EXTRACT(QUARTER FROM CURRENT_DATE - INTERVAL '3 months') \
              GROUP BY p.category ORDER BY total_revenue DESC",
        explanation: "지난 분기의 카테고리별 총 매출을 집계했습니다.",
    },
    // Revenue totals by category
    FallbackRule {
        triggers: &[&["카테고리"], &["category"]],
        sql: "SELECT p.category, SUM(f.revenue) AS total_revenue \
              FROM fact_sales AS f \
              JOIN dim_product AS p ON f.product_id = p.product_id \
              GROUP BY p.category ORDER BY total_revenue DESC",
        explanation: "카테고리별 매출 합계를 집계했습니다.",
    },
    // Weekly revenue and quantity for the current year
    FallbackRule {
        triggers: &[&["주간"], &["주차"], &["week"]],
        sql: "SELECT d.week, SUM(f.revenue) AS total_revenue, SUM(f.quantity) AS total_quantity \
              FROM fact_sales AS f \
              JOIN dim_date AS d ON f.date_key = d.date_key \
              WHERE d.year = EXTRACT(YEAR FROM CURRENT_DATE) \
              GROUP BY d.week ORDER BY d.week",
        explanation: "올해 주차별 매출과 수량을 집계했습니다.",
    },
];

// Recent sales joined across all dimensions; the row ceiling is applied
// downstream like everywhere else.
const DEFAULT_SQL: &str =
    "SELECT d.date, p.product_name, c.customer_name, f.quantity, f.unit_price, f.revenue \
     FROM fact_sales f \
     JOIN dim_date d ON f.date_key = d.date_key \
     JOIN dim_product p ON f.product_id = p.product_id \
     JOIN dim_customer c ON f.customer_id = c.customer_id \
     ORDER BY d.date DESC";

const DEFAULT_EXPLANATION: &str = "최근 매출 데이터를 요약해 보여드립니다.";

/// Pick the fallback answer for a question. Rules are tried in catalog order;
/// no rule firing yields the recent-sales summary.
pub fn fallback_answer(question: &str) -> FallbackAnswer {
    let q = question.to_lowercase();
    for rule in RULES {
        let fired = rule
            .triggers
            .iter()
            .any(|group| group.iter().all(|word| q.contains(word)));
        if fired {
            return FallbackAnswer {
                sql: rule.sql.to_string(),
                explanation: rule.explanation.to_string(),
            };
        }
    }
    FallbackAnswer {
        sql: DEFAULT_SQL.to_string(),
        explanation: DEFAULT_EXPLANATION.to_string(),
    }
}
