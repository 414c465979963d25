//! Thin adapter over the external SQL grammar library.

use sqlparser::ast::Statement;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::error::GuardError;

/// Parse SQL text into statements under the Postgres dialect.
///
/// Malformed input becomes [`GuardError::Parse`] carrying the library's
/// message, which names the offending fragment and position; nothing is
/// thrown uncontrolled.
pub fn parse_statements(sql: &str) -> Result<Vec<Statement>, GuardError> {
    Parser::parse_sql(&PostgreSqlDialect {}, sql).map_err(|e| GuardError::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_select() {
        let stmts = parse_statements("SELECT a FROM dim_date").unwrap();
        assert_eq!(stmts.len(), 1);
        assert!(matches!(stmts[0], Statement::Query(_)));
    }

    #[test]
    fn test_parse_error_carries_fragment() {
        let err = parse_statements("SELECT FROM WHERE").unwrap_err();
        match err {
            GuardError::Parse(detail) => assert!(detail.contains("WHERE") || detail.contains("Expected")),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_statements_parse_as_list() {
        let stmts = parse_statements("SELECT 1; SELECT 2").unwrap();
        assert_eq!(stmts.len(), 2);
    }
}
