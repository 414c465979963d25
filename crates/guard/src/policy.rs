use std::collections::HashSet;

/// Validation policy: table allowlist, forbidden keyword tokens, and the row
/// ceiling. Built once at startup from configuration, read-only afterwards.
#[derive(Debug, Clone)]
pub struct GuardPolicy {
    /// Allowed table names, stored lowercase for case-insensitive matching
    allowed_tables: HashSet<String>,
    /// Forbidden keyword tokens, stored uppercase
    forbidden_keywords: HashSet<String>,
    /// Authoritative row ceiling applied to every accepted statement
    pub max_rows: u64,
}

impl GuardPolicy {
    pub fn new<T, K>(allowed_tables: T, forbidden_keywords: K, max_rows: u64) -> Self
    where
        T: IntoIterator,
        T::Item: AsRef<str>,
        K: IntoIterator,
        K::Item: AsRef<str>,
    {
        Self {
            allowed_tables: allowed_tables
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .collect(),
            forbidden_keywords: forbidden_keywords
                .into_iter()
                .map(|k| k.as_ref().to_uppercase())
                .collect(),
            max_rows,
        }
    }

    pub fn is_table_allowed(&self, name: &str) -> bool {
        self.allowed_tables.contains(&name.to_lowercase())
    }

    pub fn is_forbidden_token(&self, token: &str) -> bool {
        self.forbidden_keywords.contains(&token.to_uppercase())
    }

    /// Allowed tables in sorted order, for deterministic error context.
    pub fn allowed_tables_sorted(&self) -> Vec<String> {
        let mut tables: Vec<String> = self.allowed_tables.iter().cloned().collect();
        tables.sort();
        tables
    }
}

impl Default for GuardPolicy {
    /// The analytical star schema with the standard DML/DDL keyword set and a
    /// 10000-row ceiling.
    fn default() -> Self {
        Self::new(
            ["dim_date", "dim_product", "dim_customer", "fact_sales"],
            [
                "INSERT", "UPDATE", "DELETE", "DROP", "CREATE", "ALTER", "TRUNCATE", "GRANT",
                "REVOKE", "EXECUTE", "EXEC",
            ],
            10000,
        )
    }
}
