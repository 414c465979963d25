//! Deterministic textual rewrites applied before parsing.
//!
//! Generators trained on other dialects tend to emit interval literals with a
//! separated quantity and a pluralized unit keyword (`INTERVAL '3' MONTHS`),
//! which the Postgres grammar rejects. The normalizer folds the unit into the
//! quoted literal (`INTERVAL '3 months'`). The rewrite set is deliberately
//! bounded; this is not a general dialect-repair pass.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static INTERVAL_PLURAL_UNIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bINTERVAL\s*'(\d+)'\s*(MONTHS|YEARS|DAYS|WEEKS)\b").unwrap()
});

/// Rewrite known-incompatible literal forms. Idempotent and side-effect-free:
/// the output never matches the rewrite pattern again, so a retry path may
/// normalize twice without drift.
pub fn normalize(sql: &str) -> String {
    INTERVAL_PLURAL_UNIT
        .replace_all(sql, |caps: &Captures| {
            format!("INTERVAL '{} {}'", &caps[1], caps[2].to_lowercase())
        })
        .into_owned()
}
