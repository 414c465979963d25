//! SQL generation seam.
//!
//! The generator is an injected collaborator behind [`SqlGenerator`], and its
//! output is untrusted text: everything it returns goes through the full
//! validation pipeline before anyone sees it. This module only defines the
//! seam and the response-format parsing; no network client lives here.

use async_trait::async_trait;
use thiserror::Error;

use querygate_error::{ErrorCode, ErrorContext, GateError};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Generator backend error: {0}")]
    Backend(String),

    #[error("Generator returned an empty response")]
    EmptyResponse,

    #[error("Generator timed out")]
    Timeout,
}

/// Coded form, for callers that surface generation trouble directly instead
/// of falling back.
impl From<GenerationError> for GateError {
    fn from(err: GenerationError) -> Self {
        let source = err.to_string();
        GateError::new(ErrorCode::GenerationFailed, source.clone())
            .with_context(ErrorContext::Generation { source })
    }
}

/// Produces candidate SQL (possibly labeled, possibly fenced) for a
/// natural-language question.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    async fn generate(&self, question: &str) -> Result<String, GenerationError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSql {
    pub sql: String,
    pub explanation: Option<String>,
}

enum Section {
    Preamble,
    Sql,
    Explanation,
}

/// Parse a generator response of the form
///
/// ```text
/// SQL: SELECT ...
///   (continuation lines)
/// 설명: ...
/// ```
///
/// Markdown code fences are stripped, continuation lines are folded into the
/// active section with single spaces, and `Explanation:` is accepted as an
/// alternative label. A response with no labels at all is taken as bare SQL.
pub fn parse_generator_response(content: &str) -> Result<GeneratedSql, GenerationError> {
    let mut sql = String::new();
    let mut explanation = String::new();
    let mut section = Section::Preamble;
    let mut saw_label = false;

    for raw in content.lines() {
        let line = raw.trim();
        if line.starts_with("```") {
            continue;
        }
        if let Some(rest) = line.strip_prefix("SQL:") {
            section = Section::Sql;
            saw_label = true;
            sql = rest.trim().to_string();
        } else if let Some(rest) = line
            .strip_prefix("설명:")
            .or_else(|| line.strip_prefix("Explanation:"))
        {
            section = Section::Explanation;
            saw_label = true;
            explanation = rest.trim().to_string();
        } else if !line.is_empty() {
            match section {
                Section::Sql => {
                    if !sql.is_empty() {
                        sql.push(' ');
                    }
                    sql.push_str(line);
                }
                Section::Explanation => {
                    if !explanation.is_empty() {
                        explanation.push(' ');
                    }
                    explanation.push_str(line);
                }
                Section::Preamble => {}
            }
        }
    }

    if !saw_label {
        sql = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with("```"))
            .collect::<Vec<_>>()
            .join(" ");
    }

    let sql = sql.replace("```sql", "").replace("```", "").trim().to_string();
    if sql.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    Ok(GeneratedSql {
        sql,
        explanation: (!explanation.is_empty()).then_some(explanation),
    })
}
