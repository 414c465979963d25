//! Request and answer models shared between the pipeline and its callers.

use serde::{Deserialize, Serialize};

/// A natural-language query request.
///
/// This is the unit of cache identity: the fingerprint is computed over its
/// sorted field set, so field order in the incoming payload never matters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl QueryRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}
