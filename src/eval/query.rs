//! Gold-labeled QA pair type and its relevance rule.

use serde::{Deserialize, Serialize};

/// Question plus an answer substring expected to appear in relevant evidence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct QaPair {
    /// Question text sent to the retriever.
    pub question: String,
    /// Substring a relevant document must contain (case-insensitive).
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Returns true if `doc_text` contains the expected answer, ignoring case.
    pub fn is_relevant(&self, doc_text: &str) -> bool {
        doc_text
            .to_lowercase()
            .contains(&self.answer.to_lowercase())
    }
}
