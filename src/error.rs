use thiserror::Error;

/// Main error type for PubmedRag
#[derive(Error, Debug)]
pub enum PubmedRagError {
    /// Mismatched input lengths (ids vs docs, qa pairs vs candidates)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Corpus directory missing or not a directory
    #[error("Not found: {0}")]
    NotFound(String),

    /// File system I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON in a QA record
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Parse errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Answer generation API errors
    #[error("LLM API error: {0}")]
    Llm(String),
}

/// Convenient Result type using PubmedRagError
pub type Result<T> = std::result::Result<T, PubmedRagError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PubmedRagError::Validation("ids and docs must have same length".to_string());
        assert!(err.to_string().contains("Validation error"));
        assert!(err.to_string().contains("same length"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: PubmedRagError = json_err.into();
        assert!(matches!(err, PubmedRagError::Json(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PubmedRagError = io_err.into();
        assert!(matches!(err, PubmedRagError::Io(_)));
    }
}
