use thiserror::Error;

/// Errors that can occur while building a splitter or loading a sizer.
///
/// Splitting itself is infallible: every variant here is raised at
/// construction or load time, never while iterating chunks.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("invalid chunk capacity: minimum ({min}) is greater than maximum ({max})")]
    InvalidCapacity { min: usize, max: usize },

    #[error("invalid overlap: {overlap} must be smaller than the minimum chunk capacity ({min})")]
    InvalidOverlap { overlap: usize, min: usize },

    #[error("unknown tokenizer model '{0}'")]
    UnknownModel(String),

    #[cfg(feature = "code")]
    #[error("invalid tree-sitter language: {0}")]
    InvalidLanguage(#[from] tree_sitter::LanguageError),

    #[error("failed to load tokenizer configuration: {0}")]
    TokenizerLoad(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_error_display() {
        let err = SplitError::InvalidCapacity { min: 2, max: 1 };
        let msg = err.to_string();
        assert!(msg.contains("minimum (2)"), "Should name the minimum");
        assert!(msg.contains("maximum (1)"), "Should name the maximum");
    }

    #[test]
    fn test_overlap_error_display() {
        let err = SplitError::InvalidOverlap { overlap: 5, min: 4 };
        assert!(err.to_string().contains("smaller than the minimum"));
    }

    #[test]
    fn test_unknown_model_display() {
        let err = SplitError::UnknownModel("not-a-model".to_string());
        assert!(err.to_string().contains("not-a-model"));
    }
}
