//! Error types for path expression parsing.

/// Errors that can occur while parsing a path expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The input did not match the expression grammar at `offset`.
    #[error("expression not supported: {expression:?} (at offset {offset})")]
    UnsupportedExpression { expression: String, offset: usize },

    /// A sequence index was syntactically valid but too large to represent.
    #[error("sequence index {digits} in {expression:?} is out of range")]
    IndexOverflow { expression: String, digits: String },
}

impl PathError {
    pub(crate) fn unsupported(expression: &str, offset: usize) -> Self {
        Self::UnsupportedExpression {
            expression: expression.to_string(),
            offset,
        }
    }
}
