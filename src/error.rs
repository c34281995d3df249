//! Error types for siftql.

use thiserror::Error;

/// The main error type for siftql operations.
#[derive(Debug, Error)]
pub enum SiftError {
    /// Schema introspection failed or the store is unreachable.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A filter value failed validation for the current operator.
    #[error("Invalid value: {0}")]
    Validation(String),

    /// An operator outside the filter's supported set was selected.
    #[error("Invalid operator '{operator}', supported operators are: {supported}")]
    InvalidOperator {
        operator: &'static str,
        supported: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Query execution error.
    #[error("Execution error: {0}")]
    Execution(String),
}

impl SiftError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an invalid-operator error listing the supported set.
    pub fn invalid_operator(
        operator: &'static str,
        supported: impl IntoIterator<Item = &'static str>,
    ) -> Self {
        Self::InvalidOperator {
            operator,
            supported: supported.into_iter().collect::<Vec<_>>().join(", "),
        }
    }
}

/// Result type alias for siftql operations.
pub type SiftResult<T> = Result<T, SiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SiftError::validation("value can't be an empty string");
        assert_eq!(
            err.to_string(),
            "Invalid value: value can't be an empty string"
        );

        let err = SiftError::invalid_operator("Like", ["Equals", "Not equals"]);
        assert_eq!(
            err.to_string(),
            "Invalid operator 'Like', supported operators are: Equals, Not equals"
        );
    }
}
