//! Error types for the grid core.

/// Result type alias for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors that can occur in the grid core.
///
/// Missing optional collaborators (no update handler, no resize handler) are
/// never errors; the corresponding operation silently does nothing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GridError {
    /// The grid configuration is invalid and cannot be used.
    #[error("Invalid grid configuration: {message}")]
    Config { message: String },

    /// A column index beyond the current column set.
    #[error("Column index {index} out of range (column count {len})")]
    ColumnOutOfRange { index: usize, len: usize },

    /// A row index beyond `rows_count`.
    #[error("Row index {index} out of range (row count {len})")]
    RowOutOfRange { index: usize, len: usize },

    /// A row range whose start lies after its end.
    #[error("Invalid row range {from}..={to}")]
    InvalidRange { from: usize, to: usize },

    /// A copy/paste commit without the row the values were copied from.
    #[error("Copy/paste commit requires an origin row")]
    MissingOriginRow,
}

impl GridError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Returns `true` for errors raised while validating configuration.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        Self::config(format!("malformed JSON: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GridError::ColumnOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "Column index 7 out of range (column count 3)");

        let err = GridError::config("row_key must not be empty");
        assert!(err.is_config());
        assert_eq!(
            err.to_string(),
            "Invalid grid configuration: row_key must not be empty"
        );
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: GridError = json_err.into();
        assert!(err.is_config());
    }
}
