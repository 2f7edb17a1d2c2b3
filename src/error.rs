use thiserror::Error;

/// Main error type for docdex operations
#[derive(Error, Debug)]
pub enum DocdexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("parse error at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("not a search index artifact: {0}")]
    BadWrapper(String),

    #[error("integrity check failed with {violations} violation(s)")]
    IntegrityCheckFailed { violations: usize },

    #[error("invalid version label: {0:?}")]
    InvalidVersion(String),

    #[error("no index versions found under {0}")]
    EmptyCatalog(String),

    #[error("index error: {0}")]
    IndexError(String),

    #[error("query error: {0}")]
    QueryError(String),
}

/// Result type alias for docdex operations
pub type Result<T> = std::result::Result<T, DocdexError>;

impl DocdexError {
    /// Check if this error was caused by malformed artifact data, as opposed
    /// to the environment (missing files, permissions)
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            DocdexError::Json(_)
                | DocdexError::Parse { .. }
                | DocdexError::BadWrapper(_)
                | DocdexError::IntegrityCheckFailed { .. }
                | DocdexError::IndexError(_)
        )
    }
}
