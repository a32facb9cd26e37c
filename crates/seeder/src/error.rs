//! Error types for the seeder
//!
//! Configuration and batch errors are fatal to an invocation. Statement
//! errors are not: the runner turns them into data and keeps going.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for seeder operations
pub type SeedResult<T> = Result<T, SeedError>;

/// Top-level error for anything that stops an invocation
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Invalid run state: {0}")]
    State(String),
}

impl SeedError {
    /// Whether this error is a configuration error (raised before any statement runs)
    pub fn is_configuration(&self) -> bool {
        matches!(self, SeedError::Config(_))
    }
}

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingRequired(Vec<String>),

    #[error("Invalid value for '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },
}

impl ConfigError {
    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// Errors raised while loading a statement batch
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("'{name}' belongs to the {phase} phase but follows a {previous} statement")]
    PhaseOrder {
        name: String,
        phase: String,
        previous: String,
    },

    #[error("'{0}' contains no SQL statement")]
    EmptyStatement(String),

    #[error("'{name}' contains {count} statements, expected exactly one")]
    MultipleStatements { name: String, count: usize },
}

impl BatchError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A single statement's failure as reported by the data-access API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StatementError {
    pub message: String,
}

impl StatementError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_lists_every_variable() {
        let err = ConfigError::MissingRequired(vec![
            "MAINT_DB_CLUSTER_ARN".to_string(),
            "DEFAULT_DATABASE_NAME".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: MAINT_DB_CLUSTER_ARN, DEFAULT_DATABASE_NAME"
        );
    }

    #[test]
    fn test_statement_error_displays_raw_message() {
        let err = StatementError::new("relation already exists");
        assert_eq!(err.to_string(), "relation already exists");
    }

    #[test]
    fn test_config_error_is_configuration() {
        let err: SeedError = ConfigError::MissingRequired(vec!["X".to_string()]).into();
        assert!(err.is_configuration());
        assert!(!SeedError::Backend("boom".to_string()).is_configuration());
    }
}
