//! Error types for the Dameng adapter.

use thiserror::Error;

/// Main error type for adapter operations.
#[derive(Error, Debug)]
pub enum AdapterError {
    /// Structurally unusable input (e.g. an empty identifier).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// SQL compilation failure caused by model or seed configuration.
    #[error("Compilation error: {0}")]
    Compilation(String),

    /// Profile or credential configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Could not open a session against the database.
    #[error("Failed to connect: {0}")]
    FailedToConnect(String),

    /// Error reported by the database while running a statement.
    #[error("Database error: {0}")]
    Database(String),

    /// Any other failure raised while running SQL.
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// The running query was cancelled.
    #[error("Query cancelled on connection '{0}'")]
    Cancelled(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AdapterError {
    /// Create a Database error from a driver message, trimming surrounding whitespace.
    pub fn database(message: impl AsRef<str>) -> Self {
        AdapterError::Database(message.as_ref().trim().to_string())
    }

    /// Create a Runtime error
    pub fn runtime(message: impl Into<String>) -> Self {
        AdapterError::Runtime(message.into())
    }

    /// Errors worth retrying when opening a connection.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AdapterError::FailedToConnect(_) | AdapterError::Io(_))
    }
}

/// Result type alias for adapter operations.
pub type Result<T> = std::result::Result<T, AdapterError>;
