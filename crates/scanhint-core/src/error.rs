//! Error types for scanhint

use thiserror::Error;

/// Core error type for database-facing scanhint operations
#[derive(Error, Debug)]
pub enum ScanhintError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not supported: {0}")]
    NotSupported(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for scanhint operations
pub type Result<T> = std::result::Result<T, ScanhintError>;
