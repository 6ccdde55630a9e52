//! Error types for maintenance runs

use scanhint_core::ScanhintError;
use thiserror::Error;

/// Errors raised by a maintenance run
#[derive(Debug, Error)]
pub enum MaintenanceError {
    #[error("Invalid table name '{0}': expected an identifier such as users or app.users")]
    InvalidTable(String),

    #[error(transparent)]
    Database(#[from] ScanhintError),
}

/// Result type for maintenance operations
pub type Result<T> = std::result::Result<T, MaintenanceError>;
