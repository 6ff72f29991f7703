//! Error types for command capture and replay.

use oxide_query::QueryError;

/// Errors that can occur while rendering or replaying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// A captured command has no inverse, so the migration cannot run down.
    #[error("Command '{command}' is not reversible")]
    Irreversible {
        /// The first offending command.
        command: String,
    },

    /// Compiling a data command failed.
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Database error during execution.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error (reading migration files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for migration operations.
pub type Result<T> = std::result::Result<T, MigrateError>;
