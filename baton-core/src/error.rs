//! Error types for Baton

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Baton operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Baton operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A workflow, checkpoint or correction id does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        entity: &'static str,
        /// The missing id
        id: String,
    },

    /// Reading or writing a persisted document failed
    #[error("Persistence error at {}: {message}", path.display())]
    Persistence {
        /// Document path
        path: PathBuf,
        /// Operation and underlying cause
        message: String,
    },

    /// The role executor failed while running a role
    #[error("Role '{role}' failed: {message}")]
    Execution {
        /// Role that was running
        role: String,
        /// Failure reported by the executor
        message: String,
    },

    /// A workflow status change that the state machine does not allow
    #[error("Invalid workflow transition from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Agent process error
    #[error("Agent error: {0}")]
    Agent(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Git error
    #[error("Git error: {0}")]
    Git(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a `NotFound` error
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Error::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Build a `Persistence` error for an operation on a path
    pub fn persistence(
        operation: &str,
        path: impl Into<PathBuf>,
        cause: impl std::fmt::Display,
    ) -> Self {
        Error::Persistence {
            path: path.into(),
            message: format!("{} failed: {}", operation, cause),
        }
    }

    /// Whether this error reports a missing entity
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }
}
