//! Domain error types.

use thiserror::Error;

/// Error raised by quiz collaborators (directories, stores, notifiers).
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// A referenced record was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
