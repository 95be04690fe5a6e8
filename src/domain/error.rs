//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent invalid requests before anything reaches the engine.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid image reference: {reference} ({reason})")]
    InvalidImageReference { reference: String, reason: String },

    #[error("container name must not be empty")]
    EmptyContainerName,

    #[error("container command must have at least one token")]
    EmptyCommand,
}
