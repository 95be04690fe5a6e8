//! Application-level errors (wraps domain and engine errors)

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::EngineError;

/// Application errors wrap domain errors and add application-level context.
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("{0}")]
    Domain(#[from] DomainError),

    /// Any failure from the engine, labelled with the facade operation that issued it.
    #[error("{operation}: {source}")]
    Engine {
        operation: &'static str,
        #[source]
        source: EngineError,
    },

    #[error("working directory does not exist: {0}")]
    WorkingDirNotFound(PathBuf),

    #[error("cannot resolve working directory {path}: {source}")]
    ResolveWorkingDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("config error: {message}")]
    Config { message: String },

    #[error("operation failed: {context}")]
    OperationFailed {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ApplicationError {
    /// Wrap an engine error with the name of the failed operation.
    pub fn engine(operation: &'static str) -> impl FnOnce(EngineError) -> Self {
        move |source| Self::Engine { operation, source }
    }
}

/// Result type for application layer operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
