//! Infrastructure-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;

/// Failure reported by a [`ContainerEngine`](crate::infrastructure::traits::ContainerEngine).
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Docker(#[from] bollard::errors::Error),

    #[error("no such container: {0}")]
    NotFound(String),

    #[error("engine returned an error: {0}")]
    Daemon(String),

    #[error("write log output")]
    Output(#[source] std::io::Error),
}

/// Result type for engine calls.
pub type EngineResult<T> = Result<T, EngineError>;

/// Infrastructure errors wrap application errors and add connection-level concerns.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("create docker client for {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: bollard::errors::Error,
    },

    #[error("start async runtime: {source}")]
    Runtime {
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    /// Create a connection error for the given endpoint.
    pub fn connect(endpoint: impl Into<String>, source: bollard::errors::Error) -> Self {
        Self::Connect {
            endpoint: endpoint.into(),
            source,
        }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
