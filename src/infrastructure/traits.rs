//! I/O boundary traits for testability
//!
//! These traits abstract the container engine and the filesystem, allowing
//! the facade to be tested with in-memory implementations.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::domain::{ContainerSpec, ContainerSummary, ImageReference};
use crate::infrastructure::EngineResult;

/// Options forwarded to the engine's create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    /// Target platform, e.g. `linux`
    pub platform: String,
    /// Working directory inside the container, `/`-separated
    pub working_dir: String,
}

/// Container engine abstraction: one method per daemon request.
pub trait ContainerEngine: Send + Sync {
    /// List all containers, running or not.
    fn list(&self) -> EngineResult<Vec<ContainerSummary>>;

    /// Pull an image, blocking until the transfer completes.
    fn pull(&self, image: &ImageReference) -> EngineResult<()>;

    /// Create a container and return its id.
    fn create(&self, spec: &ContainerSpec, options: &CreateOptions) -> EngineResult<String>;

    /// Start a created or stopped container.
    fn start(&self, id: &str) -> EngineResult<()>;

    /// Stop a container, killing it after `timeout_secs`.
    fn stop(&self, id: &str, timeout_secs: i64) -> EngineResult<()>;

    /// Remove a container.
    fn remove(&self, id: &str, force: bool) -> EngineResult<()>;

    /// Copy the container's stdout/stderr into `sink` until end-of-stream.
    fn logs(&self, id: &str, follow: bool, sink: &mut dyn Write) -> EngineResult<()>;
}

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Make path absolute against the current directory (no symlink resolution).
    fn absolute(&self, path: &Path) -> io::Result<PathBuf>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Current working directory of the process.
    fn current_dir(&self) -> io::Result<PathBuf>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn absolute(&self, path: &Path) -> io::Result<PathBuf> {
        std::path::absolute(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }
}
