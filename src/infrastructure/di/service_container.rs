//! Service container for dependency injection
//!
//! Built once in `main` and passed to every command; nothing is global.

use std::sync::Arc;

use crate::application::services::ContainerService;
use crate::config::Settings;
use crate::infrastructure::docker::DockerEngine;
use crate::infrastructure::traits::{ContainerEngine, FileSystem, RealFileSystem};
use crate::infrastructure::InfraResult;

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Container engine client
    pub engine: Arc<dyn ContainerEngine>,
}

impl ServiceContainer {
    /// Create a new service container connected to the configured engine.
    pub fn new(settings: Settings) -> InfraResult<Self> {
        let engine = DockerEngine::connect(&settings.engine)?;
        Ok(Self::with_deps(
            settings,
            Arc::new(RealFileSystem),
            Arc::new(engine),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        engine: Arc<dyn ContainerEngine>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            engine,
        }
    }

    /// The engine facade.
    pub fn containers(&self) -> ContainerService {
        ContainerService::new(
            Arc::clone(&self.engine),
            Arc::clone(&self.fs),
            Arc::clone(&self.settings),
        )
    }
}
