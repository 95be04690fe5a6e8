//! Container lifecycle service
//!
//! One method per CLI verb, each a thin delegation to the [`ContainerEngine`].
//! Errors are returned, never printed; the caller decides how the process ends.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{container_path, ContainerSpec, ContainerSummary, ImageReference, LogTarget};
use crate::infrastructure::traits::{ContainerEngine, CreateOptions, FileSystem};

/// Result of a completed image pull.
#[derive(Debug, Clone)]
pub struct PullReport {
    pub image: ImageReference,
    pub elapsed: Duration,
}

/// A container that was created and started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedContainer {
    pub id: String,
    pub name: String,
    /// Absolute host directory used as the container's working directory
    pub working_dir: PathBuf,
}

/// Facade over the container engine.
pub struct ContainerService {
    engine: Arc<dyn ContainerEngine>,
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl ContainerService {
    /// Create a new container service.
    pub fn new(
        engine: Arc<dyn ContainerEngine>,
        fs: Arc<dyn FileSystem>,
        settings: Arc<Settings>,
    ) -> Self {
        Self {
            engine,
            fs,
            settings,
        }
    }

    /// List every container known to the engine, in engine order.
    #[instrument(level = "debug", skip(self))]
    pub fn list(&self) -> ApplicationResult<Vec<ContainerSummary>> {
        self.engine
            .list()
            .map_err(ApplicationError::engine("list containers"))
    }

    /// Pull `reference`, blocking until the engine has the image.
    #[instrument(level = "debug", skip(self))]
    pub fn pull(&self, reference: &str) -> ApplicationResult<PullReport> {
        let image = ImageReference::parse(reference)?;
        let started = Instant::now();
        self.engine
            .pull(&image)
            .map_err(ApplicationError::engine("pull image"))?;
        let elapsed = started.elapsed();
        debug!("pull: {} in {:?}", image, elapsed);
        Ok(PullReport { image, elapsed })
    }

    /// Directory `new` uses when no working directory is given.
    pub fn default_working_dir(&self) -> ApplicationResult<PathBuf> {
        self.fs
            .current_dir()
            .with_path_context("get current directory", Path::new("."))
    }

    /// Create a container from `spec` and start it.
    ///
    /// The working directory is resolved and checked before the engine is
    /// contacted; a missing directory never leaves a half-created container.
    #[instrument(level = "debug", skip(self, spec), fields(name = %spec.name))]
    pub fn create_and_start(&self, spec: ContainerSpec) -> ApplicationResult<CreatedContainer> {
        let working_dir = self.resolve_working_dir(&spec.working_dir)?;
        let options = CreateOptions {
            platform: self.settings.container.platform.clone(),
            working_dir: container_path(&working_dir),
        };
        debug!("create: image={} options={:?}", spec.image, options);

        let id = self
            .engine
            .create(&spec, &options)
            .map_err(ApplicationError::engine("create container"))?;
        self.engine
            .start(&id)
            .map_err(ApplicationError::engine("start container"))?;

        Ok(CreatedContainer {
            id,
            name: spec.name,
            working_dir,
        })
    }

    fn resolve_working_dir(&self, dir: &Path) -> ApplicationResult<PathBuf> {
        let absolute = self
            .fs
            .absolute(dir)
            .map_err(|source| ApplicationError::ResolveWorkingDir {
                path: dir.to_path_buf(),
                source,
            })?;
        if !self.fs.exists(&absolute) || !self.fs.is_dir(&absolute) {
            return Err(ApplicationError::WorkingDirNotFound(absolute));
        }
        Ok(absolute)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn start(&self, id: &str) -> ApplicationResult<()> {
        self.engine
            .start(id)
            .map_err(ApplicationError::engine("start container"))
    }

    /// Stop `id`, waiting `timeout_secs` (or the configured default) before a kill.
    #[instrument(level = "debug", skip(self))]
    pub fn stop(&self, id: &str, timeout_secs: Option<i64>) -> ApplicationResult<()> {
        let timeout = timeout_secs.unwrap_or(self.settings.container.stop_timeout_secs);
        self.engine
            .stop(id, timeout)
            .map_err(ApplicationError::engine("stop container"))
    }

    #[instrument(level = "debug", skip(self))]
    pub fn remove(&self, id: &str) -> ApplicationResult<()> {
        self.engine
            .remove(id, self.settings.container.force_remove)
            .map_err(ApplicationError::engine("remove container"))
    }

    /// Copy raw log bytes into `sink`; returns how many containers were streamed.
    ///
    /// `LogTarget::All` walks the listing in order and stops at the first failure.
    /// Following is only honoured for a single container, since a followed
    /// stream of a running container never ends.
    #[instrument(level = "debug", skip(self, sink))]
    pub fn logs(
        &self,
        target: &LogTarget,
        follow: bool,
        sink: &mut dyn Write,
    ) -> ApplicationResult<usize> {
        match target {
            LogTarget::Single(id) => {
                self.engine
                    .logs(id, follow, sink)
                    .map_err(ApplicationError::engine("stream logs"))?;
                Ok(1)
            }
            LogTarget::All => {
                if follow {
                    warn!("logs: --follow ignored when streaming all containers");
                }
                let containers = self.list()?;
                for container in &containers {
                    debug!("logs: {} ({})", container.name, container.id);
                    self.engine
                        .logs(&container.id, false, sink)
                        .map_err(ApplicationError::engine("stream logs"))?;
                }
                Ok(containers.len())
            }
        }
    }
}
