//! Docker daemon client built on bollard
//!
//! bollard is async; the CLI is not. Each call is driven to completion on a
//! private current-thread tokio runtime.

use std::io::Write;
use std::pin::pin;
use std::time::Duration;

use bollard::container::{
    Config, CreateContainerOptions, ListContainersOptions, LogsOptions, RemoveContainerOptions,
    StartContainerOptions, StopContainerOptions,
};
use bollard::errors::Error as DockerError;
use bollard::image::CreateImageOptions;
use bollard::{Docker, API_DEFAULT_VERSION};
use chrono::DateTime;
use futures_util::StreamExt;
use tokio::runtime::Runtime;
use tracing::{debug, instrument, trace, warn};

use crate::config::EngineSettings;
use crate::domain::{
    display_name, ContainerSpec, ContainerState, ContainerSummary, ImageReference,
};
use crate::infrastructure::traits::{ContainerEngine, CreateOptions};
use crate::infrastructure::{EngineError, EngineResult, InfraError, InfraResult};

/// [`ContainerEngine`] backed by a Docker-compatible daemon.
pub struct DockerEngine {
    docker: Docker,
    runtime: Runtime,
}

impl DockerEngine {
    /// Connect to `settings.host`, or to the local socket defaults (honours `DOCKER_HOST`).
    pub fn connect(settings: &EngineSettings) -> InfraResult<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| InfraError::Runtime { source })?;

        let docker = {
            let _guard = runtime.enter();
            match settings.host.as_deref() {
                Some(host) => connect_to(host, settings.timeout_secs)
                    .map_err(|e| InfraError::connect(host, e))?,
                None => Docker::connect_with_socket_defaults()
                    .map_err(|e| InfraError::connect("local socket", e))?
                    .with_timeout(Duration::from_secs(settings.timeout_secs)),
            }
        };
        debug!("connected: host={:?}", settings.host);

        Ok(Self { docker, runtime })
    }
}

/// Transport selected from the endpoint's scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transport {
    Unix,
    NamedPipe,
    Http,
}

fn transport_for(host: &str) -> Transport {
    match host.split_once("://").map(|(scheme, _)| scheme) {
        Some("unix") => Transport::Unix,
        Some("npipe") => Transport::NamedPipe,
        _ => Transport::Http,
    }
}

fn connect_to(host: &str, timeout_secs: u64) -> Result<Docker, DockerError> {
    match transport_for(host) {
        #[cfg(unix)]
        Transport::Unix => Docker::connect_with_unix(host, timeout_secs, API_DEFAULT_VERSION),
        #[cfg(windows)]
        Transport::NamedPipe => {
            Docker::connect_with_named_pipe(host, timeout_secs, API_DEFAULT_VERSION)
        }
        _ => Docker::connect_with_http(host, timeout_secs, API_DEFAULT_VERSION),
    }
}

/// Map a daemon 404 to [`EngineError::NotFound`] for the container the caller asked about.
fn for_container(id: &str) -> impl FnOnce(DockerError) -> EngineError + '_ {
    move |err| match err {
        DockerError::DockerResponseServerError {
            status_code: 404, ..
        } => EngineError::NotFound(id.to_string()),
        other => EngineError::Docker(other),
    }
}

/// The daemon answers 304 when the container is already in the requested state.
fn already_done(result: Result<(), DockerError>) -> Result<(), DockerError> {
    match result {
        Err(DockerError::DockerResponseServerError {
            status_code: 304, ..
        }) => Ok(()),
        other => other,
    }
}

fn to_summary(c: bollard::models::ContainerSummary) -> ContainerSummary {
    let id = c.id.unwrap_or_default();
    let names = c.names.unwrap_or_default();
    ContainerSummary {
        name: display_name(&names, &id),
        image: c.image.unwrap_or_default(),
        state: ContainerState::parse(c.state.as_deref().unwrap_or_default()),
        created: c
            .created
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .unwrap_or_default(),
        id,
    }
}

impl ContainerEngine for DockerEngine {
    #[instrument(level = "debug", skip(self))]
    fn list(&self) -> EngineResult<Vec<ContainerSummary>> {
        let options = ListContainersOptions::<String> {
            all: true,
            ..Default::default()
        };
        let containers = self
            .runtime
            .block_on(self.docker.list_containers(Some(options)))?;
        debug!("list: {} containers", containers.len());
        Ok(containers.into_iter().map(to_summary).collect())
    }

    #[instrument(level = "debug", skip(self, image), fields(image = %image))]
    fn pull(&self, image: &ImageReference) -> EngineResult<()> {
        let options = CreateImageOptions {
            from_image: image.repository.as_str(),
            tag: image.tag.as_str(),
            ..Default::default()
        };
        self.runtime.block_on(async {
            let mut progress = pin!(self.docker.create_image(Some(options), None, None));
            while let Some(info) = progress.next().await {
                let info = info?;
                if let Some(message) = info.error {
                    return Err(EngineError::Daemon(message));
                }
                if let Some(status) = info.status {
                    trace!("pull: {} {}", status, info.progress.unwrap_or_default());
                }
            }
            Ok(())
        })
    }

    #[instrument(level = "debug", skip(self, spec), fields(name = %spec.name))]
    fn create(&self, spec: &ContainerSpec, options: &CreateOptions) -> EngineResult<String> {
        let create_options = CreateContainerOptions {
            name: spec.name.as_str(),
            platform: Some(options.platform.as_str()).filter(|p| !p.is_empty()),
        };
        let config = Config {
            image: Some(spec.image.as_str()),
            cmd: Some(spec.cmd.iter().map(String::as_str).collect()),
            working_dir: Some(options.working_dir.as_str()),
            ..Default::default()
        };
        let response = self
            .runtime
            .block_on(self.docker.create_container(Some(create_options), config))?;
        for warning in &response.warnings {
            warn!("create {}: {}", spec.name, warning);
        }
        Ok(response.id)
    }

    #[instrument(level = "debug", skip(self))]
    fn start(&self, id: &str) -> EngineResult<()> {
        let request = self
            .docker
            .start_container(id, None::<StartContainerOptions<String>>);
        already_done(self.runtime.block_on(request)).map_err(for_container(id))
    }

    #[instrument(level = "debug", skip(self))]
    fn stop(&self, id: &str, timeout_secs: i64) -> EngineResult<()> {
        let options = StopContainerOptions { t: timeout_secs };
        let request = self.docker.stop_container(id, Some(options));
        already_done(self.runtime.block_on(request)).map_err(for_container(id))
    }

    #[instrument(level = "debug", skip(self))]
    fn remove(&self, id: &str, force: bool) -> EngineResult<()> {
        let options = RemoveContainerOptions {
            force,
            ..Default::default()
        };
        self.runtime
            .block_on(self.docker.remove_container(id, Some(options)))
            .map_err(for_container(id))
    }

    #[instrument(level = "debug", skip(self, sink))]
    fn logs(&self, id: &str, follow: bool, sink: &mut dyn Write) -> EngineResult<()> {
        let options = LogsOptions::<String> {
            follow,
            stdout: true,
            stderr: true,
            tail: "all".to_string(),
            ..Default::default()
        };
        self.runtime.block_on(async {
            let mut stream = pin!(self.docker.logs(id, Some(options)));
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(for_container(id))?;
                sink.write_all(&chunk.into_bytes())
                    .map_err(EngineError::Output)?;
            }
            sink.flush().map_err(EngineError::Output)
        })
    }
}
