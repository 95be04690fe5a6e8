use std::collections::HashMap;
use std::env;
use std::io::Write;
use std::sync::{Mutex, Once};

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::{ContainerSpec, ContainerState, ContainerSummary, ImageReference};
use crate::infrastructure::traits::{ContainerEngine, CreateOptions};
use crate::infrastructure::{EngineError, EngineResult};

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    // Create a filter for noisy modules
    let noisy_modules = ["hyper", "bollard"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
    if env::var("RUST_LOG").is_err() {
        debug!("RUST_LOG not set, using debug");
    }
}

/// Build a listing entry for tests.
pub fn summary(id: &str, name: &str, state: &str, created: DateTime<Utc>) -> ContainerSummary {
    ContainerSummary {
        id: id.to_string(),
        name: name.to_string(),
        image: "alpine:latest".to_string(),
        state: ContainerState::parse(state),
        created,
    }
}

/// A call received by [`RecordingEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    List,
    Pull {
        repository: String,
        tag: String,
    },
    Create {
        image: String,
        name: String,
        cmd: Vec<String>,
        platform: String,
        working_dir: String,
    },
    Start(String),
    Stop {
        id: String,
        timeout_secs: i64,
    },
    Remove {
        id: String,
        force: bool,
    },
    Logs {
        id: String,
        follow: bool,
    },
}

/// In-memory [`ContainerEngine`] that records every call.
///
/// Created containers get the id `<name>-id`. Logs for unknown ids fail with
/// [`EngineError::NotFound`].
#[derive(Debug, Default)]
pub struct RecordingEngine {
    containers: Vec<ContainerSummary>,
    logs: HashMap<String, Vec<u8>>,
    failing: Option<&'static str>,
    calls: Mutex<Vec<EngineCall>>,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(mut self, container: ContainerSummary) -> Self {
        self.containers.push(container);
        self
    }

    pub fn with_logs(mut self, id: &str, bytes: &[u8]) -> Self {
        self.logs.insert(id.to_string(), bytes.to_vec());
        self
    }

    /// Make the named operation (`"list"`, `"pull"`, `"create"`, `"start"`,
    /// `"stop"`, `"remove"`, `"logs"`) fail after recording the call.
    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.failing = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, call: EngineCall) -> EngineResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.failing == Some(operation) {
            return Err(EngineError::Daemon(format!("{} failed", operation)));
        }
        Ok(())
    }
}

impl ContainerEngine for RecordingEngine {
    fn list(&self) -> EngineResult<Vec<ContainerSummary>> {
        self.record("list", EngineCall::List)?;
        Ok(self.containers.clone())
    }

    fn pull(&self, image: &ImageReference) -> EngineResult<()> {
        self.record(
            "pull",
            EngineCall::Pull {
                repository: image.repository.clone(),
                tag: image.tag.clone(),
            },
        )
    }

    fn create(&self, spec: &ContainerSpec, options: &CreateOptions) -> EngineResult<String> {
        self.record(
            "create",
            EngineCall::Create {
                image: spec.image.to_string(),
                name: spec.name.clone(),
                cmd: spec.cmd.clone(),
                platform: options.platform.clone(),
                working_dir: options.working_dir.clone(),
            },
        )?;
        Ok(format!("{}-id", spec.name))
    }

    fn start(&self, id: &str) -> EngineResult<()> {
        self.record("start", EngineCall::Start(id.to_string()))
    }

    fn stop(&self, id: &str, timeout_secs: i64) -> EngineResult<()> {
        self.record(
            "stop",
            EngineCall::Stop {
                id: id.to_string(),
                timeout_secs,
            },
        )
    }

    fn remove(&self, id: &str, force: bool) -> EngineResult<()> {
        self.record(
            "remove",
            EngineCall::Remove {
                id: id.to_string(),
                force,
            },
        )
    }

    fn logs(&self, id: &str, follow: bool, sink: &mut dyn Write) -> EngineResult<()> {
        self.record(
            "logs",
            EngineCall::Logs {
                id: id.to_string(),
                follow,
            },
        )?;
        let bytes = self
            .logs
            .get(id)
            .ok_or_else(|| EngineError::NotFound(id.to_string()))?;
        sink.write_all(bytes).map_err(EngineError::Output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_test_setup() {
        init_test_setup();
    }

    #[test]
    fn test_recording_engine_fails_after_recording() {
        let engine = RecordingEngine::new().failing_on("start");
        assert!(engine.start("web").is_err());
        assert_eq!(engine.calls(), vec![EngineCall::Start("web".into())]);
    }
}
