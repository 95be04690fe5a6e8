//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Config file: `$XDG_CONFIG_HOME/pmdok/pmdok.toml`, or `--config <path>`
//! 3. Environment variables: `PMDOK_<SECTION>__<KEY>`
//! 4. `--host` / `DOCKER_HOST` on the command line

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::ApplicationError;

/// How to reach the container engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineSettings {
    /// Daemon endpoint (`unix:///var/run/docker.sock`, `tcp://host:2375`).
    /// `None` uses the local socket defaults, which honour `DOCKER_HOST`.
    pub host: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            host: None,
            timeout_secs: 120,
        }
    }
}

/// Defaults applied to container lifecycle calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContainerSettings {
    /// Platform passed on create
    pub platform: String,
    /// Seconds the engine waits before killing a stopping container
    pub stop_timeout_secs: i64,
    /// Remove running containers too
    pub force_remove: bool,
}

impl Default for ContainerSettings {
    fn default() -> Self {
        Self {
            platform: "linux".into(),
            stop_timeout_secs: 10,
            force_remove: true,
        }
    }
}

/// Unified configuration for pmdok.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub engine: EngineSettings,
    pub container: ContainerSettings,
}

/// Raw engine settings for intermediate parsing (`None` = not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawEngineSettings {
    pub host: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Raw container settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawContainerSettings {
    pub platform: Option<String>,
    pub stop_timeout_secs: Option<i64>,
    pub force_remove: Option<bool>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub engine: RawEngineSettings,
    pub container: RawContainerSettings,
}

/// Get the XDG config directory for pmdok.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pmdok").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pmdok.toml"))
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input untouched if expansion fails.
pub fn expand_env_vars(value: &str) -> String {
    shellexpand::full(value)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Overlay explicitly specified values onto self.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            engine: EngineSettings {
                host: overlay
                    .engine
                    .host
                    .clone()
                    .or_else(|| self.engine.host.clone()),
                timeout_secs: overlay
                    .engine
                    .timeout_secs
                    .unwrap_or(self.engine.timeout_secs),
            },
            container: ContainerSettings {
                platform: overlay
                    .container
                    .platform
                    .clone()
                    .unwrap_or_else(|| self.container.platform.clone()),
                stop_timeout_secs: overlay
                    .container
                    .stop_timeout_secs
                    .unwrap_or(self.container.stop_timeout_secs),
                force_remove: overlay
                    .container
                    .force_remove
                    .unwrap_or(self.container.force_remove),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit config file; must exist. When `None`, the
    ///   global XDG file is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        let file = match config_file {
            Some(path) if !path.exists() => {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                })
            }
            Some(path) => Some(path.to_path_buf()),
            None => global_config_path().filter(|p| p.exists()),
        };
        if let Some(path) = file {
            debug!("load: config file {}", path.display());
            let raw = load_raw_settings(&path)?;
            current = current.merge_with(&raw);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply an endpoint given on the command line (`--host` or `DOCKER_HOST`).
    ///
    /// Applied after [`Settings::load`], so it wins over every configured layer.
    pub fn with_host_override(mut self, host: Option<&str>) -> Self {
        if let Some(host) = host.filter(|h| !h.trim().is_empty()) {
            self.engine.host = Some(host.to_string());
        }
        self
    }

    /// Apply `PMDOK_<SECTION>__<KEY>` environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("PMDOK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("engine.host") {
            settings.engine.host = Some(val);
        }
        if let Ok(val) = config.get::<u64>("engine.timeout_secs") {
            settings.engine.timeout_secs = val;
        }
        if let Ok(val) = config.get_string("container.platform") {
            settings.container.platform = val;
        }
        if let Ok(val) = config.get::<i64>("container.stop_timeout_secs") {
            settings.container.stop_timeout_secs = val;
        }
        if let Ok(val) = config.get_bool("container.force_remove") {
            settings.container.force_remove = val;
        }

        Ok(settings)
    }

    fn expand_paths(&mut self) {
        if let Some(host) = self.engine.host.as_deref() {
            self.engine.host = Some(expand_env_vars(host));
        }
    }

    /// Render as TOML (for `config` display and templates).
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }
}
