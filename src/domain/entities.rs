//! Domain entities: core data structures

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};

use crate::domain::{DomainError, ImageReference};

/// Lifecycle state as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    Other(String),
}

impl ContainerState {
    pub fn parse(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "created" => Self::Created,
            "running" => Self::Running,
            "paused" => Self::Paused,
            "restarting" => Self::Restarting,
            "removing" => Self::Removing,
            "exited" => Self::Exited,
            "dead" => Self::Dead,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Restarting => "restarting",
            Self::Removing => "removing",
            Self::Exited => "exited",
            Self::Dead => "dead",
            Self::Other(s) => s.as_str(),
        };
        f.write_str(s)
    }
}

/// One row of the container listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSummary {
    pub id: String,
    /// Primary name without the engine's leading `/`
    pub name: String,
    pub image: String,
    pub state: ContainerState,
    pub created: DateTime<Utc>,
}

impl ContainerSummary {
    /// Time elapsed since creation, as seen at `now`.
    pub fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.created)
    }

    /// Plain status text: `web (running for ~5m)` or `web (stopped ~2h ago)`.
    pub fn describe(&self, now: DateTime<Utc>) -> String {
        let age = format_age(self.age_at(now));
        if self.state.is_running() {
            format!("{} (running for {})", self.name, age)
        } else {
            format!("{} (stopped {} ago)", self.name, age)
        }
    }
}

/// Derive a display name from the engine's name list, falling back to the short id.
pub fn display_name(names: &[String], id: &str) -> String {
    names
        .first()
        .map(|n| n.trim_start_matches('/').to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| short_id(id).to_string())
}

/// First 12 characters of a container id.
pub fn short_id(id: &str) -> &str {
    id.get(..12).unwrap_or(id)
}

/// Coarse, single-unit age: `~42s`, `~5m`, `~3h`, `~2d`.
///
/// Negative ages (clock skew between host and daemon) render as `~0s`.
pub fn format_age(age: Duration) -> String {
    let secs = age.num_seconds().max(0);
    match secs {
        s if s < 60 => format!("~{}s", s),
        s if s < 3_600 => format!("~{}m", s / 60),
        s if s < 86_400 => format!("~{}h", s / 3_600),
        s => format!("~{}d", s / 86_400),
    }
}

/// Everything needed to create a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec {
    pub image: ImageReference,
    pub name: String,
    /// Host directory, resolved to an absolute path by the facade
    pub working_dir: PathBuf,
    pub cmd: Vec<String>,
}

impl ContainerSpec {
    pub fn new(
        image: &str,
        name: &str,
        working_dir: impl Into<PathBuf>,
        cmd: Vec<String>,
    ) -> Result<Self, DomainError> {
        let image = ImageReference::parse(image)?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::EmptyContainerName);
        }
        if cmd.is_empty() {
            return Err(DomainError::EmptyCommand);
        }
        Ok(Self {
            image,
            name: name.to_string(),
            working_dir: working_dir.into(),
            cmd,
        })
    }
}

/// Which containers a log request covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Single(String),
    All,
}

impl LogTarget {
    pub fn from_name(name: Option<&str>) -> Self {
        match name {
            Some(n) => Self::Single(n.to_string()),
            None => Self::All,
        }
    }
}

/// Render a host path for the engine, which always expects `/` separators.
pub fn container_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn summary(state: &str, created: DateTime<Utc>) -> ContainerSummary {
        ContainerSummary {
            id: "0123456789abcdef".into(),
            name: "web".into(),
            image: "nginx".into(),
            state: ContainerState::parse(state),
            created,
        }
    }

    #[rstest]
    #[case(0, "~0s")]
    #[case(59, "~59s")]
    #[case(60, "~1m")]
    #[case(5 * 60 + 30, "~5m")]
    #[case(3_600, "~1h")]
    #[case(86_399, "~23h")]
    #[case(3 * 86_400, "~3d")]
    #[case(-15, "~0s")]
    fn test_format_age(#[case] secs: i64, #[case] expected: &str) {
        assert_eq!(format_age(Duration::seconds(secs)), expected);
    }

    #[test]
    fn test_describe_running_and_stopped() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let created = now - Duration::minutes(5);

        assert_eq!(
            summary("running", created).describe(now),
            "web (running for ~5m)"
        );
        assert_eq!(
            summary("exited", created).describe(now),
            "web (stopped ~5m ago)"
        );
    }

    #[test]
    fn test_state_parse_keeps_unknown_values() {
        assert_eq!(ContainerState::parse("Running"), ContainerState::Running);
        assert_eq!(
            ContainerState::parse("hibernating"),
            ContainerState::Other("hibernating".into())
        );
        assert!(!ContainerState::parse("paused").is_running());
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name(&["/web".into()], "abc"), "web");
        assert_eq!(display_name(&[], "0123456789abcdef"), "0123456789ab");
        assert_eq!(display_name(&["/".into()], "abc"), "abc");
    }

    #[test]
    fn test_container_spec_validation() {
        assert_eq!(
            ContainerSpec::new("alpine", " ", "/tmp", vec!["sh".into()]),
            Err(DomainError::EmptyContainerName)
        );
        assert_eq!(
            ContainerSpec::new("alpine", "box", "/tmp", vec![]),
            Err(DomainError::EmptyCommand)
        );
        let spec = ContainerSpec::new("alpine", "box", "/tmp", vec!["sh".into()]).unwrap();
        assert_eq!(spec.image.tag, "latest");
    }

    #[test]
    fn test_container_path_uses_forward_slashes() {
        assert_eq!(container_path(Path::new(r"C:\work\proj")), "C:/work/proj");
        assert_eq!(container_path(Path::new("/home/me")), "/home/me");
    }
}
