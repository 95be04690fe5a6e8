//! CLI argument definitions using clap

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::cli::{CliError, CliResult};

/// Manage Docker containers: list, pull, create, start, stop, remove, logs
#[derive(Parser, Debug)]
#[command(name = "pmdok")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Config file (default: $XDG_CONFIG_HOME/pmdok/pmdok.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Engine endpoint, e.g. unix:///var/run/docker.sock or tcp://host:2375
    #[arg(short = 'H', long, global = true, env = "DOCKER_HOST")]
    pub host: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List containers with their state and age
    #[command(visible_alias = "ls")]
    List,

    /// Download an image
    Pull {
        /// Image reference, e.g. alpine:3.19
        image: String,
    },

    /// Create and start a container
    New {
        /// Working directory (default: current directory)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        workdir: Option<PathBuf>,
        /// Image to run
        image: String,
        /// Container name
        name: String,
        /// Command and its arguments
        #[arg(
            required = true,
            num_args = 1..,
            trailing_var_arg = true,
            allow_hyphen_values = true
        )]
        cmd: Vec<String>,
    },

    /// Start a stopped container
    Start {
        /// Container name or id
        name: String,
    },

    /// Stop a running container
    Stop {
        /// Seconds to wait before killing (default from config)
        #[arg(short = 't', long = "time")]
        time: Option<i64>,
        /// Container name or id
        name: String,
    },

    /// Remove a container
    #[command(visible_alias = "rm")]
    Del {
        /// Container name or id
        name: String,
    },

    /// Print container logs (all containers when no name is given)
    #[command(visible_alias = "logs")]
    Log {
        /// Keep streaming until the container stops
        #[arg(short, long)]
        follow: bool,
        /// Container name or id
        name: Option<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,

    /// Show config file path
    Path,
}

/// Parse a full argument vector (program name first).
///
/// Argument counts are validated by clap before any value is read; failures
/// come back as [`CliError`] rather than terminating the process.
pub fn parse_args<I, T>(args: I) -> CliResult<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Cli::try_parse_from(args).map_err(CliError::from)
}
