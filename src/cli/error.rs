//! CLI-level errors (wraps infrastructure errors)

use clap::error::{ContextKind, ContextValue, ErrorKind};
use thiserror::Error;

use crate::application::ApplicationError;
use crate::cli::output;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("missing argument: {name}")]
    MissingArgument { name: String, usage: String },

    /// Unknown or missing verb, malformed flags; carries clap's rendered message.
    #[error("{0}")]
    Usage(String),

    /// `--help` / `--version` output; not a failure.
    #[error("{0}")]
    Help(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<clap::Error> for CliError {
    fn from(err: clap::Error) -> Self {
        match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                CliError::Help(err.render().to_string())
            }
            ErrorKind::MissingRequiredArgument => {
                let name = match err.get(ContextKind::InvalidArg) {
                    Some(ContextValue::Strings(names)) => names.join(", "),
                    Some(ContextValue::String(name)) => name.clone(),
                    _ => "argument".to_string(),
                };
                let usage = match err.get(ContextKind::Usage) {
                    Some(ContextValue::StyledStr(usage)) => usage.to_string(),
                    _ => String::new(),
                };
                CliError::MissingArgument { name, usage }
            }
            _ => CliError::Usage(err.render().to_string()),
        }
    }
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Help(_) => crate::exitcode::OK,
            CliError::Infra(_) | CliError::MissingArgument { .. } | CliError::Usage(_) => {
                crate::exitcode::FAILURE
            }
        }
    }

    /// Print the error where it belongs: help to stdout, everything else to stderr.
    pub fn report(&self) {
        match self {
            CliError::Help(text) => print!("{}", text),
            CliError::Usage(text) => eprint!("{}", text),
            CliError::MissingArgument { usage, .. } => {
                output::error(self);
                if !usage.is_empty() {
                    eprintln!("\n{}", usage);
                }
            }
            CliError::Infra(_) => output::error(self),
        }
    }
}
