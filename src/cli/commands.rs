//! Command dispatch: one facade call per verb

use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::{output, CliResult};
use crate::config::{expand_env_vars, global_config_path};
use crate::domain::{short_id, ContainerSpec, LogTarget};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli, services: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Commands::List => cmd_list(services),
        Commands::Pull { image } => cmd_pull(services, image),
        Commands::New {
            workdir,
            image,
            name,
            cmd,
        } => cmd_new(services, workdir.as_deref(), image, name, cmd),
        Commands::Start { name } => cmd_start(services, name),
        Commands::Stop { time, name } => cmd_stop(services, name, *time),
        Commands::Del { name } => cmd_del(services, name),
        Commands::Log { follow, name } => cmd_log(services, name.as_deref(), *follow),
        Commands::Config { command } => cmd_config(services, command, cli.config.as_deref()),
        Commands::Completion { shell } => cmd_completion(*shell),
    }
}

#[instrument(skip(services))]
fn cmd_list(services: &ServiceContainer) -> CliResult<()> {
    let containers = services.containers().list()?;
    debug!("list: {} containers", containers.len());
    let now = Utc::now();
    for container in &containers {
        if container.state.is_running() {
            output::success(&container.describe(now));
        } else {
            output::failure(&container.describe(now));
        }
    }
    Ok(())
}

#[instrument(skip(services))]
fn cmd_pull(services: &ServiceContainer, image: &str) -> CliResult<()> {
    let report = services.containers().pull(image)?;
    output::action(
        "downloaded image",
        &format!("{} / {:.3}s", report.image, report.elapsed.as_secs_f64()),
    );
    Ok(())
}

#[instrument(skip(services))]
fn cmd_new(
    services: &ServiceContainer,
    workdir: Option<&Path>,
    image: &str,
    name: &str,
    cmd: &[String],
) -> CliResult<()> {
    let facade = services.containers();
    let working_dir = match workdir {
        Some(dir) => PathBuf::from(expand_env_vars(&dir.to_string_lossy())),
        None => facade.default_working_dir()?,
    };
    let spec = ContainerSpec::new(image, name, working_dir, cmd.to_vec())
        .map_err(ApplicationError::from)?;

    let created = facade.create_and_start(spec)?;
    output::action("create container", &created.name);
    output::detail(&format!(
        "id {}, workdir {}",
        short_id(&created.id),
        created.working_dir.display()
    ));
    Ok(())
}

#[instrument(skip(services))]
fn cmd_start(services: &ServiceContainer, name: &str) -> CliResult<()> {
    services.containers().start(name)?;
    output::action("started container", name);
    Ok(())
}

#[instrument(skip(services))]
fn cmd_stop(services: &ServiceContainer, name: &str, time: Option<i64>) -> CliResult<()> {
    services.containers().stop(name, time)?;
    output::action("stopped container", name);
    Ok(())
}

#[instrument(skip(services))]
fn cmd_del(services: &ServiceContainer, name: &str) -> CliResult<()> {
    services.containers().remove(name)?;
    output::action("removed container", name);
    Ok(())
}

#[instrument(skip(services))]
fn cmd_log(services: &ServiceContainer, name: Option<&str>, follow: bool) -> CliResult<()> {
    let target = LogTarget::from_name(name);
    let mut stdout = io::stdout().lock();
    let streamed = services.containers().logs(&target, follow, &mut stdout)?;
    debug!("log: streamed {} containers", streamed);
    Ok(())
}

fn cmd_config(
    services: &ServiceContainer,
    command: &ConfigCommands,
    explicit: Option<&Path>,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&services.settings.to_toml()?);
        }
        ConfigCommands::Path => match explicit.map(Path::to_path_buf).or_else(global_config_path) {
            Some(path) if path.exists() => output::info(&path.display()),
            Some(path) => {
                output::info(&path.display());
                output::warning(&"file does not exist, using defaults");
            }
            None => output::warning(&"no config directory for this platform"),
        },
    }
    Ok(())
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
