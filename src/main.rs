use std::{env, process};

use pmdok::cli::commands::execute_command;
use pmdok::cli::{parse_args, CliResult};
use pmdok::config::Settings;
use pmdok::infrastructure::di::ServiceContainer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn main() {
    if let Err(e) = run() {
        e.report();
        process::exit(e.exit_code());
    }
}

fn run() -> CliResult<()> {
    let cli = parse_args(env::args_os())?;

    setup_logging(cli.debug);

    let settings = Settings::load(cli.config.as_deref())?.with_host_override(cli.host.as_deref());
    tracing::debug!("settings: {:?}", settings);

    let services = ServiceContainer::new(settings)?;
    execute_command(&cli, &services)
}

fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        3 => LevelFilter::TRACE,
        _ => {
            eprintln!("Don't be crazy, max is -d -d -d");
            LevelFilter::TRACE
        }
    };

    // hyper and bollard are chatty below debug
    let noisy_modules = ["hyper", "hyper_util", "bollard"];
    let module_filter = filter_fn(move |metadata| {
        verbosity > 2
            || !noisy_modules
                .iter()
                .any(|name| metadata.target().starts_with(name))
    });

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(false)
        .with_span_events(FmtSpan::CLOSE);

    let filtered_layer = fmt_layer.with_filter(filter).with_filter(module_filter);

    tracing_subscriber::registry().with(filtered_layer).init();

    match filter {
        LevelFilter::INFO => tracing::info!("Debug mode: info"),
        LevelFilter::DEBUG => tracing::debug!("Debug mode: debug"),
        LevelFilter::TRACE => tracing::debug!("Debug mode: trace"),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use pmdok::cli::Cli;
    use pmdok::util::testing;

    // https://docs.rs/clap/latest/clap/_derive/_tutorial/index.html#testing
    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        testing::init_test_setup();
        Cli::command().debug_assert();
    }
}
