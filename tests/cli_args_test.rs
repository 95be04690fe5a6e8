//! Tests for argument parsing: verbs, positional counts, usage errors

use std::path::PathBuf;

use rstest::rstest;

use pmdok::cli::args::ConfigCommands;
use pmdok::cli::{parse_args, CliError, Commands};
use pmdok::exitcode;

fn parse(args: &[&str]) -> Result<Commands, CliError> {
    let argv = std::iter::once("pmdok").chain(args.iter().copied());
    parse_args(argv).map(|cli| cli.command)
}

#[rstest]
#[case(&["list"], Commands::List)]
#[case(&["ls"], Commands::List)]
#[case(&["pull", "alpine:3.19"], Commands::Pull { image: "alpine:3.19".into() })]
#[case(&["start", "web"], Commands::Start { name: "web".into() })]
#[case(&["stop", "web"], Commands::Stop { time: None, name: "web".into() })]
#[case(&["stop", "-t", "3", "web"], Commands::Stop { time: Some(3), name: "web".into() })]
#[case(&["del", "web"], Commands::Del { name: "web".into() })]
#[case(&["rm", "web"], Commands::Del { name: "web".into() })]
#[case(&["log"], Commands::Log { follow: false, name: None })]
#[case(&["log", "web"], Commands::Log { follow: false, name: Some("web".into()) })]
#[case(&["logs", "-f", "web"], Commands::Log { follow: true, name: Some("web".into()) })]
#[case(&["config", "show"], Commands::Config { command: ConfigCommands::Show })]
fn given_complete_arguments_when_parsing_then_selects_verb(
    #[case] args: &[&str],
    #[case] expected: Commands,
) {
    assert_eq!(parse(args).unwrap(), expected);
}

#[test]
fn given_new_with_hyphenated_command_when_parsing_then_keeps_all_tokens() {
    // Act
    let command = parse(&["new", "alpine", "mybox", "/bin/sh", "-c", "echo hi"]).unwrap();

    // Assert
    assert_eq!(
        command,
        Commands::New {
            workdir: None,
            image: "alpine".into(),
            name: "mybox".into(),
            cmd: vec!["/bin/sh".into(), "-c".into(), "echo hi".into()],
        }
    );
}

#[test]
fn given_new_with_workdir_when_parsing_then_records_it() {
    let command = parse(&["new", "-w", "/srv/app", "alpine", "mybox", "ls"]).unwrap();

    match command {
        Commands::New { workdir, cmd, .. } => {
            assert_eq!(workdir, Some(PathBuf::from("/srv/app")));
            assert_eq!(cmd, vec!["ls".to_string()]);
        }
        other => panic!("expected new, got {:?}", other),
    }
}

#[rstest]
#[case(&["pull"], "<IMAGE>")]
#[case(&["start"], "<NAME>")]
#[case(&["stop"], "<NAME>")]
#[case(&["del"], "<NAME>")]
#[case(&["new"], "<IMAGE>")]
#[case(&["new", "alpine"], "<NAME>")]
#[case(&["new", "alpine", "mybox"], "<CMD>")]
fn given_missing_positional_when_parsing_then_names_the_parameter(
    #[case] args: &[&str],
    #[case] missing: &str,
) {
    // Act
    let err = parse(args).unwrap_err();

    // Assert
    match &err {
        CliError::MissingArgument { name, .. } => {
            assert!(name.contains(missing), "{} should mention {}", name, missing)
        }
        other => panic!("expected missing argument, got {:?}", other),
    }
    assert_eq!(err.exit_code(), exitcode::FAILURE);
}

#[test]
fn given_unknown_verb_when_parsing_then_usage_error_with_failure_code() {
    let err = parse(&["bogus"]).unwrap_err();

    assert!(matches!(err, CliError::Usage(_)));
    assert!(err.to_string().contains("bogus"));
    assert_eq!(err.exit_code(), exitcode::FAILURE);
}

#[test]
fn given_no_verb_when_parsing_then_usage_error_with_failure_code() {
    let err = parse(&[]).unwrap_err();

    match &err {
        CliError::Usage(text) => assert!(text.contains("Usage")),
        other => panic!("expected usage, got {:?}", other),
    }
    assert_eq!(err.exit_code(), exitcode::FAILURE);
}

#[test]
fn given_help_flag_when_parsing_then_help_with_success_code() {
    let err = parse(&["--help"]).unwrap_err();

    match &err {
        CliError::Help(text) => assert!(text.contains("pull")),
        other => panic!("expected help, got {:?}", other),
    }
    assert_eq!(err.exit_code(), exitcode::OK);
}

#[test]
fn given_debug_flags_when_parsing_then_counts_them() {
    let cli = parse_args(["pmdok", "-dd", "list"]).unwrap();
    assert_eq!(cli.debug, 2);
}
