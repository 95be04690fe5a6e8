//! Tests for command dispatch: each verb reaches exactly one facade operation

use std::sync::Arc;

use chrono::Utc;
use rstest::rstest;
use tempfile::TempDir;

use pmdok::cli::commands::execute_command;
use pmdok::cli::{parse_args, CliError};
use pmdok::config::Settings;
use pmdok::domain::container_path;
use pmdok::exitcode;
use pmdok::infrastructure::di::ServiceContainer;
use pmdok::infrastructure::traits::RealFileSystem;
use pmdok::util::testing::{init_test_setup, summary, EngineCall, RecordingEngine};

fn run(args: &[&str], engine: Arc<RecordingEngine>) -> Result<(), CliError> {
    init_test_setup();
    let argv = std::iter::once("pmdok").chain(args.iter().copied());
    let cli = parse_args(argv)?;
    let services = ServiceContainer::with_deps(Settings::default(), Arc::new(RealFileSystem), engine);
    execute_command(&cli, &services)
}

#[rstest]
#[case(&["list"], vec![EngineCall::List])]
#[case(&["pull", "alpine:3.19"], vec![EngineCall::Pull { repository: "alpine".into(), tag: "3.19".into() }])]
#[case(&["start", "web"], vec![EngineCall::Start("web".into())])]
#[case(&["stop", "web"], vec![EngineCall::Stop { id: "web".into(), timeout_secs: 10 }])]
#[case(&["stop", "--time", "1", "web"], vec![EngineCall::Stop { id: "web".into(), timeout_secs: 1 }])]
#[case(&["del", "web"], vec![EngineCall::Remove { id: "web".into(), force: true }])]
fn given_verb_when_dispatching_then_calls_matching_operation_once(
    #[case] args: &[&str],
    #[case] expected: Vec<EngineCall>,
) {
    // Arrange
    let engine = Arc::new(RecordingEngine::new());

    // Act
    run(args, engine.clone()).unwrap();

    // Assert
    assert_eq!(engine.calls(), expected);
}

#[test]
fn given_new_with_workdir_when_dispatching_then_creates_and_starts() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let workdir = temp.path().to_string_lossy().to_string();
    let engine = Arc::new(RecordingEngine::new());

    // Act
    run(
        &["new", "--workdir", workdir.as_str(), "alpine", "mybox", "/bin/sh", "-c", "echo hi"],
        engine.clone(),
    )
    .unwrap();

    // Assert
    assert_eq!(
        engine.calls(),
        vec![
            EngineCall::Create {
                image: "alpine".into(),
                name: "mybox".into(),
                cmd: vec!["/bin/sh".into(), "-c".into(), "echo hi".into()],
                platform: "linux".into(),
                working_dir: container_path(temp.path()),
            },
            EngineCall::Start("mybox-id".into()),
        ]
    );
}

#[test]
fn given_new_without_workdir_when_dispatching_then_uses_current_dir() {
    let engine = Arc::new(RecordingEngine::new());

    run(&["new", "alpine", "mybox", "true"], engine.clone()).unwrap();

    let cwd = std::env::current_dir().unwrap();
    match &engine.calls()[0] {
        EngineCall::Create { working_dir, .. } => {
            assert_eq!(working_dir, &container_path(&cwd))
        }
        other => panic!("expected create, got {:?}", other),
    }
}

#[test]
fn given_new_with_missing_workdir_when_dispatching_then_fails_without_engine_call() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("gone").to_string_lossy().to_string();
    let engine = Arc::new(RecordingEngine::new());

    let err = run(&["new", "-w", missing.as_str(), "alpine", "mybox", "true"], engine.clone()).unwrap_err();

    assert!(err.to_string().contains("working directory does not exist"));
    assert_eq!(err.exit_code(), exitcode::FAILURE);
    assert!(engine.calls().is_empty());
}

#[test]
fn given_log_without_name_when_dispatching_then_streams_every_container() {
    let now = Utc::now();
    let engine = Arc::new(
        RecordingEngine::new()
            .with_container(summary("a1", "web", "running", now))
            .with_logs("a1", b""),
    );

    run(&["log"], engine.clone()).unwrap();

    assert_eq!(
        engine.calls(),
        vec![
            EngineCall::List,
            EngineCall::Logs {
                id: "a1".into(),
                follow: false
            }
        ]
    );
}

#[test]
fn given_engine_failure_when_dispatching_then_failure_exit_code() {
    let engine = Arc::new(RecordingEngine::new().failing_on("start"));

    let err = run(&["start", "web"], engine.clone()).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::FAILURE);
    assert_eq!(err.to_string(), "start container: engine returned an error: start failed");
}

#[test]
fn given_unknown_verb_when_dispatching_then_no_engine_call() {
    let engine = Arc::new(RecordingEngine::new());

    let err = run(&["frobnicate"], engine.clone()).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::FAILURE);
    assert!(engine.calls().is_empty());
}

#[test]
fn given_config_show_when_dispatching_then_no_engine_call() {
    let engine = Arc::new(RecordingEngine::new());

    run(&["config", "show"], engine.clone()).unwrap();

    assert!(engine.calls().is_empty());
}
