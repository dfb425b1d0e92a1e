mod common;

use common::{FakeEngine, LocalBackend, sample_document, sample_results};
use lumen_engine::cli::{CliError, Console, ScriptOptions, run_script};
use lumen_engine::executor::CommandExecutor;
use std::cell::RefCell;

const SCRIPT: &str = "\
# audit the landing page
check

select 9.1
select 1.1
";

fn backend() -> LocalBackend {
    LocalBackend::new(FakeEngine::returning(sample_results()), sample_document())
}

#[tokio::test]
async fn test_script_stops_at_first_failure() {
    let mut backend = backend();
    let mut executor = CommandExecutor::new();
    let out = RefCell::new(Vec::new());
    let err = RefCell::new(Vec::new());
    let mut console = Console::new(
        |msg| out.borrow_mut().push(msg.to_string()),
        |msg| err.borrow_mut().push(msg.to_string()),
    );

    let result = run_script(
        &mut backend,
        &mut executor,
        &mut console,
        SCRIPT,
        ScriptOptions {
            stop_on_error: true,
        },
    )
    .await;
    drop(console);

    match result {
        Err(CliError::Script { line, command, .. }) => {
            assert_eq!(line, 4);
            assert_eq!(command, "select 9.1");
        }
        other => panic!("Expected script failure, got {:?}", other),
    }
    assert_eq!(out.borrow().len(), 1);
    assert!(out.borrow()[0].starts_with("Found 1 contrast issues:"));
    let errors = err.borrow();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("line 4 ('select 9.1'): "), "{}", errors[0]);
    assert!(errors[0].ends_with("(hint: Use 'show' to list the rows)"), "{}", errors[0]);
}

#[tokio::test]
async fn test_keep_going_runs_every_line() {
    let mut backend = backend();
    let mut executor = CommandExecutor::new();
    let out = RefCell::new(Vec::new());
    let mut console = Console::new(|msg| out.borrow_mut().push(msg.to_string()), |_| {});

    run_script(
        &mut backend,
        &mut executor,
        &mut console,
        SCRIPT,
        ScriptOptions {
            stop_on_error: false,
        },
    )
    .await
    .unwrap();
    drop(console);

    let out = out.into_inner();
    assert_eq!(out.len(), 2);
    assert_eq!(out[1], "Selected #lead");
}
