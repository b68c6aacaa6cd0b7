// tests/shell_runner.rs

use std::error::Error;

use posixkit::config::ShellSection;
use posixkit::exec::{Invocation, Outcome};
use posixkit::shell::{run_shell, ShellRunner};
use posixkit_test_utils::builders::ConfigFileBuilder;
use posixkit_test_utils::{init_tracing, with_timeout, RecordingExecutor};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn script_is_piped_into_sh() -> TestResult {
    init_tracing();

    let result = with_timeout(run_shell("echo hi\necho oops >&2\nexit 3\n")).await;

    assert_eq!(result.stdout, b"hi\n");
    assert_eq!(result.stderr, b"oops\n");
    assert!(matches!(result.outcome, Outcome::Exited(3)));
    Ok(())
}

#[tokio::test]
async fn shell_state_carries_across_script_lines() -> TestResult {
    init_tracing();

    let runner = ShellRunner::new();
    let result = with_timeout(runner.run_shell("x=41\nx=$((x+1))\necho $x\n")).await;

    assert_eq!(result.stdout, b"42\n");
    assert!(result.success());
    Ok(())
}

#[tokio::test]
async fn runner_invokes_interpreter_without_args_or_dir() -> TestResult {
    init_tracing();

    let fake = RecordingExecutor::new();
    let seen = fake.invocations();
    let runner = ShellRunner::with_executor(fake, &ShellSection::default());

    let result = runner.run_shell("ls -l\n").await;
    assert!(result.success());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], Invocation::new("sh").stdin("ls -l\n"));
    assert!(seen[0].arguments().is_empty());
    assert!(seen[0].working_dir().is_none());
    Ok(())
}

#[tokio::test]
async fn configured_interpreter_is_used() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new().shell("bash").build();
    let fake = RecordingExecutor::new();
    let seen = fake.invocations();
    let runner = ShellRunner::with_executor(fake, &cfg.shell);

    runner.run_shell("true").await;

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].program(), "bash");
    assert_eq!(seen[0].stdin_bytes(), b"true");
    Ok(())
}

#[tokio::test]
async fn from_config_applies_default_timeout() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new().timeout("200ms").build();
    let runner = ShellRunner::from_config(&cfg);

    let result = with_timeout(runner.run_shell("exec sleep 10\n")).await;
    assert!(matches!(result.outcome, Outcome::TimedOut(_)), "got {:?}", result.outcome);
    Ok(())
}
