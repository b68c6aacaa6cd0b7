// tests/remote_executor.rs

use std::error::Error;

use posixkit::config::RemoteSection;
use posixkit::errors::PosixkitError;
use posixkit::exec::{Invocation, ProcessExecutor};
use posixkit::remote::RemoteExecutor;
use posixkit_test_utils::builders::ConfigFileBuilder;
use posixkit_test_utils::recording_executor::exited;
use posixkit_test_utils::{init_tracing, with_timeout, RecordingExecutor};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn remote_shell_runs_login_shell_with_command_on_stdin() -> TestResult {
    init_tracing();

    let fake = RecordingExecutor::replying(|_| exited(0, "remote says hi\n", ""));
    let seen = fake.invocations();
    let remote = RemoteExecutor::with_executor(fake, RemoteSection::default());

    let result = remote.run_remote_shell("build01", "uname -a\n").await;
    assert_eq!(result.stdout, b"remote says hi\n");

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen[0],
        Invocation::new("ssh")
            .arg("build01")
            .arg("sh -il")
            .stdin("uname -a\n")
    );
    Ok(())
}

#[tokio::test]
async fn download_prefixes_the_source_with_host() -> TestResult {
    init_tracing();

    let fake = RecordingExecutor::new();
    let seen = fake.invocations();
    let remote = RemoteExecutor::with_executor(fake, RemoteSection::default());

    remote
        .download_directory("db1", "/var/lib/app", "/tmp/app")
        .await?;

    let seen = seen.lock().unwrap();
    let inv = &seen[0];
    assert_eq!(inv.program(), "rsync");
    assert_eq!(
        inv.arguments(),
        ["-acrv", "--rsh=ssh", "db1:/var/lib/app/", "/tmp/app/"]
    );
    assert!(inv.stdin_bytes().is_empty());
    assert!(inv.working_dir().is_none());
    Ok(())
}

#[tokio::test]
async fn upload_prefixes_the_destination_with_host() -> TestResult {
    init_tracing();

    let fake = RecordingExecutor::new();
    let seen = fake.invocations();
    let remote = RemoteExecutor::with_executor(fake, RemoteSection::default());

    remote.upload_directory("db1", "./site", "/srv/www").await?;

    let seen = seen.lock().unwrap();
    assert_eq!(
        seen[0].arguments(),
        ["-acrv", "--rsh=ssh", "./site/", "db1:/srv/www/"]
    );
    Ok(())
}

#[tokio::test]
async fn trailing_slashes_are_not_doubled() -> TestResult {
    let remote = RemoteExecutor::with_executor(RecordingExecutor::new(), RemoteSection::default());

    let inv = remote.download_invocation("h", "/data/", "out/");
    assert_eq!(inv.arguments()[2..], ["h:/data/", "out/"]);
    Ok(())
}

#[tokio::test]
async fn configured_tools_and_flags_are_used() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .ssh("/usr/local/bin/ssh")
        .login_command("bash -l")
        .rsync("/opt/rsync")
        .rsync_flags(&["-az", "--delete"])
        .rsh("ssh -p 2222")
        .build();
    let remote = RemoteExecutor::with_executor(RecordingExecutor::new(), cfg.remote.clone());

    let sh = remote.remote_shell_invocation("edge", "id");
    assert_eq!(sh.program(), "/usr/local/bin/ssh");
    assert_eq!(sh.arguments(), ["edge", "bash -l"]);

    let up = remote.upload_invocation("edge", "a", "b");
    assert_eq!(up.program(), "/opt/rsync");
    assert_eq!(
        up.arguments(),
        ["-az", "--delete", "--rsh=ssh -p 2222", "a/", "edge:b/"]
    );
    Ok(())
}

#[tokio::test]
async fn failed_sync_surfaces_exit_code_and_stderr() -> TestResult {
    init_tracing();

    let fake = RecordingExecutor::replying(|_| exited(23, "", "some files vanished\n"));
    let remote = RemoteExecutor::with_executor(fake, RemoteSection::default());

    match remote.download_directory("h", "/a", "/b").await {
        Err(PosixkitError::NonZeroExit { program, code, stderr }) => {
            assert_eq!(program, "rsync");
            assert_eq!(code, 23);
            assert_eq!(stderr, "some files vanished\n");
        }
        other => panic!("expected NonZeroExit, got {:?}", other),
    }
    Ok(())
}

/// Real processes stand in for rsync: `echo` succeeds, `false` fails and a
/// missing binary cannot start.
#[tokio::test]
async fn mirror_result_follows_the_real_process() -> TestResult {
    init_tracing();

    let with_tool = |tool: &str| {
        let settings = RemoteSection {
            rsync: tool.to_string(),
            ..RemoteSection::default()
        };
        RemoteExecutor::with_executor(ProcessExecutor::new(), settings)
    };

    with_timeout(with_tool("echo").upload_directory("h", "/a", "/b")).await?;

    let err = with_timeout(with_tool("false").upload_directory("h", "/a", "/b"))
        .await
        .expect_err("false must fail the upload");
    assert!(matches!(err, PosixkitError::NonZeroExit { .. }), "got {:?}", err);

    let err = with_timeout(with_tool("/no/such/rsync").download_directory("h", "/a", "/b"))
        .await
        .expect_err("a missing tool must fail the download");
    assert!(matches!(err, PosixkitError::Spawn { .. }), "got {:?}", err);
    Ok(())
}
