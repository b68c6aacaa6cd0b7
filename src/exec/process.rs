// src/exec/process.rs

//! Single-invocation process runner.
//!
//! The child's stdin, stdout and stderr are each backed by a fixed-size
//! kernel pipe buffer. Reading one stream to EOF before touching the other
//! deadlocks as soon as the child fills the buffer of the stream nobody is
//! reading, so the payload writer and both drains are always polled
//! together and only joined once all three are finished.

use std::io;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::exec::invocation::Invocation;
use crate::exec::result::{ExecutionResult, Outcome};
use crate::types::PipeStage;

/// Run `invocation` to completion and collect everything it produced.
///
/// Never panics and never retries: every failure is reported through
/// [`ExecutionResult::outcome`], alongside whatever text was read before it.
pub async fn execute(invocation: &Invocation) -> ExecutionResult {
    run(invocation, invocation.timeout_after()).await
}

pub(crate) async fn run(invocation: &Invocation, timeout: Option<Duration>) -> ExecutionResult {
    let program = invocation.program();

    info!(
        program = %program,
        args = ?invocation.arguments(),
        dir = ?invocation.working_dir(),
        stdin_bytes = invocation.stdin_bytes().len(),
        "starting process"
    );

    let mut cmd = Command::new(program);
    cmd.args(invocation.arguments())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = invocation.working_dir() {
        cmd.current_dir(dir);
    }

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            warn!(program = %program, error = %err, "failed to start process");
            return ExecutionResult::start_failed(err);
        }
    };

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let payload = invocation.stdin_bytes();

    let outcome = match timeout {
        None => communicate(&mut child, payload, &mut stdout, &mut stderr).await,
        Some(limit) => {
            let pending = communicate(&mut child, payload, &mut stdout, &mut stderr);
            match tokio::time::timeout(limit, pending).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    // The pipe futures are gone by now, so every stream
                    // endpoint is already closed; only the process is left.
                    warn!(program = %program, timeout = ?limit, "process timed out; killing");
                    if let Err(err) = child.kill().await {
                        warn!(program = %program, error = %err, "failed to kill timed-out process");
                    }
                    Outcome::TimedOut(limit)
                }
            }
        }
    };

    match &outcome {
        Outcome::Exited(code) => info!(
            program = %program,
            exit_code = code,
            success = *code == 0,
            stdout_bytes = stdout.len(),
            stderr_bytes = stderr.len(),
            "process exited"
        ),
        Outcome::Signaled(signal) => info!(program = %program, signal, "process terminated by signal"),
        Outcome::IoFailed { stage, source } => {
            warn!(program = %program, stage = %stage, error = %source, "process I/O failed")
        }
        Outcome::TimedOut(_) | Outcome::StartFailed(_) => {}
    }

    ExecutionResult::new(stdout, stderr, outcome)
}

/// Feed the payload, drain both outputs, then reap the child.
///
/// Wait-for-exit is strictly ordered after all three stream tasks.
async fn communicate(
    child: &mut Child,
    payload: &[u8],
    stdout_buf: &mut Vec<u8>,
    stderr_buf: &mut Vec<u8>,
) -> Outcome {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let (fed, out, err) = tokio::join!(
        feed_stdin(stdin, payload),
        drain(stdout, stdout_buf, PipeStage::Stdout),
        drain(stderr, stderr_buf, PipeStage::Stderr),
    );

    if let Some((stage, source)) = first_failure(fed, out, err) {
        // Streams are closed; make sure the child does not linger on
        // whatever it was doing before we reap it.
        if let Err(e) = child.start_kill() {
            debug!(stage = %stage, error = %e, "kill after pipe failure did not apply");
        }
        if let Err(e) = child.wait().await {
            debug!(stage = %stage, error = %e, "reaping after pipe failure failed");
        }
        return Outcome::IoFailed { stage, source };
    }

    match child.wait().await {
        Ok(status) => outcome_from_status(status),
        Err(source) => Outcome::IoFailed {
            stage: PipeStage::Wait,
            source,
        },
    }
}

/// Pick the stream failure that decides the outcome: stdin, then stdout,
/// then stderr. The others are dropped.
fn first_failure(
    fed: io::Result<()>,
    out: io::Result<()>,
    err: io::Result<()>,
) -> Option<(PipeStage, io::Error)> {
    [
        (PipeStage::Stdin, fed),
        (PipeStage::Stdout, out),
        (PipeStage::Stderr, err),
    ]
    .into_iter()
    .find_map(|(stage, res)| res.err().map(|source| (stage, source)))
}

/// Write the whole payload, then close the pipe so the child sees EOF.
///
/// A broken pipe means the child exited or closed its input without reading
/// everything; that is the child's business, not an executor fault.
async fn feed_stdin<W>(stdin: Option<W>, payload: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let Some(mut stdin) = stdin else {
        return Ok(());
    };

    let written = match stdin.write_all(payload).await {
        Ok(()) => stdin.flush().await,
        Err(err) => Err(err),
    };
    drop(stdin);

    match written {
        Err(err) if err.kind() == io::ErrorKind::BrokenPipe => {
            debug!(
                payload_bytes = payload.len(),
                "child closed stdin before consuming the payload"
            );
            Ok(())
        }
        other => other,
    }
}

/// Read `reader` to EOF, appending into `buf`.
///
/// Bytes read before an error stay in `buf`.
async fn drain<R>(reader: Option<R>, buf: &mut Vec<u8>, stage: PipeStage) -> io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(());
    };
    let n = reader.read_to_end(buf).await?;
    debug!(stream = %stage, bytes = n, "stream drained");
    Ok(())
}

/// Map a reaped status to an outcome.
///
/// Unix statuses always carry an exit code or a signal, and Windows ones
/// always carry a code. Anything else is reported as a failed wait rather
/// than with a made-up exit code.
fn outcome_from_status(status: ExitStatus) -> Outcome {
    if let Some(code) = status.code() {
        return Outcome::Exited(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return Outcome::Signaled(signal);
        }
    }

    Outcome::IoFailed {
        stage: PipeStage::Wait,
        source: io::Error::other(format!(
            "exit status {:?} has neither a code nor a signal",
            status
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use tokio::io::ReadBuf;

    use super::*;

    /// Hands out the scripted chunks in order, then reports EOF.
    struct ScriptedReader {
        steps: VecDeque<io::Result<&'static [u8]>>,
    }

    impl ScriptedReader {
        fn new(steps: Vec<io::Result<&'static [u8]>>) -> Self {
            Self {
                steps: steps.into(),
            }
        }
    }

    impl AsyncRead for ScriptedReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            match self.steps.pop_front() {
                Some(Ok(bytes)) => {
                    buf.put_slice(bytes);
                    Poll::Ready(Ok(()))
                }
                Some(Err(err)) => Poll::Ready(Err(err)),
                None => Poll::Ready(Ok(())),
            }
        }
    }

    /// Accepts `accept` bytes, then fails every write with `kind`.
    struct FailingWriter {
        accept: usize,
        kind: io::ErrorKind,
    }

    impl AsyncWrite for FailingWriter {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            if self.accept == 0 {
                return Poll::Ready(Err(io::Error::from(self.kind)));
            }
            let n = buf.len().min(self.accept);
            self.accept -= n;
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn failed(kind: io::ErrorKind) -> io::Result<()> {
        Err(io::Error::from(kind))
    }

    #[test]
    fn first_failure_prefers_stdin_then_stdout_then_stderr() {
        use io::ErrorKind::{BrokenPipe, Interrupted, UnexpectedEof};

        let (stage, source) =
            first_failure(failed(Interrupted), failed(UnexpectedEof), failed(BrokenPipe))
                .expect("a failure");
        assert_eq!(stage, PipeStage::Stdin);
        assert_eq!(source.kind(), Interrupted);

        let (stage, source) =
            first_failure(Ok(()), failed(UnexpectedEof), failed(BrokenPipe)).expect("a failure");
        assert_eq!(stage, PipeStage::Stdout);
        assert_eq!(source.kind(), UnexpectedEof);

        let (stage, _) = first_failure(Ok(()), Ok(()), failed(BrokenPipe)).expect("a failure");
        assert_eq!(stage, PipeStage::Stderr);

        assert!(first_failure(Ok(()), Ok(()), Ok(())).is_none());
    }

    #[tokio::test]
    async fn drain_keeps_bytes_read_before_an_error() {
        let reader = ScriptedReader::new(vec![
            Ok(&b"par"[..]),
            Ok(&b"tial"[..]),
            Err(io::Error::from(io::ErrorKind::ConnectionReset)),
            Ok(&b"never read"[..]),
        ]);
        let mut buf = Vec::new();

        let err = drain(Some(reader), &mut buf, PipeStage::Stdout)
            .await
            .expect_err("the read error must come back");

        assert_eq!(err.kind(), io::ErrorKind::ConnectionReset);
        assert_eq!(buf, b"partial");
    }

    #[tokio::test]
    async fn drain_reads_to_eof_and_tolerates_a_missing_stream() {
        let reader = ScriptedReader::new(vec![Ok(&b"\xff\x00raw"[..]), Ok(&b"\n"[..])]);
        let mut buf = b"kept:".to_vec();

        drain(Some(reader), &mut buf, PipeStage::Stderr).await.expect("clean EOF");
        assert_eq!(buf, b"kept:\xff\x00raw\n");

        let mut untouched = Vec::new();
        drain(None::<ScriptedReader>, &mut untouched, PipeStage::Stdout)
            .await
            .expect("no stream is not an error");
        assert!(untouched.is_empty());
    }

    #[tokio::test]
    async fn broken_pipe_on_stdin_is_not_a_failure() {
        let writer = FailingWriter {
            accept: 3,
            kind: io::ErrorKind::BrokenPipe,
        };

        feed_stdin(Some(writer), b"payload that is never fully read")
            .await
            .expect("a child closing its input is not an executor fault");
    }

    #[tokio::test]
    async fn other_stdin_errors_are_reported() {
        let writer = FailingWriter {
            accept: 0,
            kind: io::ErrorKind::PermissionDenied,
        };

        let err = feed_stdin(Some(writer), b"data")
            .await
            .expect_err("a real write failure must surface");
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn empty_payload_and_missing_stdin_are_fine() {
        let writer = FailingWriter {
            accept: 0,
            kind: io::ErrorKind::PermissionDenied,
        };
        feed_stdin(Some(writer), b"").await.expect("nothing to write");
        feed_stdin(None::<FailingWriter>, b"ignored").await.expect("no pipe");
    }

    #[cfg(unix)]
    #[test]
    fn statuses_map_to_codes_and_signals() {
        use std::os::unix::process::ExitStatusExt;

        assert!(matches!(outcome_from_status(ExitStatus::from_raw(42 << 8)), Outcome::Exited(42)));
        assert!(matches!(outcome_from_status(ExitStatus::from_raw(9)), Outcome::Signaled(9)));
    }

    /// A stopped-child wait status has neither an exit code nor a
    /// terminating signal.
    #[cfg(unix)]
    #[test]
    fn status_without_code_or_signal_is_a_wait_failure() {
        use std::os::unix::process::ExitStatusExt;

        let stopped = ExitStatus::from_raw(0x137f);
        assert_eq!(stopped.code(), None);

        match outcome_from_status(stopped) {
            Outcome::IoFailed { stage, source } => {
                assert_eq!(stage, PipeStage::Wait);
                assert!(source.to_string().contains("neither a code nor a signal"));
            }
            other => panic!("expected a wait failure, got {:?}", other),
        }
    }
}
