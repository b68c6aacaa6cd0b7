use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use posixkit::exec::{ExecutionResult, Executor, Invocation, Outcome};

type Reply = Box<dyn Fn(&Invocation) -> ExecutionResult + Send + Sync>;

/// A fake executor that:
/// - records every invocation it is handed, in order
/// - never spawns anything; it answers with a scripted result
///   (by default: empty output, exit code 0).
pub struct RecordingExecutor {
    invocations: Arc<Mutex<Vec<Invocation>>>,
    reply: Reply,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::replying(|_| exited(0, "", ""))
    }

    /// Answer every invocation with whatever `reply` builds for it.
    pub fn replying<F>(reply: F) -> Self
    where
        F: Fn(&Invocation) -> ExecutionResult + Send + Sync + 'static,
    {
        Self {
            invocations: Arc::new(Mutex::new(Vec::new())),
            reply: Box::new(reply),
        }
    }

    /// Shared handle to the recorded invocations; stays valid after the
    /// executor has been moved into a runner.
    pub fn invocations(&self) -> Arc<Mutex<Vec<Invocation>>> {
        Arc::clone(&self.invocations)
    }
}

impl Default for RecordingExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for RecordingExecutor {
    fn execute<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>> {
        Box::pin(async move {
            {
                let mut guard = self.invocations.lock().unwrap();
                guard.push(invocation.clone());
            }
            (self.reply)(invocation)
        })
    }
}

/// A canned result with the given exit code and output bytes.
pub fn exited(code: i32, stdout: impl AsRef<[u8]>, stderr: impl AsRef<[u8]>) -> ExecutionResult {
    ExecutionResult::new(
        stdout.as_ref().to_vec(),
        stderr.as_ref().to_vec(),
        Outcome::Exited(code),
    )
}
