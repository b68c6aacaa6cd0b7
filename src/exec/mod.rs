// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs external programs using `tokio::process::Command` and
//! hands back everything they wrote together with how they ended.
//!
//! - [`invocation`] describes one run (program, dir, args, stdin payload).
//! - [`process`] owns the spawn / feed / drain / reap sequence.
//! - [`result`] holds the collected texts and the [`Outcome`].
//! - [`backend`] provides the `Executor` trait and the `ProcessExecutor`
//!   used in production, which tests can replace with a fake.

pub mod backend;
pub mod invocation;
pub mod process;
pub mod result;

pub use backend::{Executor, ProcessExecutor};
pub use invocation::Invocation;
pub use process::execute;
pub use result::{ExecutionResult, Outcome};
