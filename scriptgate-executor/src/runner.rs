//! Subprocess runner: executes a resolved script as a fresh child process.
//!
//! The runner:
//! 1. Spawns the script with the inherited environment plus the overlay
//! 2. Pipes the request body to stdin (POST/PUT only) and closes it
//! 3. Hands stdout and stderr the same pipe, so output keeps the order the
//!    script wrote it in
//! 4. Kills the child if the deadline expires first
//!
//! # Cancel Safety
//! Cancel safe. Dropping the future kills the child via `kill_on_drop`.

use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::unix::pipe;
use tokio::process::{Child, Command};

use scriptgate_core::{Completion, ExecutionOutcome};

use crate::{Executor, ExecutorError, ScriptInvocation};

/// Runs scripts as child processes, one fresh process per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptRunner;

impl ScriptRunner {
    /// Create a new runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Executor for ScriptRunner {
    async fn run(&self, invocation: ScriptInvocation) -> Result<ExecutionOutcome, ExecutorError> {
        let path = invocation.target.path().to_owned();
        let started_at = Utc::now();
        let wall_start = Instant::now();

        let (reader, writer) = std::io::pipe()?;
        let stderr_writer = writer.try_clone()?;

        let mut command = Command::new(&path);
        command
            .envs(invocation.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(if invocation.stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(writer)
            .stderr(stderr_writer)
            .kill_on_drop(true);
        let spawned = command.spawn();
        // The command holds the parent's copies of the write end; the reader
        // only sees EOF once they are closed.
        drop(command);
        let mut child =
            spawned.map_err(|source| ExecutorError::Spawn { path: path.clone(), source })?;
        let output = pipe::Receiver::from_owned_fd(reader.into())?;

        tracing::debug!(
            script = %invocation.target.name(),
            pid = child.id(),
            "script started"
        );

        if let (Some(body), Some(mut stdin)) = (invocation.stdin, child.stdin.take()) {
            // Written from its own task so a script that never reads stdin
            // cannot stall output collection.
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(&body).await {
                    tracing::debug!(error = %e, "script closed stdin early");
                }
            });
        }

        let collected = tokio::time::timeout(invocation.timeout, collect(&mut child, output)).await;

        let (output, completion) = match collected {
            Ok(result) => {
                let (output, status) = result?;
                let completion = if status.success() {
                    Completion::Success
                } else {
                    Completion::NonZeroExit { code: status.code() }
                };
                (output, completion)
            }
            Err(_) => {
                if let Err(e) = child.kill().await {
                    tracing::warn!(script = %invocation.target.name(), error = %e, "failed to kill timed-out script");
                }
                (Vec::new(), Completion::TimedOut)
            }
        };

        let elapsed = wall_start.elapsed();
        tracing::debug!(
            script = %invocation.target.name(),
            %completion,
            bytes = output.len(),
            elapsed_ms = elapsed.as_millis(),
            "script finished"
        );

        Ok(ExecutionOutcome::new(output, completion, started_at, elapsed))
    }
}

/// Read the combined output to EOF, then reap the child.
async fn collect(
    child: &mut Child,
    mut reader: pipe::Receiver,
) -> Result<(Vec<u8>, std::process::ExitStatus), ExecutorError> {
    let mut output = Vec::new();
    reader.read_to_end(&mut output).await?;
    let status = child.wait().await?;
    Ok((output, status))
}
