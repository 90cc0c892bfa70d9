//! Script execution abstraction.
//!
//! Routing and auth logic depend on [`Executor`] rather than on
//! [`ScriptRunner`](crate::ScriptRunner) directly, so they can be exercised
//! against a fake without spawning processes.

use async_trait::async_trait;
use scriptgate_core::ExecutionOutcome;

use crate::{ExecutorError, ScriptInvocation};

/// Runs one resolved script to completion or to its deadline.
///
/// Implementations must be `Send + Sync` to allow use across request tasks.
///
/// # Cancel Safety
/// Implementations must not leave the child running if the returned future
/// is dropped.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Execute the invocation and report how it ended.
    ///
    /// A non-zero exit and an expired deadline are *outcomes*, not errors.
    ///
    /// # Errors
    /// Returns [`ExecutorError::Spawn`] if the process cannot be started.
    /// Returns [`ExecutorError::Io`] if reading its output fails.
    async fn run(&self, invocation: ScriptInvocation) -> Result<ExecutionOutcome, ExecutorError>;
}
