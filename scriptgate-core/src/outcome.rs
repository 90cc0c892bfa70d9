use std::time::Duration;

use chrono::{DateTime, Utc};

/// How a script invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Completion {
    /// The script exited with status 0.
    Success,
    /// The script exited with a non-zero status.
    NonZeroExit {
        /// Exit code, or `None` if the process was terminated by a signal.
        code: Option<i32>,
    },
    /// The deadline expired and the script was killed.
    TimedOut,
}

/// The result of exactly one script invocation.
///
/// Produced once by the executor and consumed once by the response composer.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ExecutionOutcome {
    /// Combined stdout and stderr, in the order the chunks arrived.
    pub output: Vec<u8>,
    /// How the process ended.
    pub completion: Completion,
    /// When the process was started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration from spawn to exit (or kill).
    pub elapsed: Duration,
}

impl ExecutionOutcome {
    /// Create a new outcome.
    #[must_use]
    pub fn new(
        output: Vec<u8>,
        completion: Completion,
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        Self { output, completion, started_at, elapsed }
    }

    /// Returns `true` if the script exited cleanly.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.completion == Completion::Success
    }
}

impl std::fmt::Display for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::NonZeroExit { code: Some(code) } => write!(f, "exit status {code}"),
            Self::NonZeroExit { code: None } => write!(f, "terminated by signal"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}
