//! Error types for the executor crate.

use std::path::PathBuf;

/// Reasons a request path cannot be turned into a script target.
///
/// Both variants are terminal for the request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// The path tries to leave the confined root.
    #[error("path traversal attempt: {raw}")]
    Forbidden { raw: String },

    /// No regular file exists at the resolved location.
    #[error("script not found: {}", path.display())]
    NotFound { path: PathBuf },
}

/// Errors that prevent a script from producing an outcome at all.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ExecutorError {
    /// The child process could not be started.
    #[error("failed to spawn {}: {source}", path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Underlying I/O error while talking to the child.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
