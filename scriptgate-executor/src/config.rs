//! Per-call invocation parameters.

use std::time::Duration;

use crate::ResolvedTarget;

/// Environment variable carrying the HTTP method to the script.
pub const METHOD_ENV: &str = "REQUEST_METHOD";

/// Terminal type exported to every script so tools never prompt.
pub const TERM_VALUE: &str = "dumb";

/// Everything needed to run one script for one request.
///
/// Owned by the executor for the duration of a single call.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ScriptInvocation {
    /// The script to execute.
    pub target: ResolvedTarget,

    /// Hard wall-clock limit.
    pub timeout: Duration,

    /// Variables added on top of the inherited environment.
    pub env: Vec<(String, String)>,

    /// Bytes piped to stdin, if any.
    pub stdin: Option<Vec<u8>>,
}

impl ScriptInvocation {
    /// Build the invocation for an HTTP request.
    ///
    /// The body is only forwarded for `POST` and `PUT`; other methods get no
    /// stdin at all.
    #[must_use]
    pub fn for_request(
        target: ResolvedTarget,
        method: &str,
        body: Vec<u8>,
        timeout: Duration,
    ) -> Self {
        let stdin = matches!(method, "POST" | "PUT").then_some(body);
        Self {
            target,
            timeout,
            env: vec![
                (METHOD_ENV.to_owned(), method.to_owned()),
                ("TERM".to_owned(), TERM_VALUE.to_owned()),
            ],
            stdin,
        }
    }
}
