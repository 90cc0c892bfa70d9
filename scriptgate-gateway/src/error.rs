//! Error types for the gateway crate.

use std::path::PathBuf;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use scriptgate_core::ApiEnvelope;
use scriptgate_executor::{ExecutorError, ResolveError};

use crate::compose::envelope_response;

/// Errors that end a request before a script outcome exists.
///
/// Every variant converts into a gateway-authored envelope; none of them
/// escape the request task.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// No `Authorization` header (or an empty one).
    #[error("missing Authorization header")]
    AuthMissing,

    /// The header is not exactly `Bearer <token>`.
    #[error("malformed Authorization header")]
    AuthMalformed,

    /// The token is unknown even after a reload.
    #[error("invalid bearer token")]
    AuthInvalid,

    /// The path tried to leave the script root.
    #[error("path traversal attempt: {0}")]
    PathTraversal(String),

    /// No script exists at the requested path.
    #[error("script not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    /// The script could not be started or its output could not be read.
    #[error("executor error: {0}")]
    Executor(#[from] ExecutorError),

    /// The request body could not be read.
    #[error("invalid request body: {0}")]
    BodyUnreadable(String),

    /// The whole request outlived the write timeout.
    #[error("request exceeded the write timeout")]
    HandlerTimeout,
}

impl GatewayError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::AuthMissing | GatewayError::AuthMalformed | GatewayError::AuthInvalid => {
                StatusCode::UNAUTHORIZED
            }
            GatewayError::PathTraversal(_) => StatusCode::FORBIDDEN,
            GatewayError::ScriptNotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Executor(_) => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::BodyUnreadable(_) => StatusCode::BAD_REQUEST,
            GatewayError::HandlerTimeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn envelope(&self) -> ApiEnvelope {
        let code = self.status().as_u16();
        match self {
            GatewayError::AuthMissing => {
                ApiEnvelope::failure(code, "Unauthorized", "Missing Authorization header")
            }
            GatewayError::AuthMalformed => {
                ApiEnvelope::failure(code, "Unauthorized", "Invalid token format")
            }
            GatewayError::AuthInvalid => ApiEnvelope::failure(code, "Unauthorized", "Invalid token"),
            GatewayError::PathTraversal(_) => ApiEnvelope::failure(
                code,
                "Invalid path structure",
                "Path traversal attempt detected",
            ),
            GatewayError::ScriptNotFound(_) => {
                ApiEnvelope::failure(code, "Script endpoint not found", "File does not exist")
            }
            GatewayError::Executor(e) => {
                ApiEnvelope::failure(code, "Internal Script Error", e.to_string())
            }
            GatewayError::BodyUnreadable(reason) => {
                ApiEnvelope::failure(code, "Invalid request body", reason.clone())
            }
            GatewayError::HandlerTimeout => {
                ApiEnvelope::failure(code, "Request timed out", "Request took too long")
            }
        }
    }
}

impl From<ResolveError> for GatewayError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotFound { path } => GatewayError::ScriptNotFound(path),
            ResolveError::Forbidden { raw } => GatewayError::PathTraversal(raw),
            other => GatewayError::PathTraversal(other.to_string()),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        envelope_response(self.status(), &self.envelope())
    }
}

/// Conditions that stop the process before it serves any traffic.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum StartupError {
    /// The listening port is already bound (or otherwise unavailable).
    #[error("port {port} unavailable: {source}")]
    PortBind {
        port: u16,
        #[source]
        source: std::io::Error,
    },

    /// The access log file cannot be opened for appending.
    #[error("cannot open log file {}: {source}", path.display())]
    LogFileUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The tracing subscriber could not be installed.
    #[error("failed to install log subscriber: {0}")]
    Subscriber(String),
}
