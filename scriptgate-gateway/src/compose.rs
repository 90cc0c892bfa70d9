//! Turns an [`ExecutionOutcome`] into an HTTP response.
//!
//! | outcome        | output          | status | body                     |
//! |----------------|-----------------|--------|--------------------------|
//! | `Success`      | anything        | 200    | output, verbatim         |
//! | `NonZeroExit`  | valid JSON      | 500    | output, verbatim         |
//! | `NonZeroExit`  | not JSON        | 500    | envelope, `error`=output |
//! | `TimedOut`     | ignored         | 504    | envelope                 |
//!
//! Only the failure path inspects the output. A non-zero exit with valid JSON
//! is forwarded as 500 whatever that JSON's own `status` field says.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use scriptgate_core::{is_json, ApiEnvelope, Completion, ExecutionOutcome};

/// Body of a composed response.
#[derive(Debug, Clone, PartialEq)]
pub enum ComposedBody {
    /// Script output forwarded byte-for-byte.
    Verbatim(Vec<u8>),
    /// Gateway-authored envelope.
    Envelope(ApiEnvelope),
}

/// The status and body chosen for one outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedResponse {
    pub status: StatusCode,
    pub body: ComposedBody,
}

/// Pick the status and body for `outcome`.
#[must_use]
pub fn compose(outcome: ExecutionOutcome) -> ComposedResponse {
    match outcome.completion {
        Completion::Success => ComposedResponse {
            status: StatusCode::OK,
            body: ComposedBody::Verbatim(outcome.output),
        },
        Completion::TimedOut => ComposedResponse {
            status: StatusCode::GATEWAY_TIMEOUT,
            body: ComposedBody::Envelope(ApiEnvelope::failure(
                StatusCode::GATEWAY_TIMEOUT.as_u16(),
                "Execution timed out",
                "Script took too long",
            )),
        },
        Completion::NonZeroExit { .. } if is_json(&outcome.output) => ComposedResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ComposedBody::Verbatim(outcome.output),
        },
        // Non-zero exit without JSON, and any completion kind added later.
        _ => ComposedResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: ComposedBody::Envelope(ApiEnvelope::failure(
                StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                "Internal Script Error",
                String::from_utf8_lossy(&outcome.output),
            )),
        },
    }
}

impl IntoResponse for ComposedResponse {
    fn into_response(self) -> Response {
        match self.body {
            ComposedBody::Verbatim(bytes) => json_response(self.status, bytes),
            ComposedBody::Envelope(envelope) => envelope_response(self.status, &envelope),
        }
    }
}

/// Render a gateway-authored envelope with `status`.
///
/// An envelope that cannot be encoded degrades to an empty 500.
pub(crate) fn envelope_response(status: StatusCode, envelope: &ApiEnvelope) -> Response {
    match envelope.to_bytes() {
        Ok(bytes) => json_response(status, bytes),
        Err(e) => {
            tracing::error!(error = %e, code = envelope.code, "failed to encode envelope");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn json_response(status: StatusCode, bytes: Vec<u8>) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], bytes).into_response()
}
