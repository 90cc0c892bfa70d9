//! Core types for the scriptgate script-execution gateway.
//!
//! Defines the response envelope, the execution outcome handed from the
//! executor to the response composer, and the bearer-token set.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod envelope;
pub mod error;
pub mod outcome;
pub mod tokens;

pub use envelope::{is_json, ApiEnvelope, Detail};
pub use error::CoreError;
pub use outcome::{Completion, ExecutionOutcome};
pub use tokens::TokenSet;
