//! Confined script resolution and bounded subprocess execution for scriptgate.
//!
//! Turns a request path into a [`ResolvedTarget`] under a fixed root and runs
//! it as a child process with a hard wall-clock deadline.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod backend;
pub mod config;
pub mod error;
pub mod resolver;
pub mod runner;

pub use backend::Executor;
pub use config::{ScriptInvocation, METHOD_ENV, TERM_VALUE};
pub use error::{ExecutorError, ResolveError};
pub use resolver::{PathResolver, ResolvedTarget};
pub use runner::ScriptRunner;
