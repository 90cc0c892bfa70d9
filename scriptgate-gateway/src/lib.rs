//! HTTP gateway that exposes confined scripts as authenticated endpoints.
//!
//! Request path: access log → (decoy page | bearer auth → path resolution →
//! script execution → response composition).

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod access_log;
pub mod auth;
pub mod compose;
pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod telemetry;
pub mod tokens;
