//! Fuzz target: failure-path response composition.
//!
//! Whatever a failing script prints, the composer must answer 500 and must
//! never panic while deciding between forwarding and wrapping.

#![no_main]

use std::time::Duration;

use libfuzzer_sys::fuzz_target;
use scriptgate_core::{Completion, ExecutionOutcome};
use scriptgate_gateway::compose::compose;

fuzz_target!(|data: &[u8]| {
    let outcome = ExecutionOutcome::new(
        data.to_vec(),
        Completion::NonZeroExit { code: Some(1) },
        chrono::Utc::now(),
        Duration::ZERO,
    );
    assert_eq!(compose(outcome).status.as_u16(), 500);
});
