//! Fuzz target: request path resolution.
//!
//! Arbitrary URL paths must never panic and must never produce a target
//! outside the confined root.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scriptgate_executor::PathResolver;

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };
    let resolver = PathResolver::new("/usr/local/sbin/api");
    if let Ok(target) = resolver.resolve(raw) {
        assert!(target.path().starts_with(resolver.root()));
        assert!(!target.name().split('/').any(|s| s == ".."));
    }
});
