//! Fuzz target: token file parsing.
//!
//! Every non-blank trimmed line of the input must be a member of the set.

#![no_main]

use libfuzzer_sys::fuzz_target;
use scriptgate_core::TokenSet;

fuzz_target!(|text: &str| {
    let set = TokenSet::parse(text);
    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        assert!(set.contains(line));
    }
});
