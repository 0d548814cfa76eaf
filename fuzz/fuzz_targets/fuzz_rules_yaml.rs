//! Fuzz target for rules document parsing and resolution.
//!
//! Goal: The rules loader should **never panic** on any input.
//! It may return errors, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_rules_yaml
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only test valid UTF-8 strings (rules.yaml must be UTF-8)
    if let Ok(text) = std::str::from_utf8(data) {
        // Parse and resolve in one go - should never panic
        let _ = imgward_rules::fuzz::parse_rules(text);
    }
});
