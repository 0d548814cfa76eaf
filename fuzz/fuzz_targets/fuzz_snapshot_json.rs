//! Fuzz target for inventory snapshot parsing.
//!
//! Goal: The snapshot parser should **never panic** on any input, including
//! rows with unexpected scalar types and hostile image reference shapes.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_snapshot_json
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Only test valid UTF-8 strings (snapshots are JSON text)
    if let Ok(text) = std::str::from_utf8(data) {
        // Parse and classify - should never panic
        let _ = imgward_inventory::fuzz::parse_snapshot(text);
    }
});
