//! Fuzz target for record scanning.
//!
//! Run with: cargo +nightly fuzz run archive_scan

#![no_main]

use crspatch::read::{RecordPolicy, build_records};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(built) = build_records(data, RecordPolicy::Skip) else {
        return;
    };

    let mut previous_end = 0;
    for record in &built.records {
        assert!(record.offset >= previous_end);
        assert!(record.end() <= data.len());
        previous_end = record.end();
    }
});
