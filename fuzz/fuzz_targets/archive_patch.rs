//! Fuzz target for the full patch pipeline with arbitrary byte input.
//!
//! Run with: cargo +nightly fuzz run archive_patch
//!
//! Any accepted input must produce an archive that reparses, indexes the
//! same records, and patches to identical bytes a second time.

#![no_main]

use crspatch::{DosDateTime, Patcher, RecordPolicy, PatchOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let stamp = DosDateTime::from_raw(0x586F, 0x645C);

    for policy in [RecordPolicy::Abort, RecordPolicy::Skip] {
        let patcher = Patcher::new(PatchOptions::new().record_policy(policy));
        let Ok(once) = patcher.patch_bytes(data.to_vec(), stamp) else {
            continue;
        };

        let twice = patcher
            .patch_bytes(once.bytes.clone(), stamp)
            .expect("patched output must be accepted");
        assert_eq!(twice.report.file_count, once.report.file_count);
        assert_eq!(twice.bytes, once.bytes);
    }
});
