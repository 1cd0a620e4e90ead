//! Tests for malformed and corrupted archive handling.
//!
//! A corrupt record leaves the position of everything after it in doubt, so
//! by default the whole file is rejected and nothing is produced.

mod common;

use common::{RecordSpec, build_archive, sample_course, stamp};
use crspatch::{Error, PatchOptions, Patcher, RecordPolicy, Warning};

fn patch(data: Vec<u8>) -> crspatch::Result<crspatch::PatchOutput> {
    Patcher::default().patch_bytes(data, stamp())
}

#[test]
fn test_truncated_header() {
    let mut data = build_archive(&sample_course());
    data.extend_from_slice(b"MDmd\x0A\x01\x7A\x00");
    let err = patch(data).unwrap_err();
    assert!(err.is_corruption());
    assert!(matches!(err, Error::MalformedRecord { offset: 546, .. }));
}

#[test]
fn test_payload_past_end_of_buffer() {
    let mut data = build_archive(&sample_course());
    data.truncate(data.len() - 10);
    let err = patch(data).unwrap_err();
    match err {
        Error::MalformedRecord { offset, reason } => {
            assert_eq!(offset, 394);
            assert!(reason.contains("exceeds"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_wrong_header_size() {
    let mut data = build_archive(&sample_course());
    data[222 + 6] = 0x7B;
    let err = patch(data).unwrap_err();
    assert!(matches!(err, Error::MalformedRecord { offset: 222, .. }));
}

#[test]
fn test_unprintable_name() {
    let mut bad = RecordSpec::new("HOLE1.OFS", 0, 4).encode();
    bad[0x2A] = 0x07;
    let err = patch(bad).unwrap_err();
    assert!(err.is_corruption());
}

#[test]
fn test_archive_header_in_data_region() {
    let once = Patcher::default()
        .patch_bytes(build_archive(&sample_course()), stamp())
        .unwrap()
        .bytes;
    // Two patched archives glued together: the second header sits inside
    // the data region.
    let mut data = once.clone();
    data.extend_from_slice(&once);
    let err = patch(data).unwrap_err();
    assert!(err.to_string().contains("data region"));
}

#[test]
fn test_skip_policy_recovers() {
    let mut data = RecordSpec::new("COURSE.HDR", 0x11, 20).encode();
    data.extend_from_slice(b"MDmd junk that is not a header");
    data.extend(RecordSpec::new("HOLE1.OFS", 0x12, 5).encode());

    let patcher = Patcher::new(
        PatchOptions::new()
            .record_policy(RecordPolicy::Skip)
            .exclusions(crspatch::Exclusions::none()),
    );
    let out = patcher.patch_bytes(data, stamp()).unwrap();

    assert_eq!(out.report.file_count, 2);
    assert_eq!(out.report.unaccounted_bytes, 30);
    assert!(matches!(
        out.report.warnings[0],
        Warning::SkippedRecord { offset: 142, .. }
    ));
    // The junk is not carried into the output.
    assert_eq!(out.bytes.len(), 122 + 34 + 142 + 127);
}

#[test]
fn test_index_too_large() {
    let records: Vec<_> = (0..3856)
        .map(|i| RecordSpec::new(&format!("F{i}.OFS"), 0, 0))
        .collect();
    let err = patch(build_archive(&records)).unwrap_err();
    assert!(matches!(err, Error::IndexTooLarge { file_count: 3856 }));
    assert!(err.is_capacity());
}

#[test]
fn test_offset_overflow() {
    let records = vec![
        RecordSpec::new("BIG.DAT", 0, 0x0100_0000),
        RecordSpec::new("HOLE1.OFS", 0, 1),
    ];
    let err = patch(build_archive(&records)).unwrap_err();
    match err {
        Error::OffsetOverflow { name, offset } => {
            assert_eq!(name, "HOLE1.OFS");
            assert!(offset > 0xFF_FFFF);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_garbage_without_marker_is_empty_archive() {
    let out = patch(vec![0xFF; 1000]).unwrap();
    assert_eq!(out.report.records_found, 0);
    assert_eq!(out.report.unaccounted_bytes, 1000);
    assert_eq!(out.bytes.len(), 122);
}
