//! Batch driver tests against real files.

mod common;

use std::path::PathBuf;

use common::{build_archive, sample_course};
use crspatch::batch::{OUTPUT_SUFFIX, output_path, patch_batch};
use crspatch::{Error, Patcher};
use filetime::FileTime;
use tempfile::TempDir;

fn write_inputs(dir: &TempDir, files: &[(&str, Vec<u8>)]) -> Vec<PathBuf> {
    files
        .iter()
        .map(|(name, data)| {
            let path = dir.path().join(name);
            std::fs::write(&path, data).unwrap();
            path
        })
        .collect()
}

#[test]
fn test_batch_patches_every_file() {
    let dir = TempDir::new().unwrap();
    let inputs = write_inputs(
        &dir,
        &[
            ("PEBBLE.CRS", build_archive(&sample_course())),
            ("BANFF.CRS", build_archive(&sample_course()[..1])),
        ],
    );
    let out_dir = dir.path().join("patched");

    let result = patch_batch(&inputs, Some(&out_dir), &Patcher::default());

    assert!(result.is_success());
    assert_eq!(result.outcomes.len(), 2);
    for outcome in &result.outcomes {
        assert_eq!(outcome.output.parent(), Some(out_dir.as_path()));
        let written = std::fs::read(&outcome.output).unwrap();
        assert_eq!(&written[0..4], b"MDmd");
        assert_eq!(written.len(), 122 + 17 + 222);
    }
    assert!(out_dir.join("PEBBLE_patched.CRS").exists());
    assert!(out_dir.join("BANFF_patched.CRS").exists());
}

#[test]
fn test_one_bad_file_does_not_stop_others() {
    let dir = TempDir::new().unwrap();
    let mut corrupt = build_archive(&sample_course());
    corrupt.truncate(300);
    let inputs = write_inputs(
        &dir,
        &[
            ("GOOD.CRS", build_archive(&sample_course())),
            ("BAD.CRS", corrupt),
        ],
    );

    let result = patch_batch(&inputs, None, &Patcher::default());

    assert_eq!(result.failure_count(), 1);
    let (failed, error) = result.failed().next().unwrap();
    assert_eq!(failed.input, inputs[1]);
    assert!(matches!(error, Error::MalformedRecord { offset: 222, .. }));
    assert!(!failed.output.exists());

    let (ok, _) = result.succeeded().next().unwrap();
    assert_eq!(ok.output, dir.path().join("GOOD_patched.CRS"));
    assert!(ok.output.exists());
}

#[test]
fn test_output_keeps_source_mtime() {
    let dir = TempDir::new().unwrap();
    let inputs = write_inputs(&dir, &[("OLD.CRS", build_archive(&sample_course()))]);
    let mtime = FileTime::from_unix_time(852_076_800, 0);
    filetime::set_file_mtime(&inputs[0], mtime).unwrap();

    let result = patch_batch(&inputs, None, &Patcher::default());
    let (outcome, report) = result.succeeded().next().unwrap();

    let meta = std::fs::metadata(&outcome.output).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta), mtime);
    // 1997-01-01 00:00:00 UTC shifted by the default four and a half hours.
    assert_eq!(report.timestamp.to_string(), "1997-01-01 04:30:00");
}

#[test]
fn test_output_path_naming() {
    let input = PathBuf::from("courses").join("PEBBLE.CRS");
    assert_eq!(
        output_path(&input, OUTPUT_SUFFIX, None),
        PathBuf::from("courses").join("PEBBLE_patched.CRS")
    );
}

#[test]
fn test_same_named_inputs_never_share_an_output() {
    let dir = TempDir::new().unwrap();
    let first = dir.path().join("a").join("PEBBLE.CRS");
    let second = dir.path().join("b").join("PEBBLE.CRS");
    std::fs::create_dir_all(first.parent().unwrap()).unwrap();
    std::fs::create_dir_all(second.parent().unwrap()).unwrap();
    std::fs::write(&first, build_archive(&sample_course())).unwrap();
    std::fs::write(&second, build_archive(&sample_course()[..1])).unwrap();
    let out_dir = dir.path().join("patched");

    let result = patch_batch(
        &[first.clone(), second.clone()],
        Some(&out_dir),
        &Patcher::default(),
    );

    assert!(!result.is_success());
    let (failed, error) = result.failed().next().unwrap();
    assert_eq!(failed.input, second);
    assert!(matches!(error, Error::OutputConflict { .. }));

    let written: Vec<_> = std::fs::read_dir(&out_dir).unwrap().collect();
    assert_eq!(written.len(), 1);
    let (ok, report) = result.succeeded().next().unwrap();
    assert_eq!(ok.input, first);
    assert_eq!(std::fs::read(&ok.output).unwrap().len(), report.output_len);
}
