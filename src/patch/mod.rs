//! The patch pipeline.
//!
//! [`Patcher`] runs one archive through every stage in order:
//!
//! 1. scan for record markers and validate each record header
//! 2. remove excluded records and compact the survivors
//! 3. rewrite the path field of each survivor
//! 4. compute output offsets and build the index table
//! 5. synthesize the archive header
//! 6. concatenate header, index and records
//!
//! Any error aborts the file before output is produced.
//!
//! # Example
//!
//! ```rust,no_run
//! use crspatch::{PatchOptions, Patcher};
//!
//! let patcher = Patcher::new(PatchOptions::new().exclude("TREES.OFS"));
//! let report = patcher.patch_file("COURSE.CRS", "COURSE_patched.CRS")?;
//! println!("{} records removed", report.removed.len());
//! # Ok::<(), crspatch::Error>(())
//! ```

mod options;
mod report;

pub use options::{DEFAULT_CLOCK_OFFSET, PatchOptions};
pub use report::{IndexedRecord, PatchReport};

use std::path::Path;

use filetime::FileTime;

use crate::Result;
use crate::edit::{patch_paths, remove_records};
use crate::error::Warning;
use crate::format::header::ArchiveHeader;
use crate::read::Archive;
use crate::timestamp::DosDateTime;
use crate::write::{assemble, build_index, write_archive};

/// The patched archive and its report.
#[derive(Debug, Clone)]
pub struct PatchOutput {
    /// The complete output archive.
    pub bytes: Vec<u8>,
    /// What was done.
    pub report: PatchReport,
}

/// Applies [`PatchOptions`] to archives.
#[derive(Debug, Clone, Default)]
pub struct Patcher {
    options: PatchOptions,
}

impl Patcher {
    /// Creates a patcher.
    pub fn new(options: PatchOptions) -> Self {
        Self { options }
    }

    /// Returns the options.
    pub fn options(&self) -> &PatchOptions {
        &self.options
    }

    /// Patches an archive held in memory.
    ///
    /// `timestamp` is written to the archive header as is.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedRecord`](crate::Error::MalformedRecord) for a corrupt record
    /// - [`Error::OffsetOverflow`](crate::Error::OffsetOverflow) or
    ///   [`Error::IndexTooLarge`](crate::Error::IndexTooLarge) if the output
    ///   cannot be indexed
    pub fn patch_bytes(&self, data: Vec<u8>, timestamp: DosDateTime) -> Result<PatchOutput> {
        let options = &self.options;
        let input_len = data.len();

        let archive = Archive::from_bytes_with_policy(data, options.record_policy)?;
        let records_found = archive.len();
        let replaced_header = archive.existing_header().is_some();
        let unaccounted_bytes = archive.unaccounted_bytes();
        log::debug!("Found {records_found} records in {input_len} bytes");

        let removal = remove_records(archive, &options.exclusions);
        let mut archive = removal.archive;
        let mut warnings = archive.warnings().to_vec();
        if removal.removed.is_empty() && !options.exclusions.is_empty() {
            warnings.push(Warning::NoMatchingExclusions);
        }

        let mut paths_patched = 0;
        if options.patch_paths {
            let outcome = patch_paths(&mut archive, &options.path);
            paths_patched = outcome.patched;
            warnings.extend(outcome.warnings);
        }

        let plan = build_index(archive.records())?;
        let header = ArchiveHeader::builder()
            .file_count(plan.file_count)
            .index_size(plan.index_size)
            .timestamp(timestamp)
            .build()?;
        let bytes = assemble(&header, &plan, &archive);

        let entries = archive
            .records()
            .iter()
            .zip(&plan.entries)
            .zip(&removal.original_offsets)
            .map(|((record, entry), &original)| IndexedRecord {
                name: record.display_name(),
                original_offset: original as u64,
                new_offset: entry.offset(),
                entry: entry.encode(),
            })
            .collect();

        let report = PatchReport {
            input_len,
            output_len: bytes.len(),
            records_found,
            removed: removal.removed,
            entries,
            paths_patched,
            warnings,
            timestamp,
            file_count: header.file_count(),
            index_size: header.index_size(),
            replaced_header,
            unaccounted_bytes,
        };
        log::debug!(
            "Output has {} records, {} bytes",
            report.file_count,
            report.output_len
        );

        Ok(PatchOutput { bytes, report })
    }

    /// Patches `input` and writes the result to `output`.
    ///
    /// The archive timestamp is the input's modification time shifted by the
    /// configured clock offset, and the output keeps the input's
    /// modification time. Nothing is written if any stage fails.
    pub fn patch_file(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
    ) -> Result<PatchReport> {
        let input = input.as_ref();
        let output = output.as_ref();

        let data = std::fs::read(input)?;
        let metadata = std::fs::metadata(input)?;
        let timestamp = self.timestamp_for(metadata.modified()?)?;

        let PatchOutput { bytes, report } = self.patch_bytes(data, timestamp)?;
        let mtime = FileTime::from_last_modification_time(&metadata);
        write_archive(output, &bytes, Some(mtime))?;

        log::info!(
            "Patched '{}' -> '{}': {} removed, {} indexed",
            input.display(),
            output.display(),
            report.removed.len(),
            report.entries.len()
        );
        Ok(report)
    }

    /// Converts a modification time to the header timestamp.
    pub fn timestamp_for(&self, modified: std::time::SystemTime) -> Result<DosDateTime> {
        DosDateTime::from_system_time(modified, self.options.clock_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::edit::Exclusions;
    use crate::format::record::tests::record_header;
    use crate::read::RecordPolicy;

    fn record(name: &[u8], fill: u8, len: usize) -> Vec<u8> {
        let mut bytes = record_header(name, b"D:\\LINKS\\DATA\\", len as u32);
        bytes.extend(std::iter::repeat_n(fill, len));
        bytes
    }

    fn stamp() -> DosDateTime {
        DosDateTime::from_parts(2024, 3, 15, 12, 34, 56).unwrap()
    }

    fn course() -> Vec<u8> {
        let mut data = record(b"COURSE.HDR", 0x11, 100);
        data.extend(record(b"PATCH.OFS", 0x22, 50));
        data.extend(record(b"OBJECT.OFS", 0x33, 30));
        data
    }

    #[test]
    fn test_default_pipeline() {
        let out = Patcher::default().patch_bytes(course(), stamp()).unwrap();
        let report = &out.report;

        assert_eq!(report.records_found, 3);
        assert_eq!(report.removed.len(), 2);
        assert_eq!(report.file_count, 1);
        assert_eq!(report.index_size, 17);
        assert_eq!(report.paths_patched, 1);
        assert!(report.warnings.is_empty());
        assert_eq!(report.entries[0].new_offset, 139);
        assert_eq!(report.entries[0].original_offset, 0);

        assert_eq!(out.bytes.len(), 122 + 17 + 222);
        assert_eq!(&out.bytes[139..143], b"MDmd");
        assert_eq!(&out.bytes[139 + 0x37..139 + 0x45], b"C:\\LINKS\\TEMP\\");
        assert_eq!(&out.bytes[139 + 122..], &[0x11; 100][..]);
    }

    #[test]
    fn test_output_is_idempotent() {
        let patcher = Patcher::default();
        let once = patcher.patch_bytes(course(), stamp()).unwrap();
        let twice = patcher.patch_bytes(once.bytes.clone(), stamp()).unwrap();

        assert!(twice.report.replaced_header);
        assert!(twice.report.removed.is_empty());
        assert_eq!(twice.report.warnings, vec![Warning::NoMatchingExclusions]);
        assert_eq!(twice.bytes, once.bytes);
    }

    #[test]
    fn test_no_path_patch() {
        let options = PatchOptions::new().patch_paths(false);
        let out = Patcher::new(options).patch_bytes(course(), stamp()).unwrap();
        assert_eq!(out.report.paths_patched, 0);
        assert_eq!(&out.bytes[139 + 0x37..139 + 0x45], b"D:\\LINKS\\DATA\\");
    }

    #[test]
    fn test_empty_exclusions_emit_no_warning() {
        let options = PatchOptions::new().exclusions(Exclusions::none());
        let out = Patcher::new(options).patch_bytes(course(), stamp()).unwrap();
        assert!(out.report.warnings.is_empty());
        assert_eq!(out.report.file_count, 3);
    }

    #[test]
    fn test_malformed_input() {
        let mut data = course();
        data.truncate(data.len() - 1);
        let err = Patcher::default().patch_bytes(data.clone(), stamp()).unwrap_err();
        assert!(matches!(err, Error::MalformedRecord { offset: 394, .. }));

        let skip = Patcher::new(PatchOptions::new().record_policy(RecordPolicy::Skip));
        let out = skip.patch_bytes(data, stamp()).unwrap();
        assert_eq!(out.report.records_found, 2);
        assert!(matches!(
            out.report.warnings[0],
            Warning::SkippedRecord { offset: 394, .. }
        ));
    }

    #[test]
    fn test_patch_file_preserves_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("COURSE.CRS");
        let output = dir.path().join("COURSE_patched.CRS");
        std::fs::write(&input, course()).unwrap();
        let mtime = FileTime::from_unix_time(1_710_506_096, 0);
        filetime::set_file_mtime(&input, mtime).unwrap();

        let patcher = Patcher::new(PatchOptions::new().clock_offset(0));
        let report = patcher.patch_file(&input, &output).unwrap();

        assert_eq!(report.timestamp, stamp());
        let written = std::fs::read(&output).unwrap();
        assert_eq!(written.len(), report.output_len);
        assert_eq!(&written[0x23..0x27], &[0x5C, 0x64, 0x6F, 0x58]);
        let meta = std::fs::metadata(&output).unwrap();
        assert_eq!(FileTime::from_last_modification_time(&meta), mtime);
    }

    #[test]
    fn test_failed_patch_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("BAD.CRS");
        let output = dir.path().join("BAD_patched.CRS");
        std::fs::write(&input, b"MDmd\x0A\x01").unwrap();

        assert!(Patcher::default().patch_file(&input, &output).is_err());
        assert!(!output.exists());
    }
}
