//! Record model builder.
//!
//! Turns marker offsets into validated records. Marker hits inside a record
//! that was already accepted belong to its payload and are not candidates.

use crate::error::Warning;
use crate::format::header::ArchiveHeader;
use crate::format::record::Record;
use crate::format::scanner::SignatureScanner;
use crate::{Error, Result};

/// What to do with a candidate that fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordPolicy {
    /// Reject the whole archive. A corrupt record leaves every later offset
    /// in doubt, so this is the default.
    #[default]
    Abort,
    /// Drop the candidate with a warning and keep scanning.
    Skip,
}

/// The result of [`build_records`].
#[derive(Debug, Clone, Default)]
pub struct BuiltRecords {
    /// Accepted records in ascending offset order.
    pub records: Vec<Record>,
    /// Top-level header found at offset 0, if the input already had one.
    pub existing_header: Option<ArchiveHeader>,
    /// Bytes not covered by the header or any record.
    pub unaccounted_bytes: usize,
    /// Candidates dropped under [`RecordPolicy::Skip`].
    pub warnings: Vec<Warning>,
}

/// Scans `data` and builds the ordered record list.
///
/// # Errors
///
/// Under [`RecordPolicy::Abort`], returns the first
/// [`Error::MalformedRecord`] encountered.
pub fn build_records(data: &[u8], policy: RecordPolicy) -> Result<BuiltRecords> {
    let mut built = BuiltRecords::default();
    let mut covered_until = 0usize;
    let mut covered_bytes = 0usize;

    for offset in SignatureScanner::new(data) {
        if offset < covered_until {
            log::trace!("marker at {offset:#08x} lies inside a record payload, ignored");
            continue;
        }

        let parsed = Record::parse(data, offset).and_then(|record| {
            if record.is_archive_header() && offset != 0 {
                Err(Error::malformed(
                    offset,
                    "archive header found inside the data region",
                ))
            } else {
                Ok(record)
            }
        });

        let record = match parsed {
            Ok(record) => record,
            Err(Error::MalformedRecord { offset, reason }) if policy == RecordPolicy::Skip => {
                log::warn!("Skipping malformed record at {offset:#08x}: {reason}");
                built.warnings.push(Warning::SkippedRecord { offset, reason });
                continue;
            }
            Err(err) => return Err(err),
        };

        covered_until = record.end();
        covered_bytes += record.total_len();

        if record.is_archive_header() {
            let header = ArchiveHeader::parse(data)?;
            log::debug!(
                "Input already has an archive header ({} files, {} index bytes)",
                header.file_count(),
                header.index_size()
            );
            built.existing_header = Some(header);
            continue;
        }

        log::trace!(
            "Record '{}' at {:#08x}, {} payload bytes",
            record.display_name(),
            record.offset,
            record.compressed_size
        );
        built.records.push(record);
    }

    built.unaccounted_bytes = data.len() - covered_bytes;
    if built.unaccounted_bytes > 0 {
        log::warn!(
            "{} bytes are not part of any record and will be dropped",
            built.unaccounted_bytes
        );
    }

    Ok(built)
}
