//! Archive reading: from raw bytes to an ordered, validated record model.
//!
//! # Example
//!
//! ```rust,no_run
//! use crspatch::read::Archive;
//!
//! let archive = Archive::open_path("COURSE.CRS")?;
//! for record in archive.records() {
//!     println!("{:#08x} {} ({} bytes)",
//!         record.offset, record.display_name(), record.compressed_size);
//! }
//! # Ok::<(), crspatch::Error>(())
//! ```

mod builder;
mod info;

pub use builder::{BuiltRecords, RecordPolicy, build_records};
pub use info::ArchiveInfo;

use std::path::Path;

use crate::Result;
use crate::error::Warning;
use crate::format::header::ArchiveHeader;
use crate::format::record::Record;

/// An archive buffer together with its decoded records.
///
/// The archive owns its buffer. Records are stored in ascending offset order
/// and every record's byte range lies inside the buffer.
#[derive(Debug, Clone)]
pub struct Archive {
    pub(crate) data: Vec<u8>,
    pub(crate) records: Vec<Record>,
    pub(crate) existing_header: Option<ArchiveHeader>,
    pub(crate) unaccounted_bytes: usize,
    pub(crate) warnings: Vec<Warning>,
}

impl Archive {
    /// Parses an archive, rejecting it at the first malformed record.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_policy(data, RecordPolicy::Abort)
    }

    /// Parses an archive with the given policy for malformed records.
    pub fn from_bytes_with_policy(data: Vec<u8>, policy: RecordPolicy) -> Result<Self> {
        let built = build_records(&data, policy)?;
        Ok(Self {
            data,
            records: built.records,
            existing_header: built.existing_header,
            unaccounted_bytes: built.unaccounted_bytes,
            warnings: built.warnings,
        })
    }

    /// Reads and parses an archive file.
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes(data)
    }

    /// Returns the archive buffer.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the records in ascending offset order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Returns the bytes of one record, header and payload.
    pub fn record_bytes(&self, record: &Record) -> &[u8] {
        &self.data[record.byte_range()]
    }

    /// Returns the payload of one record.
    pub fn payload(&self, record: &Record) -> &[u8] {
        &self.data[record.payload_range()]
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the archive has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the top-level header the input already carried, if any.
    pub fn existing_header(&self) -> Option<&ArchiveHeader> {
        self.existing_header.as_ref()
    }

    /// Returns the number of input bytes not covered by any record or the
    /// existing header.
    pub fn unaccounted_bytes(&self) -> usize {
        self.unaccounted_bytes
    }

    /// Returns the anomalies recovered while building the record list.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Returns a summary of the archive.
    pub fn info(&self) -> ArchiveInfo {
        ArchiveInfo::from_archive(self)
    }

    /// Returns the first record with the given trimmed name.
    pub fn find(&self, name: &[u8]) -> Option<&Record> {
        self.records.iter().find(|r| r.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::record::tests::record_header;

    fn record(name: &[u8], payload: &[u8]) -> Vec<u8> {
        let mut bytes = record_header(name, b"D:\\LINKS\\DATA\\", payload.len() as u32);
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn test_from_bytes_lists_records() {
        let mut data = record(b"COURSE.HDR", &[1; 10]);
        data.extend(record(b"HOLE1.OFS", &[2; 5]));

        let archive = Archive::from_bytes(data).unwrap();
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.records()[1].offset, 132);
        assert_eq!(archive.payload(&archive.records()[1]), &[2; 5]);
        assert_eq!(archive.find(b"HOLE1.OFS").map(|r| r.offset), Some(132));
        assert!(archive.find(b"NOPE").is_none());
        assert_eq!(archive.unaccounted_bytes(), 0);
        assert!(archive.existing_header().is_none());
    }

    #[test]
    fn test_empty_archive_is_valid() {
        let archive = Archive::from_bytes(Vec::new()).unwrap();
        assert!(archive.is_empty());
        let archive = Archive::from_bytes(vec![0u8; 64]).unwrap();
        assert!(archive.is_empty());
        assert_eq!(archive.unaccounted_bytes(), 64);
    }

    #[test]
    fn test_open_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("TEST.CRS");
        std::fs::write(&path, record(b"A.OFS", b"abc")).unwrap();

        let archive = Archive::open_path(&path).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.record_bytes(&archive.records()[0]).len(), 125);
    }

    #[test]
    fn test_open_missing_path() {
        let err = Archive::open_path("/nonexistent/COURSE.CRS").unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
