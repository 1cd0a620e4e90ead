//! Archive information types.

use super::Archive;

/// Summary of a parsed archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveInfo {
    /// Size of the archive buffer.
    pub archive_size: usize,
    /// Number of records.
    pub record_count: usize,
    /// Sum of the original sizes of all records.
    pub total_size: u64,
    /// Sum of the compressed payload sizes.
    pub packed_size: u64,
    /// Whether the input already carried a top-level header and index.
    pub has_index: bool,
    /// File count declared by the existing header, if any.
    pub declared_file_count: Option<u16>,
    /// Bytes outside every record.
    pub unaccounted_bytes: usize,
}

impl ArchiveInfo {
    pub(crate) fn from_archive(archive: &Archive) -> Self {
        let records = archive.records();
        Self {
            archive_size: archive.data().len(),
            record_count: records.len(),
            total_size: records.iter().map(|r| u64::from(r.original_size)).sum(),
            packed_size: records.iter().map(|r| u64::from(r.compressed_size)).sum(),
            has_index: archive.existing_header().is_some(),
            declared_file_count: archive.existing_header().map(|h| h.file_count()),
            unaccounted_bytes: archive.unaccounted_bytes(),
        }
    }

    /// Returns the compression ratio (packed / original).
    pub fn compression_ratio(&self) -> f64 {
        if self.total_size == 0 {
            1.0
        } else {
            self.packed_size as f64 / self.total_size as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::record::tests::record_header;

    #[test]
    fn test_info_sums_sizes() {
        // record_header stores original_size = 2 × compressed_size
        let mut data = record_header(b"A.OFS", b"", 10);
        data.extend_from_slice(&[0; 10]);
        data.extend(record_header(b"B.OFS", b"", 30));
        data.extend_from_slice(&[0; 30]);

        let info = Archive::from_bytes(data).unwrap().info();
        assert_eq!(info.record_count, 2);
        assert_eq!(info.packed_size, 40);
        assert_eq!(info.total_size, 80);
        assert!((info.compression_ratio() - 0.5).abs() < f64::EPSILON);
        assert!(!info.has_index);
        assert_eq!(info.declared_file_count, None);
    }

    #[test]
    fn test_info_empty() {
        let info = Archive::from_bytes(Vec::new()).unwrap().info();
        assert_eq!(info, ArchiveInfo::default());
        assert_eq!(info.compression_ratio(), 1.0);
    }
}
