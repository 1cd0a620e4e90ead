//! Per-file patch reports.

use crate::edit::RemovedRecord;
use crate::error::Warning;
use crate::format::INDEX_ENTRY_SIZE;
use crate::timestamp::DosDateTime;

/// One record as it appears in the output index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedRecord {
    /// Record name.
    pub name: String,
    /// Offset of the record in the input.
    pub original_offset: u64,
    /// Offset of the record in the output.
    pub new_offset: u64,
    /// The serialized index entry.
    pub entry: [u8; INDEX_ENTRY_SIZE],
}

impl IndexedRecord {
    /// Returns the index entry as space-separated hex bytes.
    pub fn entry_hex(&self) -> String {
        self.entry
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// What happened to one archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    /// Size of the input.
    pub input_len: usize,
    /// Size of the output.
    pub output_len: usize,
    /// Records found in the input.
    pub records_found: usize,
    /// Records removed, highest input offset first.
    pub removed: Vec<RemovedRecord>,
    /// Surviving records in output order.
    pub entries: Vec<IndexedRecord>,
    /// Number of path fields rewritten.
    pub paths_patched: usize,
    /// Recovered anomalies.
    pub warnings: Vec<Warning>,
    /// Timestamp written to the archive header.
    pub timestamp: DosDateTime,
    /// File count written to the archive header.
    pub file_count: u16,
    /// Index table size written to the archive header.
    pub index_size: u16,
    /// Whether the input already had an archive header that was replaced.
    pub replaced_header: bool,
    /// Input bytes outside every record, dropped from the output.
    pub unaccounted_bytes: usize,
}

impl PatchReport {
    /// Returns true if every input record was carried over and nothing was
    /// skipped, dropped or left unpatched.
    ///
    /// Path fields and the archive header are still rewritten in a clean run.
    pub fn is_clean(&self) -> bool {
        self.removed.is_empty() && self.warnings.is_empty() && self.unaccounted_bytes == 0
    }

    /// Returns the net change in size.
    pub fn size_delta(&self) -> i64 {
        self.output_len as i64 - self.input_len as i64
    }
}
