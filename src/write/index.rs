//! Index table construction.

use crate::format::index::IndexEntry;
use crate::format::record::Record;
use crate::format::{HEADER_SIZE, INDEX_ENTRY_SIZE, NAME_CAPACITY, PADDING};
use crate::{Error, Result};

/// The index layout for a set of surviving records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPlan {
    /// Number of indexed records.
    pub file_count: usize,
    /// Size of the index table in bytes.
    pub index_size: u16,
    /// Offset of the first record in the output.
    pub data_start: usize,
    /// One entry per record, in ascending offset order.
    pub entries: Vec<IndexEntry>,
}

impl IndexPlan {
    /// Serializes the entries into the index table.
    pub fn encode(&self) -> Vec<u8> {
        let mut table = Vec::with_capacity(usize::from(self.index_size));
        for entry in &self.entries {
            table.extend_from_slice(&entry.encode());
        }
        table
    }
}

/// Computes the output offset of every record and builds its index entry.
///
/// The first pass counts the records to size the index and locate the data
/// region; the second assigns each record the data start plus the lengths
/// of every record before it. `records` must be in output order.
///
/// # Errors
///
/// - [`Error::IndexTooLarge`] if the table does not fit the 16-bit size field
/// - [`Error::OffsetOverflow`] if a record would start beyond 24 bits
pub fn build_index(records: &[Record]) -> Result<IndexPlan> {
    let file_count = records.len();
    let index_size = file_count
        .checked_mul(INDEX_ENTRY_SIZE)
        .and_then(|size| u16::try_from(size).ok())
        .ok_or(Error::IndexTooLarge { file_count })?;
    let data_start = HEADER_SIZE + usize::from(index_size);

    let mut entries = Vec::with_capacity(file_count);
    let mut offset = data_start as u64;
    for record in records {
        let entry = IndexEntry::new(padded_name(record), offset).ok_or_else(|| {
            Error::OffsetOverflow {
                name: record.display_name(),
                offset,
            }
        })?;
        log::trace!("Index entry '{}' -> {:#08x}", record.display_name(), offset);
        entries.push(entry);
        offset += record.total_len() as u64;
    }

    Ok(IndexPlan {
        file_count,
        index_size,
        data_start,
        entries,
    })
}

/// The record name re-padded with spaces, whatever padding the record used.
fn padded_name(record: &Record) -> [u8; NAME_CAPACITY] {
    let mut field = [PADDING; NAME_CAPACITY];
    let name = record.name();
    field[..name.len()].copy_from_slice(name);
    field
}
