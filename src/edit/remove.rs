//! Record removal.
//!
//! Survivors are copied in ascending order into a fresh buffer and each is
//! given its new offset as it lands. The input buffer is never mutated, so
//! the offsets recorded during parsing stay valid for the whole pass.

use crate::format::display_name;
use crate::read::Archive;

/// Names excluded by default: course data the stricter platform rejects.
pub const DEFAULT_EXCLUSIONS: &[&[u8]] = &[b"PATCH.OFS", b"OBJECT.OFS"];

/// A set of record names to remove.
///
/// Names are compared byte for byte, case-sensitively, against the record's
/// name field with its padding trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusions {
    names: Vec<Vec<u8>>,
}

impl Default for Exclusions {
    fn default() -> Self {
        Self::from_names(DEFAULT_EXCLUSIONS.iter().copied())
    }
}

impl Exclusions {
    /// Creates an empty set. Nothing is removed.
    pub fn none() -> Self {
        Self { names: Vec::new() }
    }

    /// Creates a set from the given names.
    pub fn from_names<I, N>(names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: AsRef<[u8]>,
    {
        let mut set = Self::none();
        for name in names {
            set.insert(name);
        }
        set
    }

    /// Adds a name. Duplicates are ignored.
    pub fn insert(&mut self, name: impl AsRef<[u8]>) {
        let name = name.as_ref();
        if !self.contains(name) {
            self.names.push(name.to_vec());
        }
    }

    /// Returns a copy of the set with `name` added.
    pub fn with(mut self, name: impl AsRef<[u8]>) -> Self {
        self.insert(name);
        self
    }

    /// Returns true if `name` is excluded.
    pub fn contains(&self, name: &[u8]) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Iterates the excluded names in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.names.iter().map(Vec::as_slice)
    }

    /// Returns the number of names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A record that was removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedRecord {
    /// Record name.
    pub name: String,
    /// Offset of the record in the input.
    pub offset: usize,
    /// Header plus payload length.
    pub len: usize,
}

/// The result of [`remove_records`].
#[derive(Debug, Clone)]
pub struct Removal {
    /// The compacted archive holding only surviving records.
    pub archive: Archive,
    /// Removed records, highest input offset first.
    pub removed: Vec<RemovedRecord>,
    /// Input offset of each surviving record, parallel to
    /// `archive.records()`.
    pub original_offsets: Vec<usize>,
}

impl Removal {
    /// Returns true if nothing was removed.
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty()
    }

    /// Total bytes removed.
    pub fn bytes_removed(&self) -> usize {
        self.removed.iter().map(|r| r.len).sum()
    }
}

/// Removes every record whose name is in `exclusions`.
///
/// The returned archive's buffer holds exactly the surviving records,
/// back to back, in their original order. Bytes outside every record are
/// not carried over.
pub fn remove_records(archive: Archive, exclusions: &Exclusions) -> Removal {
    let Archive {
        data,
        records,
        existing_header,
        warnings,
        ..
    } = archive;

    let (survivors, excluded): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|record| !exclusions.contains(record.name()));

    let mut removed: Vec<RemovedRecord> = excluded
        .iter()
        .map(|record| RemovedRecord {
            name: display_name(record.name()),
            offset: record.offset,
            len: record.total_len(),
        })
        .collect();
    removed.sort_by(|a, b| b.offset.cmp(&a.offset));

    for r in &removed {
        log::debug!(
            "Removing '{}' ({:#08x}-{:#08x})",
            r.name,
            r.offset,
            r.offset + r.len
        );
    }
    if removed.is_empty() {
        if exclusions.is_empty() {
            log::debug!("Exclusion set is empty, nothing to remove");
        } else {
            log::info!("No records matched the exclusion set");
        }
    }

    let capacity = survivors.iter().map(|r| r.total_len()).sum();
    let mut compacted = Vec::with_capacity(capacity);
    let mut relocated = Vec::with_capacity(survivors.len());
    let mut original_offsets = Vec::with_capacity(survivors.len());
    for mut record in survivors {
        let bytes = &data[record.byte_range()];
        original_offsets.push(record.offset);
        record.offset = compacted.len();
        compacted.extend_from_slice(bytes);
        relocated.push(record);
    }

    Removal {
        archive: Archive {
            data: compacted,
            records: relocated,
            existing_header,
            unaccounted_bytes: 0,
            warnings,
        },
        removed,
        original_offsets,
    }
}
