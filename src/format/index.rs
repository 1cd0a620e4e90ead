//! Index table entries.
//!
//! The index follows the archive header and holds one 17-byte entry per
//! record:
//!
//! - 13 bytes: the record's space-padded 12-byte name field, NUL-terminated
//! - 3 bytes: little-endian offset of the record header in the archive
//! - 1 byte: reserved (zero)

use super::{INDEX_ENTRY_SIZE, MAX_INDEX_OFFSET, NAME_CAPACITY, PADDING, display_name, trim_padding};

const NAME_FIELD: usize = NAME_CAPACITY + 1;

/// One entry of the index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexEntry {
    name: [u8; NAME_CAPACITY],
    offset: u32,
}

impl IndexEntry {
    /// Creates an entry. Returns `None` if `offset` does not fit in 24 bits.
    pub fn new(name: [u8; NAME_CAPACITY], offset: u64) -> Option<Self> {
        if offset > MAX_INDEX_OFFSET {
            return None;
        }
        Some(Self {
            name,
            offset: offset as u32,
        })
    }

    /// Decodes an entry from 17 bytes.
    pub fn parse(bytes: &[u8; INDEX_ENTRY_SIZE]) -> Self {
        let mut name = [PADDING; NAME_CAPACITY];
        let text = &bytes[..NAME_CAPACITY];
        let len = text.iter().position(|&b| b == 0).unwrap_or(NAME_CAPACITY);
        name[..len].copy_from_slice(&text[..len]);
        let offset = u32::from_le_bytes([bytes[13], bytes[14], bytes[15], 0]);
        Self { name, offset }
    }

    /// Serializes the entry.
    pub fn encode(&self) -> [u8; INDEX_ENTRY_SIZE] {
        let mut out = [0u8; INDEX_ENTRY_SIZE];
        out[..NAME_CAPACITY].copy_from_slice(&self.name);
        // out[12] stays NUL as the terminator.
        out[NAME_FIELD..NAME_FIELD + 3].copy_from_slice(&self.offset.to_le_bytes()[..3]);
        out
    }

    /// Returns the name with padding trimmed.
    pub fn name(&self) -> &[u8] {
        trim_padding(&self.name)
    }

    /// Returns the name for display.
    pub fn display_name(&self) -> String {
        display_name(self.name())
    }

    /// Returns the record offset.
    pub fn offset(&self) -> u64 {
        u64::from(self.offset)
    }
}

/// Decodes every complete entry of an index table.
pub fn parse_index(table: &[u8]) -> Vec<IndexEntry> {
    table
        .chunks_exact(INDEX_ENTRY_SIZE)
        .filter_map(|chunk| <&[u8; INDEX_ENTRY_SIZE]>::try_from(chunk).ok())
        .map(IndexEntry::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &[u8]) -> [u8; NAME_CAPACITY] {
        let mut field = [PADDING; NAME_CAPACITY];
        field[..text.len()].copy_from_slice(text);
        field
    }

    #[test]
    fn test_encode_layout() {
        let entry = IndexEntry::new(name(b"COURSE.HDR"), 139).unwrap();
        let bytes = entry.encode();
        assert_eq!(&bytes[..12], b"COURSE.HDR  ");
        assert_eq!(bytes[12], 0);
        assert_eq!(&bytes[13..16], &[0x8B, 0x00, 0x00]);
        assert_eq!(bytes[16], 0);
    }

    #[test]
    fn test_full_width_name_still_terminated() {
        let entry = IndexEntry::new(*b"ABCDEFGH.IJK", 0x123456).unwrap();
        let bytes = entry.encode();
        assert_eq!(&bytes[..12], b"ABCDEFGH.IJK");
        assert_eq!(bytes[12], 0);
        assert_eq!(&bytes[13..16], &[0x56, 0x34, 0x12]);
    }

    #[test]
    fn test_offset_range() {
        assert!(IndexEntry::new(name(b"A"), MAX_INDEX_OFFSET).is_some());
        assert!(IndexEntry::new(name(b"A"), MAX_INDEX_OFFSET + 1).is_none());
    }

    #[test]
    fn test_parse_accepts_nul_padding() {
        let mut bytes = [0u8; INDEX_ENTRY_SIZE];
        bytes[..9].copy_from_slice(b"PATCH.OFS");
        bytes[13] = 0x10;
        bytes[14] = 0x02;
        let entry = IndexEntry::parse(&bytes);
        assert_eq!(entry.name(), b"PATCH.OFS");
        assert_eq!(entry.offset(), 0x0210);
    }

    #[test]
    fn test_parse_index_table() {
        let mut table = Vec::new();
        table.extend_from_slice(&IndexEntry::new(name(b"A.OFS"), 156).unwrap().encode());
        table.extend_from_slice(&IndexEntry::new(name(b"B.OFS"), 300).unwrap().encode());
        table.push(0xFF); // trailing partial entry is ignored

        let entries = parse_index(&table);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].display_name(), "B.OFS");
        assert_eq!(entries[1].offset(), 300);
    }
}
