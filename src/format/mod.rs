//! CRS archive format constants, field layouts, and low-level codecs.
//!
//! A CRS archive is a flat sequence of blocks. Every block starts with the
//! same 122-byte header shape introduced by the `MDmd` marker: the top-level
//! archive header (whose payload is the file index) and one record per
//! compressed file.

pub mod header;
pub mod index;
pub mod record;
pub mod scanner;

/// The block marker that introduces every CRS header.
pub const SIGNATURE: &[u8; 4] = b"MDmd";

/// Release level stored right after the marker (v1.0).
pub const RELEASE_LEVEL: u8 = 0x0A;

/// Header type stored after the release level.
pub const HEADER_TYPE: u8 = 0x01;

/// Size of every block header in bytes (archive header and record headers).
pub const HEADER_SIZE: usize = 122;

/// Size of one index table entry in bytes.
pub const INDEX_ENTRY_SIZE: usize = 17;

/// Capacity of the name field inside a record header.
pub const NAME_CAPACITY: usize = 12;

/// Capacity of the path field inside a record header.
pub const PATH_CAPACITY: usize = 14;

/// Marker string stored in the archive header where records keep their name.
pub const INDEX_MARKER: &[u8; 7] = b"~INDEX~";

/// Largest offset an index entry can encode (24 bits).
pub const MAX_INDEX_OFFSET: u64 = 0xFF_FFFF;

/// Byte used for padding in name, path and filler regions.
pub const PADDING: u8 = 0x20;

/// Field offsets inside a record header.
pub mod record_field {
    /// Marker (4 bytes).
    pub const SIGNATURE: usize = 0x00;
    /// Release level (1 byte).
    pub const RELEASE_LEVEL: usize = 0x04;
    /// Header type (1 byte).
    pub const HEADER_TYPE: usize = 0x05;
    /// Declared header size (2 bytes).
    pub const HEADER_SIZE: usize = 0x06;
    /// Compression type code (1 byte).
    pub const COMPRESSION: usize = 0x18;
    /// Original (uncompressed) size (4 bytes).
    pub const ORIGINAL_SIZE: usize = 0x19;
    /// Compressed payload size (4 bytes).
    pub const COMPRESSED_SIZE: usize = 0x1D;
    /// File attributes (2 bytes).
    pub const ATTRIBUTES: usize = 0x21;
    /// MS-DOS file time (2 bytes).
    pub const TIME: usize = 0x23;
    /// MS-DOS file date (2 bytes).
    pub const DATE: usize = 0x25;
    /// CRC of the original data (2 bytes).
    pub const CRC: usize = 0x27;
    /// Length prefix of the name field.
    pub const NAME_LEN: usize = 0x29;
    /// Name field (12 bytes).
    pub const NAME: usize = 0x2A;
    /// Length prefix of the path field.
    pub const PATH_LEN: usize = 0x36;
    /// Path field (14 bytes).
    pub const PATH: usize = 0x37;
}

/// Field offsets inside the top-level archive header.
pub mod header_field {
    /// Marker (4 bytes).
    pub const SIGNATURE: usize = 0x00;
    /// Release level (1 byte).
    pub const RELEASE_LEVEL: usize = 0x04;
    /// Header type (1 byte).
    pub const HEADER_TYPE: usize = 0x05;
    /// Declared header size (2 bytes).
    pub const HEADER_SIZE: usize = 0x06;
    /// Number of files in the index (2 bytes).
    pub const FILE_COUNT: usize = 0x0A;
    /// Index table size (2 bytes).
    pub const INDEX_SIZE: usize = 0x19;
    /// Index table size, second copy (2 bytes).
    pub const INDEX_SIZE_DUP: usize = 0x1D;
    /// MS-DOS archive time (2 bytes).
    pub const TIME: usize = 0x23;
    /// MS-DOS archive date (2 bytes).
    pub const DATE: usize = 0x25;
    /// Length prefix of the index marker.
    pub const MARKER_LEN: usize = 0x29;
    /// Index marker string.
    pub const MARKER: usize = 0x2A;
    /// Space padding following the marker.
    pub const MARKER_PADDING: usize = 0x31;
    /// The single null separator.
    pub const NULL_SEPARATOR: usize = 0x36;
    /// Trailing space padding up to the end of the header.
    pub const TRAILING_PADDING: usize = 0x37;
}

/// Reads a little-endian `u16` at `pos`. The caller guarantees bounds.
#[inline]
pub(crate) fn u16_at(data: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([data[pos], data[pos + 1]])
}

/// Reads a little-endian `u32` at `pos`. The caller guarantees bounds.
#[inline]
pub(crate) fn u32_at(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

/// Writes a little-endian `u16` at `pos`. The caller guarantees bounds.
#[inline]
pub(crate) fn put_u16(data: &mut [u8], pos: usize, value: u16) {
    data[pos..pos + 2].copy_from_slice(&value.to_le_bytes());
}

/// Strips trailing space and NUL padding from a fixed-width text field.
pub fn trim_padding(field: &[u8]) -> &[u8] {
    let end = field
        .iter()
        .rposition(|&b| b != PADDING && b != 0)
        .map_or(0, |p| p + 1);
    &field[..end]
}

/// Renders a name for messages, replacing bytes that are not printable ASCII.
pub(crate) fn display_name(name: &[u8]) -> String {
    name.iter()
        .map(|&b| {
            if b.is_ascii_graphic() || b == b' ' {
                b as char
            } else {
                '?'
            }
        })
        .collect()
}
