//! Top-level archive header.
//!
//! The archive header is synthesized field by field; there is no binary
//! template. Its layout mirrors a record header: the index marker sits where
//! records keep their name and the index table plays the role of payload.
//!
//! | Offset | Size | Field |
//! |--------|------|-------|
//! | 0x00 | 4 | `MDmd` |
//! | 0x04 | 1 | release level |
//! | 0x05 | 1 | header type |
//! | 0x06 | 2 | header size (122) |
//! | 0x0A | 2 | file count |
//! | 0x19 | 2 | index table size |
//! | 0x1D | 2 | index table size (copy) |
//! | 0x23 | 2 | MS-DOS time |
//! | 0x25 | 2 | MS-DOS date |
//! | 0x29 | 1 | marker length (7) |
//! | 0x2A | 7 | `~INDEX~` |
//! | 0x31 | 5 | spaces |
//! | 0x36 | 1 | NUL |
//! | 0x37 | 67 | spaces |
//!
//! Every other byte is reserved and written as zero, not as space padding:
//! with zeros at `0x1F..0x21` the header also reads as a record named
//! `~INDEX~` whose payload is exactly the index table.

use super::{
    HEADER_SIZE, HEADER_TYPE, INDEX_ENTRY_SIZE, INDEX_MARKER, PADDING, RELEASE_LEVEL, SIGNATURE,
    header_field as field, put_u16, u16_at,
};
use crate::timestamp::DosDateTime;
use crate::{Error, Result};

/// Capacity of the marker field, from its start up to the null separator.
const MARKER_CAPACITY: usize = field::NULL_SEPARATOR - field::MARKER;

/// A fully specified top-level archive header.
///
/// Instances are immutable; build one with [`ArchiveHeader::builder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    signature: [u8; 4],
    release_level: u8,
    header_type: u8,
    file_count: u16,
    index_size: u16,
    timestamp: DosDateTime,
    marker: Vec<u8>,
}

impl ArchiveHeader {
    /// Starts a builder preloaded with the format constants.
    pub fn builder() -> ArchiveHeaderBuilder {
        ArchiveHeaderBuilder::default()
    }

    /// Decodes an archive header from the first 122 bytes of `data`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] if the data is too short, the
    /// marker or declared size is wrong, or the marker length prefix does
    /// not fit its field.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(Error::malformed(0, "archive header truncated"));
        }
        if &data[..4] != SIGNATURE {
            return Err(Error::malformed(0, "missing MDmd marker"));
        }
        let header_size = u16_at(data, field::HEADER_SIZE);
        if usize::from(header_size) != HEADER_SIZE {
            return Err(Error::malformed(
                0,
                format!("declared header size {header_size}, expected {HEADER_SIZE}"),
            ));
        }
        let marker_len = usize::from(data[field::MARKER_LEN]);
        if marker_len > MARKER_CAPACITY {
            return Err(Error::malformed(
                0,
                format!("marker length {marker_len} exceeds {MARKER_CAPACITY}"),
            ));
        }

        Ok(Self {
            signature: *SIGNATURE,
            release_level: data[field::RELEASE_LEVEL],
            header_type: data[field::HEADER_TYPE],
            file_count: u16_at(data, field::FILE_COUNT),
            index_size: u16_at(data, field::INDEX_SIZE),
            timestamp: DosDateTime::from_raw(u16_at(data, field::DATE), u16_at(data, field::TIME)),
            marker: data[field::MARKER..field::MARKER + marker_len].to_vec(),
        })
    }

    /// Serializes the header.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];

        out[field::SIGNATURE..field::SIGNATURE + 4].copy_from_slice(&self.signature);
        out[field::RELEASE_LEVEL] = self.release_level;
        out[field::HEADER_TYPE] = self.header_type;
        put_u16(&mut out, field::HEADER_SIZE, HEADER_SIZE as u16);

        put_u16(&mut out, field::FILE_COUNT, self.file_count);
        put_u16(&mut out, field::INDEX_SIZE, self.index_size);
        put_u16(&mut out, field::INDEX_SIZE_DUP, self.index_size);

        put_u16(&mut out, field::TIME, self.timestamp.time());
        put_u16(&mut out, field::DATE, self.timestamp.date());

        // Marker and its padding fill the span up to the null separator.
        out[field::MARKER_LEN] = self.marker.len() as u8;
        let marker_end = field::MARKER + self.marker.len();
        out[field::MARKER..marker_end].copy_from_slice(&self.marker);
        out[marker_end..field::NULL_SEPARATOR].fill(PADDING);
        out[field::NULL_SEPARATOR] = 0x00;
        out[field::TRAILING_PADDING..].fill(PADDING);

        out
    }

    /// Returns the release level byte.
    pub fn release_level(&self) -> u8 {
        self.release_level
    }

    /// Returns the header type byte.
    pub fn header_type(&self) -> u8 {
        self.header_type
    }

    /// Returns the declared number of files.
    pub fn file_count(&self) -> u16 {
        self.file_count
    }

    /// Returns the index table size in bytes.
    pub fn index_size(&self) -> u16 {
        self.index_size
    }

    /// Returns the archive timestamp.
    pub fn timestamp(&self) -> DosDateTime {
        self.timestamp
    }

    /// Returns the index marker string.
    pub fn marker(&self) -> &[u8] {
        &self.marker
    }

    /// Offset of the first record following the header and index.
    pub fn data_start(&self) -> usize {
        HEADER_SIZE + usize::from(self.index_size)
    }
}

/// Builder for [`ArchiveHeader`].
///
/// Every field can be set; the defaults are the format constants, a zero
/// file count, and the MS-DOS epoch.
///
/// # Example
///
/// ```rust
/// use crspatch::format::header::ArchiveHeader;
/// use crspatch::DosDateTime;
///
/// let header = ArchiveHeader::builder()
///     .file_count(3)
///     .timestamp(DosDateTime::from_parts(1996, 5, 4, 10, 0, 0).unwrap())
///     .build()
///     .unwrap();
/// assert_eq!(header.index_size(), 51);
/// assert_eq!(header.data_start(), 173);
/// ```
#[derive(Debug, Clone)]
pub struct ArchiveHeaderBuilder {
    signature: [u8; 4],
    release_level: u8,
    header_type: u8,
    file_count: usize,
    index_size: Option<u16>,
    timestamp: DosDateTime,
    marker: Vec<u8>,
}

impl Default for ArchiveHeaderBuilder {
    fn default() -> Self {
        Self {
            signature: *SIGNATURE,
            release_level: RELEASE_LEVEL,
            header_type: HEADER_TYPE,
            file_count: 0,
            index_size: None,
            // 1980-01-01 00:00:00
            timestamp: DosDateTime::from_raw((1 << 5) | 1, 0),
            marker: INDEX_MARKER.to_vec(),
        }
    }
}

impl ArchiveHeaderBuilder {
    /// Sets the marker signature.
    pub fn signature(mut self, signature: [u8; 4]) -> Self {
        self.signature = signature;
        self
    }

    /// Sets the release level byte.
    pub fn release_level(mut self, level: u8) -> Self {
        self.release_level = level;
        self
    }

    /// Sets the header type byte.
    pub fn header_type(mut self, header_type: u8) -> Self {
        self.header_type = header_type;
        self
    }

    /// Sets the number of files in the index.
    pub fn file_count(mut self, count: usize) -> Self {
        self.file_count = count;
        self
    }

    /// Overrides the index table size. Defaults to `file_count × 17`.
    pub fn index_size(mut self, size: u16) -> Self {
        self.index_size = Some(size);
        self
    }

    /// Sets the archive timestamp.
    pub fn timestamp(mut self, timestamp: DosDateTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Sets the index marker string.
    pub fn marker(mut self, marker: impl Into<Vec<u8>>) -> Self {
        self.marker = marker.into();
        self
    }

    /// Validates the fields and produces the header.
    ///
    /// # Errors
    ///
    /// - [`Error::IndexTooLarge`] if the file count or index size does not
    ///   fit its 16-bit field
    /// - [`Error::MalformedRecord`] if the marker does not fit its field
    pub fn build(self) -> Result<ArchiveHeader> {
        let file_count = u16::try_from(self.file_count).map_err(|_| Error::IndexTooLarge {
            file_count: self.file_count,
        })?;
        let index_size = match self.index_size {
            Some(size) => size,
            None => self
                .file_count
                .checked_mul(INDEX_ENTRY_SIZE)
                .and_then(|size| u16::try_from(size).ok())
                .ok_or(Error::IndexTooLarge {
                    file_count: self.file_count,
                })?,
        };
        if self.marker.len() > MARKER_CAPACITY {
            return Err(Error::malformed(
                0,
                format!(
                    "marker of {} bytes exceeds {MARKER_CAPACITY}",
                    self.marker.len()
                ),
            ));
        }

        Ok(ArchiveHeader {
            signature: self.signature,
            release_level: self.release_level,
            header_type: self.header_type,
            file_count,
            index_size,
            timestamp: self.timestamp,
            marker: self.marker,
        })
    }
}
