//! Record header parsing.
//!
//! Each compressed file in a CRS archive is stored as a 122-byte header
//! followed by `compressed_size` bytes of opaque payload. This module decodes
//! and validates one such header at a known offset.

use std::ops::Range;

use super::{
    HEADER_SIZE, INDEX_MARKER, NAME_CAPACITY, PATH_CAPACITY, SIGNATURE, display_name,
    record_field as field, trim_padding, u16_at, u32_at,
};
use crate::timestamp::DosDateTime;
use crate::{Error, Result};

/// A decoded record header and the location of its payload.
///
/// Offsets are relative to the buffer the record was parsed from. After
/// the record is moved into a new buffer (see [`crate::edit::remove_records`]) only
/// `offset` changes; the header fields describe the record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Start offset of the header in its buffer.
    pub offset: usize,
    /// Release level byte.
    pub release_level: u8,
    /// Header type byte.
    pub header_type: u8,
    /// Declared header size. Always [`HEADER_SIZE`] for a parsed record.
    pub header_size: u16,
    /// Compression type code. Not interpreted.
    pub compression: u8,
    /// Size of the original file.
    pub original_size: u32,
    /// Size of the payload following the header.
    pub compressed_size: u32,
    /// File attributes.
    pub attributes: u16,
    /// Modification time of the stored file.
    pub modified: DosDateTime,
    /// CRC of the original data.
    pub crc: u16,
    name: [u8; NAME_CAPACITY],
    name_len: u8,
    path: [u8; PATH_CAPACITY],
    path_len: u8,
}

impl Record {
    /// Parses and validates the record header starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedRecord`] if:
    /// - fewer than 122 bytes remain at `offset`
    /// - the marker is missing
    /// - the declared header size is not 122
    /// - the payload would extend past the end of `data`
    /// - the name field holds bytes outside printable ASCII
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        let header_end = offset
            .checked_add(HEADER_SIZE)
            .filter(|&end| end <= data.len())
            .ok_or_else(|| {
                Error::malformed(
                    offset,
                    format!(
                        "header truncated: {} bytes available, {} required",
                        data.len().saturating_sub(offset),
                        HEADER_SIZE
                    ),
                )
            })?;
        let header = &data[offset..header_end];

        if &header[field::SIGNATURE..field::SIGNATURE + 4] != SIGNATURE {
            return Err(Error::malformed(offset, "missing MDmd marker"));
        }

        let header_size = u16_at(header, field::HEADER_SIZE);
        if usize::from(header_size) != HEADER_SIZE {
            return Err(Error::malformed(
                offset,
                format!("declared header size {header_size}, expected {HEADER_SIZE}"),
            ));
        }

        let compressed_size = u32_at(header, field::COMPRESSED_SIZE);
        let remaining = data.len() - header_end;
        if compressed_size as usize > remaining {
            return Err(Error::malformed(
                offset,
                format!(
                    "compressed size {compressed_size} exceeds the {remaining} bytes remaining"
                ),
            ));
        }

        let mut name = [0u8; NAME_CAPACITY];
        name.copy_from_slice(&header[field::NAME..field::NAME + NAME_CAPACITY]);
        if let Some(&bad) = trim_padding(&name)
            .iter()
            .find(|&&b| !(0x20..=0x7E).contains(&b))
        {
            return Err(Error::malformed(
                offset,
                format!("name field contains non-printable byte {bad:#04x}"),
            ));
        }

        let mut path = [0u8; PATH_CAPACITY];
        path.copy_from_slice(&header[field::PATH..field::PATH + PATH_CAPACITY]);

        Ok(Self {
            offset,
            release_level: header[field::RELEASE_LEVEL],
            header_type: header[field::HEADER_TYPE],
            header_size,
            compression: header[field::COMPRESSION],
            original_size: u32_at(header, field::ORIGINAL_SIZE),
            compressed_size,
            attributes: u16_at(header, field::ATTRIBUTES),
            modified: DosDateTime::from_raw(
                u16_at(header, field::DATE),
                u16_at(header, field::TIME),
            ),
            crc: u16_at(header, field::CRC),
            name,
            name_len: header[field::NAME_LEN],
            path,
            path_len: header[field::PATH_LEN],
        })
    }

    /// Returns the name with its padding trimmed.
    pub fn name(&self) -> &[u8] {
        trim_padding(&self.name)
    }

    /// Returns the raw 12-byte name field.
    pub fn name_field(&self) -> &[u8; NAME_CAPACITY] {
        &self.name
    }

    /// Returns the name for display.
    pub fn display_name(&self) -> String {
        display_name(self.name())
    }

    /// Returns the name length prefix byte.
    pub fn name_len(&self) -> u8 {
        self.name_len
    }

    /// Returns the raw 14-byte path field.
    pub fn path_field(&self) -> &[u8; PATH_CAPACITY] {
        &self.path
    }

    /// Returns the path length prefix byte.
    pub fn path_len(&self) -> u8 {
        self.path_len
    }

    /// Returns true if this block is a top-level archive header rather than
    /// a file record.
    ///
    /// An archive header has the same shape as a record header, carries the
    /// index marker where records keep their name, and its "payload" is the
    /// index table.
    pub fn is_archive_header(&self) -> bool {
        self.name() == INDEX_MARKER
    }

    /// Total size of header plus payload.
    pub fn total_len(&self) -> usize {
        HEADER_SIZE + self.compressed_size as usize
    }

    /// Offset one past the last payload byte.
    pub fn end(&self) -> usize {
        self.offset + self.total_len()
    }

    /// Byte range of the payload.
    pub fn payload_range(&self) -> Range<usize> {
        self.offset + HEADER_SIZE..self.end()
    }

    /// Byte range of the whole record.
    pub fn byte_range(&self) -> Range<usize> {
        self.offset..self.end()
    }

    pub(crate) fn set_path(&mut self, len: u8, path: [u8; PATH_CAPACITY]) {
        self.path_len = len;
        self.path = path;
    }
}
