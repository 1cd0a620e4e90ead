//! Shared test utilities for integration tests.
//!
//! Builds synthetic CRS archives byte by byte so the tests do not depend on
//! real course files.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use crspatch::DosDateTime;

/// A path field value as shipped by the original course installer.
pub const SOURCE_PATH: &[u8; 14] = b"D:\\LINKS\\DATA\\";

/// Describes one record of a synthetic archive.
#[derive(Debug, Clone)]
pub struct RecordSpec {
    pub name: Vec<u8>,
    pub path: Vec<u8>,
    pub payload: Vec<u8>,
}

impl RecordSpec {
    /// A record with the standard 14-byte path and a payload of `len` bytes
    /// filled with `fill`.
    pub fn new(name: &str, fill: u8, len: usize) -> Self {
        Self {
            name: name.as_bytes().to_vec(),
            path: SOURCE_PATH.to_vec(),
            payload: vec![fill; len],
        }
    }

    /// Overrides the path field.
    pub fn path(mut self, path: &[u8]) -> Self {
        self.path = path.to_vec();
        self
    }

    /// Overrides the payload.
    pub fn payload(mut self, payload: &[u8]) -> Self {
        self.payload = payload.to_vec();
        self
    }

    /// Encodes the header and payload.
    pub fn encode(&self) -> Vec<u8> {
        let mut h = vec![0x20u8; 122];
        h[0..4].copy_from_slice(b"MDmd");
        h[4] = 0x0A;
        h[5] = 0x01;
        h[6..8].copy_from_slice(&122u16.to_le_bytes());
        h[8..0x29].fill(0);
        h[0x18] = 2;
        let len = self.payload.len() as u32;
        h[0x19..0x1D].copy_from_slice(&(len * 3).to_le_bytes());
        h[0x1D..0x21].copy_from_slice(&len.to_le_bytes());
        h[0x23..0x25].copy_from_slice(&0x645Cu16.to_le_bytes());
        h[0x25..0x27].copy_from_slice(&0x586Fu16.to_le_bytes());
        h[0x29] = self.name.len() as u8;
        h[0x2A..0x2A + self.name.len()].copy_from_slice(&self.name);
        h[0x36] = self.path.len() as u8;
        h[0x37..0x37 + self.path.len()].copy_from_slice(&self.path);
        h.extend_from_slice(&self.payload);
        h
    }
}

/// Concatenates the encoded records.
pub fn build_archive(records: &[RecordSpec]) -> Vec<u8> {
    records.iter().flat_map(RecordSpec::encode).collect()
}

/// The three-record course used across tests: `COURSE.HDR` (100 bytes),
/// `PATCH.OFS` (50 bytes) and `OBJECT.OFS` (30 bytes).
pub fn sample_course() -> Vec<RecordSpec> {
    vec![
        RecordSpec::new("COURSE.HDR", 0x11, 100),
        RecordSpec::new("PATCH.OFS", 0x22, 50),
        RecordSpec::new("OBJECT.OFS", 0x33, 30),
    ]
}

/// A fixed header timestamp: 2024-03-15 12:34:56.
pub fn stamp() -> DosDateTime {
    DosDateTime::from_parts(2024, 3, 15, 12, 34, 56).unwrap()
}

/// Reads a little-endian u16.
pub fn u16_at(data: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([data[pos], data[pos + 1]])
}

/// Reads the 24-bit offsets from an index table.
pub fn index_offsets(output: &[u8]) -> Vec<usize> {
    let count = usize::from(u16_at(output, 0x0A));
    (0..count)
        .map(|i| {
            let entry = &output[122 + i * 17..122 + (i + 1) * 17];
            usize::from(entry[13]) | usize::from(entry[14]) << 8 | usize::from(entry[15]) << 16
        })
        .collect()
}
