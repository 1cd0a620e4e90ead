//! Error and warning types for CRS archive operations.
//!
//! This module provides the [`Error`] enum which represents every condition
//! that aborts processing of an archive, the [`Warning`] enum for anomalies
//! that are recovered locally, and the crate-wide [`Result<T>`] alias.
//!
//! # Error Handling
//!
//! Errors that would invalidate the positional integrity of the archive
//! (a bad header constant, a bounds violation, an offset the index cannot
//! represent) always abort the current file, and no output is written:
//!
//! ```rust
//! use crspatch::{Error, Patcher, DosDateTime};
//!
//! let patcher = Patcher::default();
//! let stamp = DosDateTime::from_parts(1995, 6, 1, 12, 0, 0).unwrap();
//! // A marker followed by garbage is not a valid record.
//! match patcher.patch_bytes(b"MDmd\x00\x00".to_vec(), stamp) {
//!     Err(Error::MalformedRecord { offset, reason }) => {
//!         println!("corrupt record at {offset:#x}: {reason}");
//!     }
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// The main error type for CRS archive operations.
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | I/O | [`Io`][Self::Io] | File system operations |
/// | Integrity | [`MalformedRecord`][Self::MalformedRecord] | Corrupt or truncated record |
/// | Capacity | [`OffsetOverflow`][Self::OffsetOverflow], [`IndexTooLarge`][Self::IndexTooLarge] | Archive too large for the index |
/// | Configuration | [`InvalidPath`][Self::InvalidPath], [`InvalidTimestamp`][Self::InvalidTimestamp] | Bad options |
/// | Batch | [`OutputConflict`][Self::OutputConflict] | Same-named inputs from different directories |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred while reading or writing an archive file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A record header failed validation.
    ///
    /// Every record after a corrupt one has an unknown position, so the
    /// whole file is rejected unless the caller opted into
    /// [`RecordPolicy::Skip`](crate::read::RecordPolicy::Skip).
    #[error("Malformed record at offset {offset:#x}: {reason}")]
    MalformedRecord {
        /// Start offset of the offending record in the input buffer.
        offset: u64,
        /// What failed to validate.
        reason: String,
    },

    /// A record would start beyond the 24-bit range of an index entry.
    #[error("Offset overflow for '{name}': {offset:#x} exceeds the 24-bit index range")]
    OffsetOverflow {
        /// Name of the record that could not be indexed.
        name: String,
        /// The offset the record would have in the output.
        offset: u64,
    },

    /// The index table would not fit in the header's 16-bit size field.
    #[error("Index too large: {file_count} entries exceed the 16-bit index size field")]
    IndexTooLarge {
        /// Number of records that were to be indexed.
        file_count: usize,
    },

    /// The configured replacement path cannot be stored in a record header.
    #[error("Invalid replacement path '{path}': {reason}")]
    InvalidPath {
        /// The rejected path.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// Two inputs of one batch would be written to the same output file.
    #[error(
        "Output '{}' is already claimed by '{}'",
        .output.display(),
        .first_input.display()
    )]
    OutputConflict {
        /// The contested output path.
        output: PathBuf,
        /// The earlier input that is written there.
        first_input: PathBuf,
    },

    /// A time value cannot be expressed as an MS-DOS date/time pair.
    #[error("Invalid timestamp: {reason}")]
    InvalidTimestamp {
        /// Why the value was rejected.
        reason: String,
    },
}

impl Error {
    /// Returns true if this error signals damaged archive data.
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::MalformedRecord { .. })
    }

    /// Returns true if the archive is valid but cannot be represented in the
    /// output format.
    pub fn is_capacity(&self) -> bool {
        matches!(
            self,
            Self::OffsetOverflow { .. } | Self::IndexTooLarge { .. }
        )
    }

    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            offset: offset as u64,
            reason: reason.into(),
        }
    }
}

/// A record-level anomaly that was recovered without aborting the file.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Warning {
    /// A record's path length prefix did not hold the expected value, so
    /// its path field was left untouched.
    PathFieldMismatch {
        /// Offset of the record in the output data region.
        offset: u64,
        /// Trimmed record name.
        name: String,
        /// The prefix byte found in the record.
        found: u8,
        /// The prefix byte that was expected.
        expected: u8,
    },

    /// The exclusion set did not match any record. Nothing was removed.
    NoMatchingExclusions,

    /// A record failed validation and was dropped under
    /// [`RecordPolicy::Skip`](crate::read::RecordPolicy::Skip).
    SkippedRecord {
        /// Offset of the dropped candidate in the input.
        offset: u64,
        /// Why the candidate was rejected.
        reason: String,
    },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathFieldMismatch {
                offset,
                name,
                found,
                expected,
            } => write!(
                f,
                "Path field of '{}' at {:#08x} has length prefix {:#04x}, expected {:#04x}; left unpatched",
                name, offset, found, expected
            ),
            Self::NoMatchingExclusions => write!(f, "No records matched the exclusion set"),
            Self::SkippedRecord { offset, reason } => {
                write!(f, "Skipped malformed record at {:#08x}: {}", offset, reason)
            }
        }
    }
}

/// A specialized Result type for CRS archive operations.
pub type Result<T> = std::result::Result<T, Error>;
