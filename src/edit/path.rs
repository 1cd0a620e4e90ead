//! Destination path patching.
//!
//! Every record header stores the directory the file is unpacked to as a
//! length prefix at `0x36` followed by a fixed 14-byte field. The target
//! platform expects its own directory there.

use crate::error::Warning;
use crate::format::{PADDING, PATH_CAPACITY, record_field};
use crate::read::Archive;
use crate::{Error, Result};

/// The directory the target platform unpacks course files into.
pub const DEFAULT_REPLACEMENT_PATH: &str = "C:\\LINKS\\TEMP\\";

/// A validated replacement for the record path field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPatch {
    path: [u8; PATH_CAPACITY],
    len: u8,
    expected_len: u8,
}

impl Default for PathPatch {
    fn default() -> Self {
        let mut path = [PADDING; PATH_CAPACITY];
        path.copy_from_slice(DEFAULT_REPLACEMENT_PATH.as_bytes());
        Self {
            path,
            len: PATH_CAPACITY as u8,
            expected_len: PATH_CAPACITY as u8,
        }
    }
}

impl PathPatch {
    /// Creates a patch writing `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path is empty, longer than the
    /// 14-byte field, or contains anything other than printable ASCII.
    pub fn new(path: &str) -> Result<Self> {
        let bytes = path.as_bytes();
        let reason = if bytes.is_empty() {
            Some("path is empty".to_string())
        } else if bytes.len() > PATH_CAPACITY {
            Some(format!(
                "{} bytes exceed the {PATH_CAPACITY}-byte path field",
                bytes.len()
            ))
        } else if !bytes.iter().all(|&b| (0x20..=0x7E).contains(&b)) {
            Some("path must be printable ASCII".to_string())
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(Error::InvalidPath {
                path: path.to_string(),
                reason,
            });
        }

        let mut field = [PADDING; PATH_CAPACITY];
        field[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            path: field,
            len: bytes.len() as u8,
            ..Self::default()
        })
    }

    /// Sets the length prefix a record must carry to be patched.
    ///
    /// Records with any other prefix are left alone and reported.
    pub fn expected_len(mut self, len: u8) -> Self {
        self.expected_len = len;
        self
    }

    /// Returns the replacement path without padding.
    pub fn path(&self) -> &[u8] {
        &self.path[..usize::from(self.len)]
    }

    /// Returns the padded 14-byte field value.
    pub fn field(&self) -> &[u8; PATH_CAPACITY] {
        &self.path
    }

    /// Returns the expected length prefix.
    pub fn expected(&self) -> u8 {
        self.expected_len
    }
}

/// The result of [`patch_paths`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathPatchOutcome {
    /// Number of records whose path field was rewritten.
    pub patched: usize,
    /// Records that were skipped.
    pub warnings: Vec<Warning>,
}

/// Rewrites the path field of every record in `archive`.
///
/// A record whose current length prefix differs from
/// [`PathPatch::expected`] is skipped with a
/// [`Warning::PathFieldMismatch`]; the remaining records are still patched.
pub fn patch_paths(archive: &mut Archive, patch: &PathPatch) -> PathPatchOutcome {
    let mut outcome = PathPatchOutcome::default();

    for record in &mut archive.records {
        let len_pos = record.offset + record_field::PATH_LEN;
        let found = archive.data[len_pos];
        if found != patch.expected_len {
            let warning = Warning::PathFieldMismatch {
                offset: record.offset as u64,
                name: record.display_name(),
                found,
                expected: patch.expected_len,
            };
            log::warn!("{warning}");
            outcome.warnings.push(warning);
            continue;
        }

        let path_pos = record.offset + record_field::PATH;
        archive.data[len_pos] = patch.len;
        archive.data[path_pos..path_pos + PATH_CAPACITY].copy_from_slice(&patch.path);
        record.set_path(patch.len, patch.path);
        outcome.patched += 1;
    }

    log::debug!(
        "Patched {} path fields, skipped {}",
        outcome.patched,
        outcome.warnings.len()
    );
    outcome
}
