//! Output assembly.
//!
//! The output archive is the synthesized header, then the index table, then
//! every surviving record copied verbatim in ascending order:
//!
//! ```text
//! +-----------------+----------------------+---------------------------+
//! | header (122)    | index (count × 17)   | record, record, ...       |
//! +-----------------+----------------------+---------------------------+
//! ```

mod index;

pub use index::{IndexPlan, build_index};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::Result;
use crate::format::header::ArchiveHeader;
use crate::read::Archive;

/// Concatenates the header, the index table and the record bytes.
///
/// `plan` must have been built from `archive.records()` so the offsets it
/// stores match the order the records are written in.
pub fn assemble(header: &ArchiveHeader, plan: &IndexPlan, archive: &Archive) -> Vec<u8> {
    let body: usize = archive.records().iter().map(|r| r.total_len()).sum();
    let mut out = Vec::with_capacity(plan.data_start + body);

    out.extend_from_slice(&header.encode());
    out.extend_from_slice(&plan.encode());
    debug_assert_eq!(out.len(), plan.data_start);

    for record in archive.records() {
        out.extend_from_slice(archive.record_bytes(record));
    }
    out
}

/// Writes a finished archive and stamps it with `mtime`.
///
/// The bytes go to a temporary file next to `path` that is renamed into
/// place once complete, so `path` is either left as it was or holds the
/// whole archive. Failing to set the modification time is logged and
/// otherwise ignored; the archive itself is still valid.
pub fn write_archive(
    path: impl AsRef<Path>,
    bytes: &[u8],
    mtime: Option<FileTime>,
) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = temp_path_for(path);
    let written = std::fs::write(&temp_path, bytes)
        .and_then(|()| std::fs::rename(&temp_path, path));
    if let Err(e) = written {
        // The temp file may not exist if creating it was what failed.
        let _ = std::fs::remove_file(&temp_path);
        return Err(e.into());
    }
    log::debug!("Wrote {} bytes to '{}'", bytes.len(), path.display());

    if let Some(mtime) = mtime {
        if let Err(e) = filetime::set_file_mtime(path, mtime) {
            log::warn!(
                "Failed to set modification time on '{}': {}",
                path.display(),
                e
            );
        }
    }
    Ok(())
}

/// Returns the sibling path an archive is staged at before the rename.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
