//! In-memory archive edits.
//!
//! Two edits are applied between reading and writing an archive:
//!
//! 1. [`remove_records`] drops records whose names are in an [`Exclusions`]
//!    set and compacts the buffer.
//! 2. [`patch_paths`] rewrites the destination path field stored in each
//!    surviving record header.
//!
//! # Example
//!
//! ```rust,no_run
//! use crspatch::read::Archive;
//! use crspatch::edit::{Exclusions, PathPatch, patch_paths, remove_records};
//!
//! let archive = Archive::open_path("COURSE.CRS")?;
//! let removal = remove_records(archive, &Exclusions::default());
//! println!("removed {} records", removal.removed.len());
//!
//! let mut archive = removal.archive;
//! let outcome = patch_paths(&mut archive, &PathPatch::default());
//! println!("patched {} path fields", outcome.patched);
//! # Ok::<(), crspatch::Error>(())
//! ```

mod path;
mod remove;

pub use path::{DEFAULT_REPLACEMENT_PATH, PathPatch, PathPatchOutcome, patch_paths};
pub use remove::{Exclusions, Removal, RemovedRecord, remove_records};
