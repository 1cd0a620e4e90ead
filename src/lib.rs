//! # crspatch
//!
//! A library for rewriting CRS course archives so that a stricter consumer
//! accepts them.
//!
//! A CRS archive is a sequence of records, each a fixed 122-byte header
//! followed by an opaque compressed payload. The patcher removes a
//! configurable set of records, points every surviving record at the
//! consumer's unpack directory, and prepends a synthesized archive header
//! with an index table giving the byte offset of each surviving record.
//! Payload bytes are never decoded or changed.
//!
//! ## Quick Start
//!
//! ### Patching a File
//!
//! ```rust,no_run
//! use crspatch::{Patcher, Result};
//!
//! fn main() -> Result<()> {
//!     let report = Patcher::default().patch_file("PEBBLE.CRS", "PEBBLE_patched.CRS")?;
//!
//!     for entry in &report.entries {
//!         println!("{:<12} {:#08x} -> {:#08x}",
//!             entry.name, entry.original_offset, entry.new_offset);
//!     }
//!     for warning in &report.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ### Patching in Memory
//!
//! ```rust,no_run
//! use crspatch::{DosDateTime, PatchOptions, Patcher, Result};
//!
//! fn main() -> Result<()> {
//!     let options = PatchOptions::new()
//!         .exclude("TREES.OFS")
//!         .replacement_path("C:\\LINKS\\TEMP\\")?;
//!
//!     let data = std::fs::read("PEBBLE.CRS")?;
//!     let stamp = DosDateTime::from_parts(1998, 7, 4, 9, 30, 0)?;
//!     let output = Patcher::new(options).patch_bytes(data, stamp)?;
//!     println!("{} bytes, {} records", output.bytes.len(), output.report.file_count);
//!     Ok(())
//! }
//! ```
//!
//! ### Inspecting an Archive
//!
//! ```rust,no_run
//! use crspatch::{Archive, Result};
//!
//! fn main() -> Result<()> {
//!     let archive = Archive::open_path("PEBBLE.CRS")?;
//!     let info = archive.info();
//!     println!("{} records, {} bytes packed", info.record_count, info.packed_size);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T>`]. A malformed record or an archive too
//! large for the index aborts the file; anomalies that only affect a single
//! record are reported as [`Warning`]s in the [`PatchReport`].
//!
//! ```rust,no_run
//! use crspatch::{Error, Patcher};
//!
//! match Patcher::default().patch_file("PEBBLE.CRS", "out.CRS") {
//!     Ok(report) => println!("removed {}", report.removed.len()),
//!     Err(e) if e.is_corruption() => eprintln!("damaged archive: {e}"),
//!     Err(Error::Io(e)) => eprintln!("I/O error: {e}"),
//!     Err(e) => eprintln!("{e}"),
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `parallel` | Yes | Batch patching on the Rayon thread pool |
//! | `cli` | No | Command-line interface tool |
//!
//! ## Minimum Supported Rust Version (MSRV)
//!
//! This crate requires **Rust 1.85** or later.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod batch;
pub mod edit;
pub mod error;
pub mod format;
pub mod patch;
pub mod read;
pub mod timestamp;
pub mod write;

pub use error::{Error, Result, Warning};
pub use timestamp::DosDateTime;

pub use read::{Archive, ArchiveInfo, RecordPolicy};

pub use edit::{Exclusions, PathPatch};

pub use patch::{IndexedRecord, PatchOptions, PatchOutput, PatchReport, Patcher};

pub use batch::{BatchResult, FileOutcome, patch_batch};
