//! Patching many archives at once.
//!
//! Each file is read, patched and written on its own; a failure is recorded
//! against that file and never stops the others. With the `parallel`
//! feature files are processed on the rayon thread pool.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::patch::{PatchReport, Patcher};
use crate::{Error, Result};

/// Suffix appended to the input stem to name the output.
pub const OUTPUT_SUFFIX: &str = "_patched";

/// Derives the output path for `input`.
///
/// The output is named `<stem><suffix>.<ext>` and placed in `dir`, or next
/// to the input when `dir` is `None`.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use crspatch::batch::output_path;
///
/// let out = output_path(Path::new("courses/PEBBLE.CRS"), "_patched", None);
/// assert_eq!(out, Path::new("courses/PEBBLE_patched.CRS"));
///
/// let out = output_path(Path::new("courses/PEBBLE.CRS"), "_patched", Some(Path::new("out")));
/// assert_eq!(out, Path::new("out/PEBBLE_patched.CRS"));
/// ```
pub fn output_path(input: &Path, suffix: &str, dir: Option<&Path>) -> PathBuf {
    let mut name = OsString::from(input.file_stem().unwrap_or_default());
    name.push(suffix);
    if let Some(ext) = input.extension() {
        name.push(".");
        name.push(ext);
    }

    match dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// The outcome for one input file.
#[derive(Debug)]
pub struct FileOutcome {
    /// The input archive.
    pub input: PathBuf,
    /// Where the output was (or would have been) written.
    pub output: PathBuf,
    /// The report, or why the file was rejected.
    pub result: Result<PatchReport>,
}

impl FileOutcome {
    /// Returns true if the file was patched.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// The outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// One outcome per input.
    pub outcomes: Vec<FileOutcome>,
}

impl BatchResult {
    /// Iterates the files that were patched.
    pub fn succeeded(&self) -> impl Iterator<Item = (&FileOutcome, &PatchReport)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(|r| (o, r)))
    }

    /// Iterates the files that failed.
    pub fn failed(&self) -> impl Iterator<Item = (&FileOutcome, &Error)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }

    /// Returns the number of failed files.
    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }

    /// Returns true if every file was patched.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(FileOutcome::is_success)
    }
}

/// Patches every file in `inputs`.
///
/// Outputs are named by [`output_path`] with [`OUTPUT_SUFFIX`].
pub fn patch_batch(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    patcher: &Patcher,
) -> BatchResult {
    patch_batch_with(inputs, output_dir, patcher, |_| {})
}

/// One unit of work: an input, its output, and the earlier input that
/// already owns that output, if any.
struct Job<'a> {
    input: &'a PathBuf,
    output: PathBuf,
    claimed_by: Option<PathBuf>,
}

/// Assigns output paths in input order. The first input to map to a path
/// owns it; later ones are marked as conflicting.
fn plan_jobs<'a>(inputs: &'a [PathBuf], output_dir: Option<&Path>) -> Vec<Job<'a>> {
    let mut owners: HashMap<PathBuf, &'a PathBuf> = HashMap::with_capacity(inputs.len());
    inputs
        .iter()
        .map(|input| {
            let output = output_path(input, OUTPUT_SUFFIX, output_dir);
            let claimed_by = match owners.entry(output.clone()) {
                Entry::Occupied(owner) => Some(owner.get().to_path_buf()),
                Entry::Vacant(slot) => {
                    slot.insert(input);
                    None
                }
            };
            Job {
                input,
                output,
                claimed_by,
            }
        })
        .collect()
}

/// Like [`patch_batch`], calling `on_done` as each file finishes.
///
/// `on_done` may be called from several threads at once. An input whose
/// output path was already taken by an earlier input fails with
/// [`Error::OutputConflict`] and is not written.
pub fn patch_batch_with<F>(
    inputs: &[PathBuf],
    output_dir: Option<&Path>,
    patcher: &Patcher,
    on_done: F,
) -> BatchResult
where
    F: Fn(&FileOutcome) + Sync,
{
    let run = |job: Job<'_>| {
        let result = match job.claimed_by {
            Some(first_input) => Err(Error::OutputConflict {
                output: job.output.clone(),
                first_input,
            }),
            None => patcher.patch_file(job.input, &job.output),
        };
        if let Err(e) = &result {
            log::warn!("Failed to patch '{}': {}", job.input.display(), e);
        }
        let outcome = FileOutcome {
            input: job.input.clone(),
            output: job.output,
            result,
        };
        on_done(&outcome);
        outcome
    };

    let jobs = plan_jobs(inputs, output_dir);
    #[cfg(feature = "parallel")]
    let outcomes = jobs.into_par_iter().map(run).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes = jobs.into_iter().map(run).collect();

    BatchResult { outcomes }
}
