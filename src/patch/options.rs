//! Pipeline configuration.

use crate::Result;
use crate::edit::{Exclusions, PathPatch};
use crate::read::RecordPolicy;

/// Seconds added to a file's modification time before it is stamped into
/// the archive header: four and a half hours.
pub const DEFAULT_CLOCK_OFFSET: i64 = 4 * 3600 + 30 * 60;

/// Options controlling how an archive is patched.
///
/// # Example
///
/// ```rust
/// use crspatch::PatchOptions;
///
/// let options = PatchOptions::new()
///     .exclude("TREES.OFS")
///     .replacement_path("C:\\COURSES\\")?
///     .clock_offset(0);
/// assert_eq!(options.exclusions.len(), 3);
/// # Ok::<(), crspatch::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOptions {
    /// Record names to remove.
    pub exclusions: Exclusions,
    /// Replacement written into each record's path field.
    pub path: PathPatch,
    /// Whether path fields are rewritten at all.
    pub patch_paths: bool,
    /// How malformed records are handled.
    pub record_policy: RecordPolicy,
    /// Seconds added to the source modification time.
    pub clock_offset: i64,
}

impl Default for PatchOptions {
    fn default() -> Self {
        Self {
            exclusions: Exclusions::default(),
            path: PathPatch::default(),
            patch_paths: true,
            record_policy: RecordPolicy::Abort,
            clock_offset: DEFAULT_CLOCK_OFFSET,
        }
    }
}

impl PatchOptions {
    /// Creates the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the exclusion set.
    pub fn exclusions(mut self, exclusions: Exclusions) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Adds one name to the exclusion set.
    pub fn exclude(mut self, name: impl AsRef<[u8]>) -> Self {
        self.exclusions.insert(name);
        self
    }

    /// Sets the directory written into every record's path field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`](crate::Error::InvalidPath) if the path
    /// does not fit the 14-byte field or is not printable ASCII.
    pub fn replacement_path(mut self, path: &str) -> Result<Self> {
        self.path = PathPatch::new(path)?.expected_len(self.path.expected());
        Ok(self)
    }

    /// Sets the path length prefix a record must carry to be patched.
    pub fn expected_path_len(mut self, len: u8) -> Self {
        self.path = self.path.expected_len(len);
        self
    }

    /// Enables or disables path patching.
    pub fn patch_paths(mut self, enabled: bool) -> Self {
        self.patch_paths = enabled;
        self
    }

    /// Sets how malformed records are handled.
    pub fn record_policy(mut self, policy: RecordPolicy) -> Self {
        self.record_policy = policy;
        self
    }

    /// Sets the clock offset in seconds.
    pub fn clock_offset(mut self, secs: i64) -> Self {
        self.clock_offset = secs;
        self
    }
}
