use std::path::PathBuf;
use std::time::Duration;

use crate::error::WalkError;

/// The output of a completed walk.
///
/// `errors` is opt-in: enable it with `.collect_errors(true)` on the builder.
#[derive(Debug)]
pub struct WalkReport {
    /// Collected paths: files in normal mode, directories in directory mode.
    /// Order is unspecified.
    pub paths: Vec<PathBuf>,

    /// Traversal counters.
    pub stats: WalkStats,

    /// Recoverable errors that dropped an entry or subtree.
    /// Only populated if `.collect_errors(true)` was set on the builder.
    pub errors: Vec<WalkError>,
}

/// Counters for a completed walk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkStats {
    /// Entries classified as regular files (before any hook ran).
    pub files: usize,

    /// Entries classified as directories (before any hook ran).
    pub dirs: usize,

    /// Directory reads admitted by the limits, the root included.
    pub iterations: usize,

    /// Subtrees skipped because they sat at or past `max_depth`.
    pub depth_skips: usize,

    /// Subtrees skipped because the iteration budget was spent.
    pub budget_skips: usize,

    /// Entries a hook dropped.
    pub dropped: usize,

    /// Entries a hook rewrote.
    pub transformed: usize,

    /// Wall-clock time from the root stat to the final merge.
    pub duration: Duration,
}
