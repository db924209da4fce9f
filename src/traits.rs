use std::ffi::OsString;
use std::io;
use std::path::Path;

use async_trait::async_trait;

use crate::entry::{FileStat, HookResult, PathEntry};

/// The filesystem capability the walker runs on.
///
/// Implement this to walk anything shaped like a directory tree: the local
/// disk ([`LocalFs`](crate::LocalFs)), an in-memory tree, a remote store.
///
/// # Object Safety
///
/// `WalkerFs` is object-safe. The builder stores it as `Arc<dyn WalkerFs>`.
///
/// # Thread Safety
///
/// `Send + Sync` are required so a walk is a `Send` future. The engine itself
/// spawns nothing and needs no particular runtime; whether a walk can run on
/// a given executor depends only on the implementation. [`LocalFs`](crate::LocalFs)
/// needs a Tokio runtime.
///
/// # Example
///
/// ```rust
/// use std::ffi::OsString;
/// use std::io;
/// use std::path::Path;
/// use fanwalk::{FileStat, WalkerFs};
///
/// /// A tree with one empty directory at every path.
/// struct Empty;
///
/// #[async_trait::async_trait]
/// impl WalkerFs for Empty {
///     async fn list_dir(&self, _path: &Path) -> io::Result<Vec<OsString>> {
///         Ok(Vec::new())
///     }
///
///     async fn stat(&self, _path: &Path) -> io::Result<FileStat> {
///         Ok(FileStat::directory())
///     }
/// }
/// ```
#[async_trait]
pub trait WalkerFs: Send + Sync {
    /// Raw entry names directly under `path` (not joined, no `.` or `..`).
    ///
    /// Names are joined back onto `path` before `stat`, so they must be
    /// returned exactly as the filesystem stores them.
    async fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>>;

    /// Classify `path` as file or directory.
    async fn stat(&self, path: &Path) -> io::Result<FileStat>;
}

/// The single extension point of the classifier.
///
/// A hook sees every classified entry, files and directories alike, and
/// decides whether it survives and under which path. Dropping a directory
/// prunes its whole subtree. Rewriting a directory's path changes what is
/// reported for it in directory mode, never where the walk descends.
///
/// Closures `Fn(PathEntry) -> HookResult` are hooks.
///
/// # Example
///
/// ```rust
/// use fanwalk::{Hook, HookResult, PathEntry};
///
/// struct SkipHidden;
///
/// impl Hook for SkipHidden {
///     fn apply(&self, entry: PathEntry) -> HookResult {
///         let hidden = entry
///             .path
///             .file_name()
///             .map(|n| n.to_string_lossy().starts_with('.'))
///             .unwrap_or(false);
///         if hidden { HookResult::Drop } else { HookResult::Keep(entry) }
///     }
/// }
/// ```
pub trait Hook: Send + Sync {
    fn apply(&self, entry: PathEntry) -> HookResult;
}

impl<F> Hook for F
where
    F: Fn(PathEntry) -> HookResult + Send + Sync,
{
    fn apply(&self, entry: PathEntry) -> HookResult {
        self(entry)
    }
}

/// Determines whether an entry passes a filter.
///
/// Closures `Fn(&Path) -> bool` are matchers and only see the path. Implement
/// the trait directly when the decision depends on the entry's type.
///
/// # Example
///
/// ```rust
/// use fanwalk::{Matcher, PathEntry};
///
/// struct LogFiles;
///
/// impl Matcher for LogFiles {
///     fn is_match(&self, entry: &PathEntry) -> bool {
///         entry.is_file && entry.path.extension().map(|e| e == "log").unwrap_or(false)
///     }
/// }
/// ```
pub trait Matcher: Send + Sync {
    /// Returns `true` if this entry should be kept.
    fn is_match(&self, entry: &PathEntry) -> bool;
}

impl<F> Matcher for F
where
    F: Fn(&Path) -> bool + Send + Sync,
{
    fn is_match(&self, entry: &PathEntry) -> bool {
        self(&entry.path)
    }
}
