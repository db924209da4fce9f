//! Built-in hooks and matchers.
//!
//! [`FilterHook`] and [`MapHook`] are what [`filter`](crate::filter) and
//! [`map`](crate::map) hand to the engine. They are plain [`Hook`]s, so the
//! engine has no idea filtering or mapping exist.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ignore::overrides::{Override, OverrideBuilder};

use crate::entry::{HookResult, PathEntry};
use crate::traits::{Hook, Matcher};

// ---------------------------------------------------------------------------
// FilterHook
// ---------------------------------------------------------------------------

/// Keeps entries that satisfy a [`Matcher`].
///
/// Directories are kept unconditionally so the walk can still descend into
/// them, unless `match_directories` is set, in which case a directory that
/// fails the matcher is dropped along with everything below it.
pub struct FilterHook {
    matcher:           Arc<dyn Matcher>,
    match_directories: bool,
}

impl FilterHook {
    pub fn new(matcher: impl Matcher + 'static, match_directories: bool) -> Self {
        Self {
            matcher: Arc::new(matcher),
            match_directories,
        }
    }
}

impl Hook for FilterHook {
    fn apply(&self, entry: PathEntry) -> HookResult {
        let keep = (entry.is_directory && !self.match_directories) || self.matcher.is_match(&entry);
        if keep {
            HookResult::Keep(entry)
        } else {
            HookResult::Drop
        }
    }
}

impl fmt::Debug for FilterHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterHook")
            .field("match_directories", &self.match_directories)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// MapHook
// ---------------------------------------------------------------------------

/// Rewrites the path of every file entry. Directories pass through untouched.
pub struct MapHook {
    transform: Arc<dyn Fn(&Path) -> PathBuf + Send + Sync>,
}

impl MapHook {
    pub fn new<F>(transform: F) -> Self
    where
        F: Fn(&Path) -> PathBuf + Send + Sync + 'static,
    {
        Self { transform: Arc::new(transform) }
    }
}

impl Hook for MapHook {
    fn apply(&self, entry: PathEntry) -> HookResult {
        if entry.is_directory {
            return HookResult::Keep(entry);
        }
        let path = (self.transform)(&entry.path);
        HookResult::KeepTransformed(entry.with_path(path))
    }
}

impl fmt::Debug for MapHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapHook").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Runs `first`, then `second` on whatever `first` kept.
///
/// The result is `KeepTransformed` if either hook transformed the entry.
pub struct Chain {
    first:  Arc<dyn Hook>,
    second: Arc<dyn Hook>,
}

impl Chain {
    pub fn new(first: Arc<dyn Hook>, second: Arc<dyn Hook>) -> Self {
        Self { first, second }
    }
}

impl Hook for Chain {
    fn apply(&self, entry: PathEntry) -> HookResult {
        let (entry, transformed) = match self.first.apply(entry) {
            HookResult::Drop               => return HookResult::Drop,
            HookResult::Keep(e)            => (e, false),
            HookResult::KeepTransformed(e) => (e, true),
        };
        match self.second.apply(entry) {
            HookResult::Keep(e) if transformed => HookResult::KeepTransformed(e),
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// Matchers
// ---------------------------------------------------------------------------

/// Matches files by extension, case-insensitively. Never matches directories.
#[derive(Debug, Clone)]
pub struct ExtensionMatcher {
    extension: String,
}

impl ExtensionMatcher {
    /// `extension` may be given with or without the leading dot.
    pub fn new(extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            extension: extension.trim_start_matches('.').to_string(),
        }
    }
}

impl Matcher for ExtensionMatcher {
    fn is_match(&self, entry: &PathEntry) -> bool {
        entry.is_file
            && entry
                .path
                .extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(&self.extension))
                .unwrap_or(false)
    }
}

/// Matches entries against gitignore-style globs.
///
/// Globs without a `/` match the final path component anywhere in the tree
/// (`*.txt`), globs with one are anchored at `root` (`src/**/*.rs`). A glob
/// prefixed with `!` excludes what it matches.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    globs: Override,
}

impl GlobMatcher {
    pub fn new<I, S>(root: impl AsRef<Path>, globs: I) -> Result<Self, ignore::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = OverrideBuilder::new(root);
        for glob in globs {
            builder.add(glob.as_ref())?;
        }
        Ok(Self { globs: builder.build()? })
    }
}

impl Matcher for GlobMatcher {
    fn is_match(&self, entry: &PathEntry) -> bool {
        self.globs.matched(&entry.path, entry.is_directory).is_whitelist()
    }
}
