//! # fanwalk
//!
//! Bounded async directory walking: concurrent fan-out, one hook, flat results.
//!
//! fanwalk expands a directory into the flat list of every file (or, in
//! directory mode, every directory) beneath it. Each directory's entries are
//! classified concurrently and sibling subtrees are walked concurrently, all
//! inside a single future. Two limits bound the work: a maximum depth below
//! the root and a total budget of directory reads shared by the whole walk.
//!
//! It owns the traversal engine, the hook contract ([`Hook`], [`Matcher`]),
//! the filesystem contract ([`WalkerFs`]) and the error type. Filtering and
//! mapping are just hooks built on top.
//!
//! # Runtime
//!
//! The engine spawns nothing and is executor-agnostic, but the default
//! filesystem, [`LocalFs`], is built on `tokio::fs` and must be polled inside
//! a Tokio runtime. [`walk`], [`walk_with`], [`filter`] and [`map`] all use
//! it unless [`WalkBuilder::fs`] swaps it out.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//!
//! # async fn demo() -> Result<(), fanwalk::WalkError> {
//! // Every file under ./src, at most 500 directory reads.
//! let files = fanwalk::walk("src").paths().await?;
//!
//! // Only text files.
//! let texts = fanwalk::filter(
//!     "docs",
//!     |p: &Path| p.extension().map(|e| e == "txt").unwrap_or(false),
//!     false,
//! )
//! .await?;
//!
//! // Every path upper-cased.
//! let shouted = fanwalk::map("docs", |p: &Path| {
//!     PathBuf::from(p.to_string_lossy().to_uppercase())
//! })
//! .await?;
//!
//! // Top-level directories only.
//! let dirs = fanwalk::walk("node_modules")
//!     .max_depth(1)
//!     .directory_mode(true)
//!     .paths()
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! # Custom Filesystems and Hooks
//!
//! Implement [`WalkerFs`] to walk something other than the local disk, and
//! [`Hook`] to veto or rewrite entries as they are classified:
//!
//! ```rust,no_run
//! use fanwalk::{Hook, HookResult, PathEntry};
//!
//! struct NoTargetDirs;
//!
//! impl Hook for NoTargetDirs {
//!     fn apply(&self, entry: PathEntry) -> HookResult {
//!         if entry.is_directory && entry.path.ends_with("target") {
//!             HookResult::Drop
//!         } else {
//!             HookResult::Keep(entry)
//!         }
//!     }
//! }
//!
//! # async fn demo() -> Result<(), fanwalk::WalkError> {
//! let files = fanwalk::walk(".").hook(NoTargetDirs).unbounded().paths().await?;
//! # Ok(()) }
//! ```

#![forbid(unsafe_code)]

pub mod hooks;

mod builder;
mod classify;
mod engine;
mod entry;
mod error;
mod fs;
mod results;
mod traits;

use std::path::{Path, PathBuf};

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::WalkBuilder;
pub use engine::{BudgetPolicy, WalkConfig, DEFAULT_MAX_ITERATIONS};
pub use entry::{normalize, FileStat, HookResult, PathEntry};
pub use error::{Stage, WalkError};
pub use fs::LocalFs;
pub use hooks::{ExtensionMatcher, GlobMatcher};
pub use results::{WalkReport, WalkStats};
pub use traits::{Hook, Matcher, WalkerFs};

// ── Entry points ──────────────────────────────────────────────────────────────

/// Create a new [`WalkBuilder`] rooted at `root`, on the local filesystem.
///
/// The default [`LocalFs`] needs a Tokio runtime; see [`WalkBuilder::fs`].
pub fn walk(root: impl Into<PathBuf>) -> WalkBuilder {
    WalkBuilder::new(root)
}

/// Walk `root` on the local filesystem with an explicit configuration.
///
/// Use [`WalkConfig::with_hook`] to pass just a hook with default limits.
/// Runs on [`LocalFs`], so it must be awaited inside a Tokio runtime.
pub async fn walk_with(root: impl AsRef<Path>, config: WalkConfig) -> Result<Vec<PathBuf>, WalkError> {
    walk(root.as_ref()).config(config).paths().await
}

/// Every file under `root` the predicate accepts.
///
/// Directories are always walked unless `match_directories` is set, in which
/// case they must satisfy the predicate as well and a rejected directory's
/// subtree is skipped.
///
/// Runs on [`LocalFs`], so it must be awaited inside a Tokio runtime.
pub async fn filter(
    root: impl AsRef<Path>,
    predicate: impl Matcher + 'static,
    match_directories: bool,
) -> Result<Vec<PathBuf>, WalkError> {
    walk(root.as_ref())
        .filter_with(predicate, match_directories)
        .paths()
        .await
}

/// Every file under `root`, with its path passed through `transform`.
///
/// Runs on [`LocalFs`], so it must be awaited inside a Tokio runtime.
pub async fn map<F>(root: impl AsRef<Path>, transform: F) -> Result<Vec<PathBuf>, WalkError>
where
    F: Fn(&Path) -> PathBuf + Send + Sync + 'static,
{
    walk(root.as_ref()).map(transform).paths().await
}
