use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use futures::future::{try_join_all, BoxFuture, FutureExt};
use tracing::{debug, warn};

use crate::classify::{Classified, Classifier};
use crate::entry::{depth, normalize};
use crate::error::{Stage, WalkError};
use crate::results::{WalkReport, WalkStats};
use crate::traits::{Hook, WalkerFs};

/// Directory reads allowed per walk unless configured otherwise.
pub const DEFAULT_MAX_ITERATIONS: usize = 500;

// ---------------------------------------------------------------------------
// WalkConfig
// ---------------------------------------------------------------------------

/// What to do once the iteration budget is spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BudgetPolicy {
    /// Skip every further subtree and return what was collected.
    #[default]
    Truncate,

    /// Abandon the walk with [`WalkError::BudgetExceeded`].
    Fail,
}

/// Traversal parameters, fixed for the lifetime of one walk.
///
/// Callers normally go through [`WalkBuilder`](crate::WalkBuilder); this is
/// the value the builder accumulates and the one [`walk_with`](crate::walk_with)
/// takes directly.
#[derive(Clone)]
pub struct WalkConfig {
    /// Runs on every classified entry. `None` keeps everything unchanged.
    pub hook: Option<Arc<dyn Hook>>,

    /// Subtrees whose depth below the root reaches this are not read.
    /// `Some(0)` reads nothing; `Some(1)` reads only the root.
    pub max_depth: Option<usize>,

    /// Total directory reads across the whole walk. `None` is unbounded.
    pub max_iterations: Option<usize>,

    /// Collect directories instead of files.
    pub directory_mode: bool,

    pub on_budget_exhausted: BudgetPolicy,

    /// Keep recoverable errors in [`WalkReport::errors`].
    pub collect_errors: bool,
}

impl WalkConfig {
    /// Defaults everywhere except the hook.
    pub fn with_hook(hook: impl Hook + 'static) -> Self {
        Self {
            hook: Some(Arc::new(hook)),
            ..Self::default()
        }
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            hook:                None,
            max_depth:           None,
            max_iterations:      Some(DEFAULT_MAX_ITERATIONS),
            directory_mode:      false,
            on_budget_exhausted: BudgetPolicy::Truncate,
            collect_errors:      false,
        }
    }
}

impl fmt::Debug for WalkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkConfig")
            .field("hook", &self.hook.as_ref().map(|_| ".."))
            .field("max_depth", &self.max_depth)
            .field("max_iterations", &self.max_iterations)
            .field("directory_mode", &self.directory_mode)
            .field("on_budget_exhausted", &self.on_budget_exhausted)
            .field("collect_errors", &self.collect_errors)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Traversal state
// ---------------------------------------------------------------------------

/// Running counters, shared by every step of one walk.
#[derive(Default)]
pub(crate) struct Tally {
    pub files:        AtomicUsize,
    pub dirs:         AtomicUsize,
    pub depth_skips:  AtomicUsize,
    pub budget_skips: AtomicUsize,
    pub dropped:      AtomicUsize,
    pub transformed:  AtomicUsize,
}

impl Tally {
    pub fn bump(counter: &AtomicUsize) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Mutable state of one walk. Created when the root is accepted, dropped
/// when the root future completes.
pub(crate) struct TraversalState {
    original_depth: usize,
    /// Directory reads admitted so far. Shared by handle so every recursive
    /// step charges the same budget.
    iterations:     Arc<AtomicUsize>,
    pub tally:      Tally,
    errors:         Mutex<Vec<WalkError>>,
    collect_errors: bool,
}

impl TraversalState {
    fn new(root: &Path, collect_errors: bool) -> Self {
        Self {
            original_depth: depth(root),
            iterations:     Arc::new(AtomicUsize::new(0)),
            tally:          Tally::default(),
            errors:         Mutex::new(Vec::new()),
            collect_errors,
        }
    }

    fn depth_from_root(&self, dir: &Path) -> usize {
        depth(dir).saturating_sub(self.original_depth)
    }

    /// Charge one directory read against `limit`. Check and increment are a
    /// single CAS, so the counter never passes `limit`.
    fn try_charge(&self, limit: Option<usize>) -> bool {
        match limit {
            Some(limit) => self
                .iterations
                .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < limit).then_some(n + 1))
                .is_ok(),
            None => {
                self.iterations.fetch_add(1, Ordering::AcqRel);
                true
            }
        }
    }

    /// Keep a recoverable error for the report, if asked to.
    pub fn record(&self, err: WalkError) {
        if !self.collect_errors {
            return;
        }
        self.errors
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(err);
    }

    fn into_stats(self, started: Instant) -> (WalkStats, Vec<WalkError>) {
        let load = |c: &AtomicUsize| c.load(Ordering::Relaxed);
        let stats = WalkStats {
            files:        load(&self.tally.files),
            dirs:         load(&self.tally.dirs),
            iterations:   self.iterations.load(Ordering::Acquire),
            depth_skips:  load(&self.tally.depth_skips),
            budget_skips: load(&self.tally.budget_skips),
            dropped:      load(&self.tally.dropped),
            transformed:  load(&self.tally.transformed),
            duration:     started.elapsed(),
        };
        let errors = self.errors.into_inner().unwrap_or_else(PoisonError::into_inner);
        (stats, errors)
    }
}

// ---------------------------------------------------------------------------
// Traversal driver
// ---------------------------------------------------------------------------

/// Everything a recursive step needs, by reference. `Copy` so each step can
/// move its own handle into the future it returns.
#[derive(Clone, Copy)]
struct Traversal<'a> {
    fs:     &'a dyn WalkerFs,
    config: &'a WalkConfig,
    state:  &'a TraversalState,
}

impl<'a> Traversal<'a> {
    /// Apply the depth limit, then the iteration budget.
    /// `Ok(false)` means skip this subtree.
    fn admit(self, dir: &Path) -> Result<bool, WalkError> {
        if let Some(max) = self.config.max_depth {
            let current = self.state.depth_from_root(dir);
            if current >= max {
                warn!(path = %dir.display(), max_depth = max, "reached max depth");
                Tally::bump(&self.state.tally.depth_skips);
                return Ok(false);
            }
        }

        if !self.state.try_charge(self.config.max_iterations) {
            Tally::bump(&self.state.tally.budget_skips);
            let limit = self.config.max_iterations.unwrap_or_default();
            return match self.config.on_budget_exhausted {
                BudgetPolicy::Truncate => {
                    debug!(path = %dir.display(), limit, "iteration budget spent, skipping");
                    Ok(false)
                }
                BudgetPolicy::Fail => Err(WalkError::BudgetExceeded { limit }),
            };
        }

        Ok(true)
    }

    /// Expand `dir` into every collected path beneath it.
    ///
    /// Failures below the root are logged and yield nothing. Failures on the
    /// root, and a budget overrun under [`BudgetPolicy::Fail`], are errors.
    fn walk_dir(self, dir: PathBuf, is_root: bool) -> BoxFuture<'a, Result<Vec<PathBuf>, WalkError>> {
        self.step(dir, is_root).boxed()
    }

    async fn step(self, dir: PathBuf, is_root: bool) -> Result<Vec<PathBuf>, WalkError> {
        if !self.admit(&dir)? {
            return Ok(Vec::new());
        }

        let names = match self.fs.list_dir(&dir).await {
            Ok(names) => names,
            Err(e) => {
                let err = WalkError::from_io(Stage::ReadDir, &dir, e);
                if is_root {
                    return Err(err);
                }
                warn!(path = %dir.display(), error = %err, "skipping unreadable directory");
                self.state.record(err);
                return Ok(Vec::new());
            }
        };

        let classifier = Classifier::new(self.fs, self.config.hook.as_deref(), self.state);
        let entries = classifier
            .classify_all(names.iter().map(|name| dir.join(name)))
            .await;

        let (mut collected, subdirs) = self.partition(entries);

        let nested = try_join_all(subdirs.into_iter().map(|sub| self.walk_dir(sub, false))).await?;
        collected.extend(nested.into_iter().flatten());
        Ok(collected)
    }

    /// Split classified entries into paths collected at this level and
    /// directories to descend into.
    fn partition(self, entries: Vec<Classified>) -> (Vec<PathBuf>, Vec<PathBuf>) {
        let mut collected = Vec::new();
        let mut subdirs = Vec::new();

        for Classified { source, entry } in entries {
            if self.config.directory_mode {
                if entry.is_directory {
                    collected.push(entry.path);
                    subdirs.push(source);
                }
                continue;
            }

            if entry.is_directory {
                subdirs.push(source);
            } else if entry.is_file {
                collected.push(entry.path);
            }
        }

        (collected, subdirs)
    }
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Walk `root` on `fs` with `config`.
///
/// The root is normalized and stat'ed before any limit is consulted, so a
/// missing root is an error even with a zero budget.
pub(crate) async fn run(fs: &dyn WalkerFs, root: &Path, config: &WalkConfig) -> Result<WalkReport, WalkError> {
    let started = Instant::now();
    let root = normalize(root);

    let stat = fs
        .stat(&root)
        .await
        .map_err(|e| WalkError::from_io(Stage::Stat, &root, e))?;
    if !stat.is_directory {
        return Err(WalkError::NotADirectory(root));
    }

    debug!(root = %root.display(), ?config, "walk started");

    let state = TraversalState::new(&root, config.collect_errors);
    let traversal = Traversal { fs, config, state: &state };
    let paths = traversal.walk_dir(root.clone(), true).await?;

    let (stats, errors) = state.into_stats(started);
    debug!(
        root = %root.display(),
        collected = paths.len(),
        iterations = stats.iterations,
        "walk finished"
    );

    Ok(WalkReport { paths, stats, errors })
}
