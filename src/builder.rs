use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::engine::{run, BudgetPolicy, WalkConfig};
use crate::error::WalkError;
use crate::fs::LocalFs;
use crate::hooks::{Chain, FilterHook, MapHook};
use crate::results::WalkReport;
use crate::traits::{Hook, Matcher, WalkerFs};

// ---------------------------------------------------------------------------
// WalkBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and running a walk.
///
/// Created via [`fanwalk::walk()`](crate::walk). Configure with chained
/// builder methods, then await [`run()`](WalkBuilder::run) or
/// [`paths()`](WalkBuilder::paths).
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo() -> Result<(), fanwalk::WalkError> {
/// use fanwalk::ExtensionMatcher;
///
/// let sources = fanwalk::walk("src")
///     .filter(ExtensionMatcher::new("rs"))
///     .max_depth(4)
///     .paths()
///     .await?;
/// # Ok(()) }
/// ```
pub struct WalkBuilder {
    root:   PathBuf,
    fs:     Arc<dyn WalkerFs>,
    config: WalkConfig,
}

impl WalkBuilder {
    pub(crate) fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root:   root.into(),
            fs:     Arc::new(LocalFs),
            config: WalkConfig::default(),
        }
    }

    // ── Filesystem ────────────────────────────────────────────────────────

    /// Walk a custom [`WalkerFs`] instead of the local disk.
    ///
    /// The default, [`LocalFs`], must be polled inside a Tokio runtime. A
    /// runtime-agnostic filesystem lets the walk run on any executor.
    pub fn fs(mut self, fs: impl WalkerFs + 'static) -> Self {
        self.fs = Arc::new(fs);
        self
    }

    // ── Hooks ─────────────────────────────────────────────────────────────

    /// Add a hook. If one is already set, the new one runs on whatever the
    /// existing one keeps.
    pub fn hook(mut self, hook: impl Hook + 'static) -> Self {
        let hook: Arc<dyn Hook> = Arc::new(hook);
        self.config.hook = Some(match self.config.hook.take() {
            Some(existing) => Arc::new(Chain::new(existing, hook)),
            None => hook,
        });
        self
    }

    /// Keep only files the matcher accepts. Every directory is still walked.
    ///
    /// Equivalent to `.filter_with(matcher, false)`.
    pub fn filter(self, matcher: impl Matcher + 'static) -> Self {
        self.filter_with(matcher, false)
    }

    /// Keep only entries the matcher accepts. With `match_directories`,
    /// directories must match too, and a rejected directory is not walked.
    pub fn filter_with(self, matcher: impl Matcher + 'static, match_directories: bool) -> Self {
        self.hook(FilterHook::new(matcher, match_directories))
    }

    /// Rewrite every collected file path. Directories are walked by their
    /// original path.
    pub fn map<F>(self, transform: F) -> Self
    where
        F: Fn(&Path) -> PathBuf + Send + Sync + 'static,
    {
        self.hook(MapHook::new(transform))
    }

    // ── Limits ────────────────────────────────────────────────────────────

    /// Maximum depth below the root to read. `1` reads the root only and
    /// still reports its immediate children. Unlimited by default.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }

    /// Total directory reads allowed across the walk.
    /// Defaults to [`DEFAULT_MAX_ITERATIONS`](crate::DEFAULT_MAX_ITERATIONS).
    pub fn max_iterations(mut self, n: usize) -> Self {
        self.config.max_iterations = Some(n);
        self
    }

    /// Remove the iteration budget. Depth is the only remaining brake.
    pub fn unbounded(mut self) -> Self {
        self.config.max_iterations = None;
        self
    }

    /// What to do once the iteration budget is spent.
    pub fn budget_policy(mut self, policy: BudgetPolicy) -> Self {
        self.config.on_budget_exhausted = policy;
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Collect directories instead of files.
    pub fn directory_mode(mut self, yes: bool) -> Self {
        self.config.directory_mode = yes;
        self
    }

    /// Keep recoverable errors in [`WalkReport::errors`].
    ///
    /// Disabled by default; skipped entries are then only logged.
    pub fn collect_errors(mut self, yes: bool) -> Self {
        self.config.collect_errors = yes;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: WalkConfig) -> Self {
        self.config = config;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Run the walk and return the report.
    ///
    /// # Errors
    ///
    /// Fails if the root is missing, is not a directory, or cannot be listed,
    /// and under [`BudgetPolicy::Fail`] when the budget runs out. Failures
    /// below the root are logged and skipped.
    pub async fn run(self) -> Result<WalkReport, WalkError> {
        run(self.fs.as_ref(), &self.root, &self.config).await
    }

    /// Run the walk and return only the collected paths.
    pub async fn paths(self) -> Result<Vec<PathBuf>, WalkError> {
        Ok(self.run().await?.paths)
    }
}
