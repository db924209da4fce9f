//! Entry classification: stat a path, build its [`PathEntry`], run the hook.

use std::path::PathBuf;

use futures::future::join_all;
use tracing::{trace, warn};

use crate::engine::{Tally, TraversalState};
use crate::entry::{HookResult, PathEntry};
use crate::error::{Stage, WalkError};
use crate::traits::{Hook, WalkerFs};

/// A classified entry that survived the hook.
///
/// `source` is the path as listed; the driver descends through it. `entry`
/// is what the hook returned; the driver collects `entry.path`.
pub(crate) struct Classified {
    pub source: PathBuf,
    pub entry:  PathEntry,
}

pub(crate) struct Classifier<'a> {
    fs:    &'a dyn WalkerFs,
    hook:  Option<&'a dyn Hook>,
    state: &'a TraversalState,
}

impl<'a> Classifier<'a> {
    pub fn new(fs: &'a dyn WalkerFs, hook: Option<&'a dyn Hook>, state: &'a TraversalState) -> Self {
        Self { fs, hook, state }
    }

    /// Classify every path concurrently and wait for all of them.
    /// Failed and dropped entries are absent from the result.
    pub async fn classify_all(&self, paths: impl IntoIterator<Item = PathBuf>) -> Vec<Classified> {
        let pending: Vec<_> = paths.into_iter().map(|path| self.classify(path)).collect();
        join_all(pending).await.into_iter().flatten().collect()
    }

    /// Stat `path` and apply the hook.
    ///
    /// A stat failure is logged and the entry treated as absent.
    pub async fn classify(&self, path: PathBuf) -> Option<Classified> {
        let stat = match self.fs.stat(&path).await {
            Ok(stat) => stat,
            Err(e) => {
                let err = WalkError::from_io(Stage::Stat, &path, e);
                warn!(path = %path.display(), error = %err, "skipping entry");
                self.state.record(err);
                return None;
            }
        };

        if stat.is_file {
            Tally::bump(&self.state.tally.files);
        } else if stat.is_directory {
            Tally::bump(&self.state.tally.dirs);
        }

        let entry = PathEntry::new(path.clone(), stat);
        let Some(hook) = self.hook else {
            return Some(Classified { source: path, entry });
        };

        let result = hook.apply(entry);
        if result.is_transformed() {
            Tally::bump(&self.state.tally.transformed);
        }
        match result.into_entry() {
            Some(entry) => Some(Classified { source: path, entry }),
            None => {
                trace!(path = %path.display(), "dropped by hook");
                Tally::bump(&self.state.tally.dropped);
                None
            }
        }
    }
}
