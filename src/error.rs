use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The filesystem operation that was running when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Classifying a path as file or directory.
    Stat,

    /// Listing a directory's entries.
    ReadDir,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stat    => f.write_str("stat"),
            Self::ReadDir => f.write_str("read_dir"),
        }
    }
}

#[derive(Error, Debug)]
pub enum WalkError {
    // Filesystem
    #[error("{stage}: path not found: {}", .path.display())]
    NotFound { stage: Stage, path: PathBuf },

    #[error("{stage}: permission denied: {}", .path.display())]
    PermissionDenied { stage: Stage, path: PathBuf },

    #[error("{stage} failed: {}", .path.display())]
    Io {
        stage: Stage,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    // Root
    /// The root stat succeeded but found something other than a directory.
    #[error("stat: not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    // Limits
    #[error("traversal budget exceeded after {limit} directory reads")]
    BudgetExceeded { limit: usize },
}

impl WalkError {
    /// Wrap an I/O failure from `stage` at `path`, lifting the common kinds
    /// into their own variants.
    pub fn from_io(stage: Stage, path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::NotFound         => Self::NotFound { stage, path },
            io::ErrorKind::PermissionDenied => Self::PermissionDenied { stage, path },
            _                               => Self::Io { stage, path, source: err },
        }
    }

    /// The path this error occurred at, if applicable.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::NotFound { path, .. }
            | Self::PermissionDenied { path, .. }
            | Self::Io { path, .. }
            | Self::NotADirectory(path) => Some(path),
            Self::BudgetExceeded { .. } => None,
        }
    }

    /// The stage that failed, for filesystem errors.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::NotFound { stage, .. }
            | Self::PermissionDenied { stage, .. }
            | Self::Io { stage, .. } => Some(*stage),
            Self::NotADirectory(_) => Some(Stage::Stat),
            Self::BudgetExceeded { .. } => None,
        }
    }

    /// Whether the walk can continue past this error.
    ///
    /// Recoverable errors below the root drop the affected entry or subtree
    /// and the walk keeps going. A budget overrun or a bad root ends the walk.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::PermissionDenied { .. } | Self::Io { .. }
        )
    }
}
