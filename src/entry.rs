use std::path::{Component, Path, PathBuf};

/// A classified filesystem path, as seen by a [`Hook`](crate::traits::Hook).
///
/// Built fresh by the classifier for every entry it stats. Hooks receive it by
/// value and hand back either the same entry or a rewritten one, so an entry
/// is never mutated after the hook has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEntry {
    /// The entry path: the walk root joined with the entry's name.
    pub path: PathBuf,

    /// Whether the path is a regular file.
    pub is_file: bool,

    /// Whether the path is a directory.
    pub is_directory: bool,
}

impl PathEntry {
    pub fn new(path: impl Into<PathBuf>, stat: FileStat) -> Self {
        Self {
            path:         path.into(),
            is_file:      stat.is_file,
            is_directory: stat.is_directory,
        }
    }

    /// Return the same entry with its path replaced.
    pub fn with_path(self, path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), ..self }
    }
}

/// What the filesystem reports about a single path.
///
/// Anything that is neither a file nor a directory (sockets, devices, broken
/// links) has both flags false and is never collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileStat {
    pub is_file:      bool,
    pub is_directory: bool,
}

impl FileStat {
    pub fn file() -> Self {
        Self { is_file: true, is_directory: false }
    }

    pub fn directory() -> Self {
        Self { is_file: false, is_directory: true }
    }
}

/// Outcome of running a [`Hook`](crate::traits::Hook) over one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookResult {
    /// Keep the entry as it was.
    Keep(PathEntry),

    /// Keep the entry, with a rewritten path.
    KeepTransformed(PathEntry),

    /// Drop the entry. A dropped directory is not descended into.
    Drop,
}

impl HookResult {
    /// The surviving entry, if any.
    pub fn into_entry(self) -> Option<PathEntry> {
        match self {
            Self::Keep(e) | Self::KeepTransformed(e) => Some(e),
            Self::Drop => None,
        }
    }

    pub fn is_transformed(&self) -> bool {
        matches!(self, Self::KeepTransformed(_))
    }
}

/// Lexically normalize a path: drop `.` segments, fold `..` into a preceding
/// normal segment, and strip trailing separators. Never touches the disk.
///
/// An empty result becomes `.`.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Number of components in `path`. Only meaningful as a difference between
/// two paths that share a normalized prefix.
pub fn depth(path: &Path) -> usize {
    path.components().count()
}
