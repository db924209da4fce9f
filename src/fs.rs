//! The local-disk [`WalkerFs`].

use std::ffi::OsString;
use std::io;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs;

use crate::entry::FileStat;
use crate::traits::WalkerFs;

/// [`WalkerFs`] over the local filesystem via `tokio::fs`.
///
/// `stat` follows symbolic links, so a link to a directory is walked like a
/// directory. Link cycles are only bounded by the iteration budget.
///
/// # Runtime
///
/// `tokio::fs` hands blocking calls to Tokio's blocking pool, so a walk on
/// `LocalFs` must be polled inside a Tokio runtime (any flavour). Polling it
/// from another executor panics. Supply a different [`WalkerFs`] through
/// [`WalkBuilder::fs`](crate::WalkBuilder::fs) to run elsewhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

#[async_trait]
impl WalkerFs for LocalFs {
    async fn list_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut reader = fs::read_dir(path).await?;
        let mut names = Vec::new();
        while let Some(entry) = reader.next_entry().await? {
            names.push(entry.file_name());
        }
        Ok(names)
    }

    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let meta = fs::metadata(path).await?;
        Ok(FileStat {
            is_file:      meta.is_file(),
            is_directory: meta.is_dir(),
        })
    }
}
