//! Access to historical revisions of a module.

mod git;

pub use git::GitProvider;

use crate::fs::join_relative;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Failed to run git: {0}")]
    Spawn(#[source] io::Error),
    #[error("`git {command}` failed: {stderr}")]
    Git { command: String, stderr: String },
    #[error("Invalid revision `{0}`")]
    InvalidRevision(String),
    #[error("Failed to create temporary directory: {0}")]
    TempDir(#[source] io::Error),
    #[error("Failed to remove temporary directory {}: {source}", path.display())]
    Release {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where historical versions of a module come from.
pub trait RevisionProvider: Send + Sync {
    /// Version tags of the module, oldest first. Tags that aren't versions are left out.
    fn list_revisions(&self, root: &Path) -> Result<Vec<String>, ProviderError>;

    /// Check out `revision` somewhere on disk. The returned snapshot's root
    /// corresponds to `root` at that revision.
    fn materialize(&self, root: &Path, revision: &str) -> Result<RevisionSnapshot, ProviderError>;
}

/// A module tree at some revision, usually in a temporary directory.
///
/// The directory is removed by `release`, or on drop if `release` was never reached.
#[derive(Debug)]
pub struct RevisionSnapshot {
    root: PathBuf,
    dir: Option<TempDir>,
}

impl RevisionSnapshot {
    /// A snapshot owning `dir`; the module root sits at `relative` inside it.
    pub fn temporary(dir: TempDir, relative: &Path) -> Self {
        Self {
            root: join_relative(dir.path(), relative),
            dir: Some(dir),
        }
    }

    /// A snapshot of an existing tree that is not ours to delete.
    pub fn existing(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            dir: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn release(mut self) -> Result<(), ProviderError> {
        match self.dir.take() {
            Some(dir) => {
                let path = dir.path().to_path_buf();
                dir.close()
                    .map_err(|source| ProviderError::Release { path, source })
            }
            None => Ok(()),
        }
    }
}

impl Drop for RevisionSnapshot {
    fn drop(&mut self) {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            if let Err(e) = dir.close() {
                tracing::warn!("Failed to remove {}: {}", path.display(), e);
            }
        }
    }
}
