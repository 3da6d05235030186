//! Library API for gover.
//!
//! These functions do what the CLI commands do, but return `Result`s instead
//! of printing and picking exit codes.
//!
//! # Example
//!
//! ```no_run
//! use gover::compare;
//! use std::path::Path;
//!
//! let comparison = compare(Path::new("."), "v1.2.0")?;
//! if comparison.difference.breaking() {
//!     println!("breaking changes since {}", comparison.revision);
//! }
//! # Ok::<(), gover::GoverError>(())
//! ```

use crate::compare::{self as orchestrator, CompareError, Comparison, Suggestion};
use crate::fs::default_fs;
use crate::model::ModuleInterface;
use crate::module::{InterfaceError, parse_module};
use crate::revision::{GitProvider, RevisionProvider};
use crate::snapshot::{Snapshot, SnapshotError, load_snapshot, save_snapshot};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during gover operations.
#[derive(Debug, Error)]
pub enum GoverError {
    /// The specified path could not be found or resolved.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error(transparent)]
    Interface(#[from] InterfaceError),

    #[error(transparent)]
    Compare(#[from] CompareError),

    /// Reading or writing a snapshot file failed.
    #[error("Snapshot {}: {source}", path.display())]
    Snapshot {
        path: PathBuf,
        #[source]
        source: SnapshotError,
    },
}

fn resolve(path: &Path) -> Result<PathBuf, GoverError> {
    path.canonicalize()
        .map_err(|_| GoverError::PathNotFound(path.to_path_buf()))
}

/// Extract the exported interface of the module rooted at `path`.
///
/// # Example
///
/// ```no_run
/// use gover::interface;
/// use std::path::Path;
///
/// let module = interface(Path::new("."))?;
/// println!("{}: {} packages", module.path, module.packages.len());
/// # Ok::<(), gover::GoverError>(())
/// ```
pub fn interface(path: &Path) -> Result<ModuleInterface, GoverError> {
    let root = resolve(path)?;
    Ok(parse_module(&root, default_fs())?)
}

/// Compare the working tree at `path` with a git revision.
pub fn compare(path: &Path, revision: &str) -> Result<Comparison, GoverError> {
    compare_with(path, revision, &GitProvider::new())
}

/// Like `compare`, with revisions coming from `provider`.
pub fn compare_with(
    path: &Path,
    revision: &str,
    provider: &dyn RevisionProvider,
) -> Result<Comparison, GoverError> {
    let root = resolve(path)?;
    Ok(orchestrator::compare_revision(
        &root,
        revision,
        provider,
        default_fs(),
    )?)
}

/// Compare the working tree at `path` with a snapshot saved by `save`.
pub fn compare_snapshot(path: &Path, snapshot_file: &Path) -> Result<Comparison, GoverError> {
    let root = resolve(path)?;
    let baseline = load_snapshot(snapshot_file, default_fs()).map_err(|source| {
        GoverError::Snapshot {
            path: snapshot_file.to_path_buf(),
            source,
        }
    })?;
    let label = snapshot_file.display().to_string();
    Ok(orchestrator::compare_baseline(
        &root,
        baseline.interface,
        &label,
        default_fs(),
    )?)
}

/// Suggest the next version of the module at `path` from its git tags.
///
/// # Example
///
/// ```no_run
/// use gover::suggest;
/// use std::path::Path;
///
/// let suggestion = suggest(Path::new("."))?;
/// println!("next version: {}", suggestion.version);
/// # Ok::<(), gover::GoverError>(())
/// ```
pub fn suggest(path: &Path) -> Result<Suggestion, GoverError> {
    suggest_with(path, &GitProvider::new())
}

pub fn suggest_with(path: &Path, provider: &dyn RevisionProvider) -> Result<Suggestion, GoverError> {
    let root = resolve(path)?;
    Ok(orchestrator::suggest_next_version(
        &root,
        provider,
        default_fs(),
    )?)
}

/// Save the current interface of the module at `path` to `snapshot_file`.
pub fn save(path: &Path, snapshot_file: &Path) -> Result<Snapshot, GoverError> {
    let snapshot = Snapshot::new(interface(path)?);
    save_snapshot(&snapshot, snapshot_file, default_fs()).map_err(|source| {
        GoverError::Snapshot {
            path: snapshot_file.to_path_buf(),
            source,
        }
    })?;
    Ok(snapshot)
}
