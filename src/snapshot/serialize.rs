use crate::fs::FileSystem;
use crate::model::ModuleInterface;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Format version of saved snapshot files.
pub const SNAPSHOT_VERSION: u32 = 2;

/// An interface snapshot as written to disk, for later use as a diff baseline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot version for forward compatibility
    pub version: u32,
    /// Seconds since the Unix epoch when the snapshot was taken
    pub created_at: String,
    pub interface: ModuleInterface,
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to access snapshot file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid snapshot file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported snapshot version {found} (expected {SNAPSHOT_VERSION})")]
    UnsupportedVersion { found: u32 },
}

impl Snapshot {
    pub fn new(interface: ModuleInterface) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            created_at: unix_now(),
            interface,
        }
    }
}

pub fn save_snapshot(snapshot: &Snapshot, path: &Path, fs: &dyn FileSystem) -> Result<(), SnapshotError> {
    let json = serde_json::to_string_pretty(snapshot)?;
    fs.write(path, &json)?;
    Ok(())
}

pub fn load_snapshot(path: &Path, fs: &dyn FileSystem) -> Result<Snapshot, SnapshotError> {
    let content = fs.read_to_string(path)?;
    let snapshot: Snapshot = serde_json::from_str(&content)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: snapshot.version,
        });
    }
    Ok(snapshot)
}

fn unix_now() -> String {
    use std::time::SystemTime;
    let duration = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    duration.as_secs().to_string()
}
