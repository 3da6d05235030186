mod diff;
mod serialize;

pub use diff::{
    ChangeLevel, ExportDifference, ModuleDifference, PackageDifference, diff, diff_package,
};
pub use serialize::{SNAPSHOT_VERSION, Snapshot, SnapshotError, load_snapshot, save_snapshot};
