use crate::cli::SnapshotArgs;
use crate::fs::default_fs;
use crate::module::parse_module;
use crate::snapshot::{Snapshot, save_snapshot};
use crate::style;

use super::CommandContext;

pub fn cmd_snapshot(args: SnapshotArgs) -> i32 {
    let fs = default_fs();
    let ctx = match CommandContext::new(&args.path, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let interface = match parse_module(&ctx.path, fs) {
        Ok(interface) => interface,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };
    let snapshot = Snapshot::new(interface);

    if let Err(e) = save_snapshot(&snapshot, &args.save, fs) {
        style::error(&format!("Failed to save snapshot: {}", e));
        return 1;
    }

    style::success(&format!("Snapshot saved to: {}", style::path(&args.save)));
    style::section("Summary");
    println!("{}", style::metric("Module", &snapshot.interface.path));
    println!("{}", style::metric("Packages", snapshot.interface.packages.len()));
    println!("{}", style::metric("Exports", snapshot.interface.export_count()));
    0
}
