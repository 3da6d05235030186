use crate::cli::DiffArgs;
use crate::compare::{compare_baseline, compare_revision};
use crate::fs::{FileSystem, default_fs};
use crate::revision::{GitProvider, RevisionProvider};
use crate::snapshot::load_snapshot;
use crate::style;

use super::{CommandContext, Report, write_report};

pub fn cmd_diff(args: DiffArgs) -> i32 {
    cmd_diff_with(args, &GitProvider::new(), default_fs())
}

pub fn cmd_diff_with(args: DiffArgs, provider: &dyn RevisionProvider, fs: &dyn FileSystem) -> i32 {
    let ctx = match CommandContext::new(&args.path, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    let changes = args.changes.unwrap_or(ctx.config.diff.changes);
    let error = args.error.unwrap_or(ctx.config.diff.error);

    let comparison = match &args.baseline {
        Some(baseline_path) => {
            let baseline = match load_snapshot(baseline_path, fs) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    style::error(&format!("Failed to load baseline snapshot: {}", e));
                    return 1;
                }
            };
            let label = baseline_path.display().to_string();
            compare_baseline(&ctx.path, baseline.interface, &label, fs)
        }
        None => {
            let revision = args.compare.as_deref().unwrap_or(&ctx.config.diff.compare);
            compare_revision(&ctx.path, revision, provider, fs)
        }
    };

    let comparison = match comparison {
        Ok(comparison) => comparison,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };

    let report = Report::Diff {
        difference: &comparison.difference,
        revision: &comparison.revision,
    };
    if let Err(code) = write_report(&report, args.format, changes, args.output.as_deref(), fs) {
        return code;
    }

    if error.is_met(&comparison.difference) { 1 } else { 0 }
}
