use crate::cli::ChangeFilter;
use crate::model::{Export, ModuleInterface};
use crate::output::OutputFormatter;
use crate::snapshot::{ModuleDifference, PackageDifference};
use std::io::Write;

pub struct MarkdownOutput {
    pub changes: ChangeFilter,
}

impl MarkdownOutput {
    pub fn new(changes: ChangeFilter) -> Self {
        Self { changes }
    }

    fn write_package<W: Write>(
        &self,
        path: &str,
        package: &PackageDifference,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writeln!(writer, "### Package `{}`\n", path)?;

        if !package.removals.is_empty() {
            writeln!(writer, "**Removed**\n")?;
            write_exports(package.removals.values(), writer)?;
        }
        if self.changes.shows_additions() && !package.additions.is_empty() {
            writeln!(writer, "**Added**\n")?;
            write_exports(package.additions.values(), writer)?;
        }
        if !package.changes.is_empty() {
            writeln!(writer, "**Changed**\n")?;
            for change in package.changes.values() {
                writeln!(writer, "- `{}`", change.old)?;
                writeln!(writer, "  → `{}`", change.new)?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }
}

impl OutputFormatter for MarkdownOutput {
    fn format_interface<W: Write>(
        &self,
        interface: &ModuleInterface,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writeln!(writer, "# Module `{}`\n", interface.path)?;
        writeln!(
            writer,
            "{} packages, {} exports\n",
            interface.packages.len(),
            interface.export_count()
        )?;

        for (path, package) in &interface.packages {
            writeln!(writer, "## Package `{}`\n", path)?;
            if package.is_empty() {
                writeln!(writer, "*No exported functions or types.*\n")?;
            } else {
                write_exports(package.values(), writer)?;
            }
        }
        Ok(())
    }

    fn format_diff<W: Write>(
        &self,
        difference: &ModuleDifference,
        revision: &str,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "# API Changes: `{}` since `{}`\n",
            difference.module_path, revision
        )?;

        if !self.changes.shows_module(difference) {
            writeln!(writer, "No changes.")?;
            return Ok(());
        }
        writeln!(writer, "**Change level:** {}\n", difference.level())?;

        if difference.module_path_changed() {
            writeln!(writer, "## Module Path\n")?;
            writeln!(
                writer,
                "Changed from `{}` to `{}`.\n",
                difference.old_module_path, difference.module_path
            )?;
        }

        if !difference.package_removals.is_empty() {
            writeln!(writer, "## Removed Packages\n")?;
            for path in difference.package_removals.keys() {
                writeln!(writer, "- `{}`", path)?;
            }
            writeln!(writer)?;
        }

        if self.changes.shows_additions() && !difference.package_additions.is_empty() {
            writeln!(writer, "## Added Packages\n")?;
            for path in difference.package_additions.keys() {
                writeln!(writer, "- `{}`", path)?;
            }
            writeln!(writer)?;
        }

        let changed: Vec<_> = difference
            .package_changes
            .iter()
            .filter(|(_, package)| self.changes.shows_package(package))
            .collect();
        if !changed.is_empty() {
            writeln!(writer, "## Changed Packages\n")?;
            for (path, package) in changed {
                self.write_package(path, package, writer)?;
            }
        }
        Ok(())
    }
}

fn write_exports<'a, W: Write>(
    exports: impl Iterator<Item = &'a Export>,
    writer: &mut W,
) -> std::io::Result<()> {
    for export in exports {
        writeln!(writer, "- `{}`", export)?;
    }
    writeln!(writer)
}
