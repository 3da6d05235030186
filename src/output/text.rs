use crate::cli::ChangeFilter;
use crate::model::ModuleInterface;
use crate::output::OutputFormatter;
use crate::snapshot::ModuleDifference;
use colored::Colorize;
use std::io::Write;

/// Line-oriented report: `<` marks the old side, `>` the new one.
pub struct TextOutput {
    pub changes: ChangeFilter,
    pub color: bool,
}

impl TextOutput {
    pub fn new(changes: ChangeFilter, color: bool) -> Self {
        Self { changes, color }
    }

    fn removed(&self, line: String) -> String {
        if self.color { line.red().to_string() } else { line }
    }

    fn added(&self, line: String) -> String {
        if self.color { line.green().to_string() } else { line }
    }

    fn heading(&self, line: String) -> String {
        if self.color { line.bold().to_string() } else { line }
    }
}

impl OutputFormatter for TextOutput {
    fn format_interface<W: Write>(
        &self,
        interface: &ModuleInterface,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writeln!(writer, "{}", self.heading(format!("module {}", interface.path)))?;
        for (path, package) in &interface.packages {
            writeln!(writer, "- package {}", path)?;
            for export in package.values() {
                writeln!(writer, "  - {}", export)?;
            }
        }
        Ok(())
    }

    fn format_diff<W: Write>(
        &self,
        difference: &ModuleDifference,
        _revision: &str,
        writer: &mut W,
    ) -> std::io::Result<()> {
        if !self.changes.shows_module(difference) {
            return Ok(());
        }

        writeln!(writer, "{}", self.heading(format!("module {}", difference.module_path)))?;
        if difference.module_path_changed() {
            writeln!(writer, "{}", self.removed(format!("< module {}", difference.old_module_path)))?;
        }
        for path in difference.package_removals.keys() {
            writeln!(writer, "{}", self.removed(format!("< package {}", path)))?;
        }
        if self.changes.shows_additions() {
            for path in difference.package_additions.keys() {
                writeln!(writer, "{}", self.added(format!("> package {}", path)))?;
            }
        }

        for (path, package) in &difference.package_changes {
            if !self.changes.shows_package(package) {
                continue;
            }
            writeln!(writer, "{}", self.heading(format!("--- package {}", path)))?;
            for export in package.removals.values() {
                writeln!(writer, "{}", self.removed(format!("<   {}", export)))?;
            }
            if self.changes.shows_additions() {
                for export in package.additions.values() {
                    writeln!(writer, "{}", self.added(format!(">   {}", export)))?;
                }
            }
            for change in package.changes.values() {
                writeln!(writer, "{}", self.removed(format!("<   {}", change.old)))?;
                writeln!(writer, "{}", self.added(format!(">   {}", change.new)))?;
            }
        }
        Ok(())
    }
}
