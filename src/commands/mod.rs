mod diff;
mod init;
mod print;
mod snapshot;
mod suggest;
mod tag;

pub use diff::{cmd_diff, cmd_diff_with};
pub use init::{cmd_init, cmd_init_with_fs};
pub use print::cmd_print;
pub use snapshot::cmd_snapshot;
pub use suggest::cmd_suggest;
pub use tag::cmd_tag;

use crate::cli::{ChangeFilter, OutputFormat};
use crate::config::Config;
use crate::fs::FileSystem;
use crate::model::ModuleInterface;
use crate::output::{JsonOutput, MarkdownOutput, OutputFormatter, TextOutput};
use crate::snapshot::ModuleDifference;
use crate::style;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Shared context for command execution, reducing boilerplate across commands.
pub struct CommandContext {
    pub path: PathBuf,
    pub config: Config,
}

impl CommandContext {
    /// Resolve the module path and load its config.
    /// Returns Err(exit_code) if setup fails.
    pub fn new(path: &Path, fs: &dyn FileSystem) -> Result<Self, i32> {
        let resolved_path = match path.canonicalize() {
            Ok(p) => p,
            Err(_) => {
                style::error(&format!("Could not resolve path: {}", style::path(path)));
                return Err(1);
            }
        };

        let config = Config::load(&resolved_path, fs).unwrap_or_else(|e| {
            style::warning(&format!("Failed to load config: {}. Using defaults.", e));
            Config::default()
        });

        Ok(Self {
            path: resolved_path,
            config,
        })
    }
}

/// What a command prints.
pub(crate) enum Report<'a> {
    Interface(&'a ModuleInterface),
    Diff {
        difference: &'a ModuleDifference,
        revision: &'a str,
    },
}

fn render_with<F: OutputFormatter>(formatter: &F, report: &Report, buffer: &mut Vec<u8>) -> io::Result<()> {
    match report {
        Report::Interface(interface) => formatter.format_interface(interface, buffer),
        Report::Diff {
            difference,
            revision,
        } => formatter.format_diff(difference, revision, buffer),
    }
}

/// Write a report to `output` (or stdout) in the requested format.
/// Markdown on a terminal is rendered; everything else is written as is.
pub(crate) fn write_report(
    report: &Report,
    format: OutputFormat,
    changes: ChangeFilter,
    output: Option<&Path>,
    fs: &dyn FileSystem,
) -> Result<(), i32> {
    let to_stdout = output.is_none();
    let mut buffer = Vec::new();
    let rendered = match format {
        OutputFormat::Text => render_with(
            &TextOutput::new(changes, to_stdout && style::is_terminal()),
            report,
            &mut buffer,
        ),
        OutputFormat::Markdown => render_with(&MarkdownOutput::new(changes), report, &mut buffer),
        OutputFormat::Json => render_with(&JsonOutput::new(changes), report, &mut buffer),
    };
    if let Err(e) = rendered {
        style::error(&format!("Failed to format output: {}", e));
        return Err(1);
    }

    let mut writer: Box<dyn Write> = match output {
        Some(output_path) => match fs.create_file(output_path) {
            Ok(writer) => writer,
            Err(e) => {
                style::error(&format!("Could not create output file: {}", e));
                return Err(1);
            }
        },
        None => Box::new(io::stdout()),
    };

    let written = if to_stdout && format == OutputFormat::Markdown {
        style::render_markdown(&String::from_utf8_lossy(&buffer), &mut writer)
    } else {
        writer.write_all(&buffer)
    };

    if let Err(e) = written.and_then(|_| writer.flush()) {
        style::error(&format!("Failed to write output: {}", e));
        return Err(1);
    }
    Ok(())
}
