//! Colored status lines and highlighting for the CLI.
//!
//! Diagnostics go to stderr so that reports and suggested versions on stdout
//! stay pipeable.

use crate::snapshot::ChangeLevel;
use colored::{ColoredString, Colorize};
use std::fmt::Display;
use std::io::{self, IsTerminal, Write};
use std::path::Path;

fn to_stderr(prefix: ColoredString, msg: &str) {
    eprintln!("{} {}", prefix, msg);
}

pub fn error(msg: &str) {
    to_stderr("error:".red().bold(), msg);
}

pub fn warning(msg: &str) {
    to_stderr("warning:".yellow().bold(), msg);
}

pub fn hint(msg: &str) {
    to_stderr("hint:".dimmed(), &msg.dimmed().to_string());
}

/// A completed action, on stdout.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// A step about to run; dry runs list their git commands this way.
pub fn status(msg: &str) {
    println!("{} {}", "→".blue(), msg);
}

pub fn section(title: &str) {
    println!("\n{}", title.bold());
}

/// Indented `label: value` line for summaries.
pub fn metric(label: &str, value: impl Display) -> String {
    format!("  {}: {}", label.dimmed(), value.to_string().cyan())
}

pub fn path(p: &Path) -> String {
    p.display().to_string().bright_white().to_string()
}

pub fn version(v: &str) -> String {
    v.cyan().bold().to_string()
}

/// Change level colored by severity.
pub fn level(level: ChangeLevel) -> String {
    let text = level.to_string();
    match level {
        ChangeLevel::Breaking => text.red().bold().to_string(),
        ChangeLevel::Feature => text.yellow().to_string(),
        ChangeLevel::None => text.green().to_string(),
    }
}

pub fn is_terminal() -> bool {
    io::stdout().is_terminal()
}

/// Write Markdown, rendered with termimad when stdout is a terminal and verbatim otherwise.
pub fn render_markdown(markdown: &str, output: &mut dyn Write) -> io::Result<()> {
    if !is_terminal() {
        return output.write_all(markdown.as_bytes());
    }
    write!(output, "{}", markdown_skin().term_text(markdown))
}

fn markdown_skin() -> termimad::MadSkin {
    use crossterm::style::Color;
    use termimad::{MadSkin, StyledChar};

    let mut skin = MadSkin::default();
    skin.set_headers_fg(Color::Cyan);
    skin.bold.set_fg(Color::White);
    skin.bullet = StyledChar::from_fg_char(Color::Blue, '•');
    // Every signature is inline code.
    skin.inline_code.set_fg(Color::Yellow);
    skin.italic.set_fg(Color::DarkGrey);
    skin
}
