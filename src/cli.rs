use crate::snapshot::ModuleDifference;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gover")]
#[command(about = "Track the exported API of a Go module and suggest the next semantic version")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log progress and diagnostics (debug level)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the exported interface of the module
    Print(PrintArgs),

    /// Show how the interface changed since a revision or a saved snapshot
    Diff(DiffArgs),

    /// Print the suggested next version
    Suggest(SuggestArgs),

    /// Create an annotated git tag with the suggested next version
    Tag(TagArgs),

    /// Save the current interface as a JSON snapshot
    Snapshot(SnapshotArgs),

    /// Generate a starter .gover.toml configuration file
    Init(InitArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct PrintArgs {
    /// Module root (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct DiffArgs {
    /// Module root (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Commit or tag to compare against [config: diff.compare, default: HEAD]
    #[arg(short, long, conflicts_with = "baseline")]
    pub compare: Option<String>,

    /// Compare against a snapshot saved with `gover snapshot`
    #[arg(short, long)]
    pub baseline: Option<PathBuf>,

    /// Which changes to report [config: diff.changes, default: any]
    #[arg(long)]
    pub changes: Option<ChangeFilter>,

    /// Exit with status 1 when changes of this level exist [config: diff.error, default: none]
    #[arg(long)]
    pub error: Option<ErrorCondition>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct SuggestArgs {
    /// Module root (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct TagArgs {
    /// Module root (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Push the new tag to this remote [config: tag.remote]
    #[arg(long)]
    pub push: Option<String>,

    /// Print the git commands instead of running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Tag message; `{version}` and `{tag}` are substituted [config: tag.message]
    #[arg(short, long)]
    pub message: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct SnapshotArgs {
    /// Module root (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// File to write the snapshot to
    #[arg(long)]
    pub save: PathBuf,
}

#[derive(Parser, Debug, Clone)]
pub struct InitArgs {
    /// Module root to create config in (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChangeFilter {
    /// Additions, removals and changes
    #[default]
    Any,
    /// Removals and changes only
    Breaking,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCondition {
    /// Never fail because of changes
    #[default]
    None,
    /// Fail on breaking changes
    Breaking,
    /// Fail on any change
    Any,
}

impl ErrorCondition {
    pub fn is_met(self, difference: &ModuleDifference) -> bool {
        match self {
            ErrorCondition::None => false,
            ErrorCondition::Breaking => difference.breaking(),
            ErrorCondition::Any => difference.any(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_diff_args() {
        let cli = Cli::parse_from([
            "gover", "diff", "mod", "--compare", "v1.0.0", "--changes", "breaking", "--error",
            "any", "-f", "json",
        ]);
        let Command::Diff(args) = cli.command else {
            panic!("expected diff");
        };
        assert_eq!(args.path, PathBuf::from("mod"));
        assert_eq!(args.compare.as_deref(), Some("v1.0.0"));
        assert_eq!(args.changes, Some(ChangeFilter::Breaking));
        assert_eq!(args.error, Some(ErrorCondition::Any));
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn test_compare_and_baseline_conflict() {
        let result = Cli::try_parse_from([
            "gover", "diff", "--compare", "HEAD", "--baseline", "api.json",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_flags_and_tag_args() {
        let cli = Cli::parse_from(["gover", "tag", "-n", "-m", "release {tag}", "-v"]);
        assert!(cli.verbose);
        let Command::Tag(args) = cli.command else {
            panic!("expected tag");
        };
        assert!(args.dry_run);
        assert_eq!(args.message.as_deref(), Some("release {tag}"));
        assert_eq!(args.path, PathBuf::from("."));
    }

    #[test]
    fn test_error_condition() {
        let difference = ModuleDifference {
            module_path: "example.com/m/v2".to_string(),
            old_module_path: "example.com/m".to_string(),
            ..ModuleDifference::default()
        };
        assert!(!ErrorCondition::None.is_met(&difference));
        assert!(ErrorCondition::Breaking.is_met(&difference));
        assert!(!ErrorCondition::Any.is_met(&ModuleDifference::default()));
    }
}
