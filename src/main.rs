use clap::Parser;
use gover::cli::{Cli, Command};
use gover::{cmd_diff, cmd_init, cmd_print, cmd_snapshot, cmd_suggest, cmd_tag};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let exit_code = match cli.command {
        Command::Print(args) => cmd_print(args),
        Command::Diff(args) => cmd_diff(args),
        Command::Suggest(args) => cmd_suggest(args),
        Command::Tag(args) => cmd_tag(args),
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::Init(args) => cmd_init(args),
    };

    std::process::exit(exit_code);
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
