pub mod api;
pub mod cli;
pub mod commands;
pub mod compare;
pub mod config;
pub mod fs;
pub mod model;
pub mod module;
pub mod output;
pub mod parser;
pub mod revision;
pub mod snapshot;
pub mod style;
pub mod version;

pub use api::{
    GoverError, compare, compare_snapshot, compare_with, interface, save, suggest, suggest_with,
};
pub use cli::Cli;
pub use commands::{cmd_diff, cmd_init, cmd_print, cmd_snapshot, cmd_suggest, cmd_tag};
pub use compare::{Comparison, Suggestion};
pub use config::Config;
pub use model::{Export, ModuleInterface, TypeIdentifier};
pub use revision::{GitProvider, ProviderError, RevisionProvider, RevisionSnapshot};
pub use snapshot::{ChangeLevel, ModuleDifference};
