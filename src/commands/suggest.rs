use crate::cli::SuggestArgs;
use crate::compare::suggest_next_version;
use crate::fs::default_fs;
use crate::revision::GitProvider;
use crate::style;

use super::CommandContext;

pub fn cmd_suggest(args: SuggestArgs) -> i32 {
    let fs = default_fs();
    let ctx = match CommandContext::new(&args.path, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    match suggest_next_version(&ctx.path, &GitProvider::new(), fs) {
        Ok(suggestion) => {
            match &suggestion.latest {
                Some(latest) => tracing::info!("Latest version {}, {} changes", latest, suggestion.level),
                None => tracing::info!("No version tags yet"),
            }
            println!("{}", suggestion.version);
            0
        }
        Err(e) => {
            style::error(&e.to_string());
            1
        }
    }
}
