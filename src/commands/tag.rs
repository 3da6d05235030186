use crate::cli::TagArgs;
use crate::compare::suggest_next_version;
use crate::config::render_message;
use crate::fs::default_fs;
use crate::revision::GitProvider;
use crate::style;

use super::CommandContext;

pub fn cmd_tag(args: TagArgs) -> i32 {
    let fs = default_fs();
    let ctx = match CommandContext::new(&args.path, fs) {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };
    let git = GitProvider::new();

    let suggestion = match suggest_next_version(&ctx.path, &git, fs) {
        Ok(suggestion) => suggestion,
        Err(e) => {
            style::error(&e.to_string());
            return 1;
        }
    };
    let version = suggestion.version;

    let message = match &args.message {
        Some(template) => render_message(template, &version),
        None => ctx.config.tag.message_for(&version),
    };
    let remote = args.push.clone().or_else(|| ctx.config.tag.remote.clone());

    if args.dry_run {
        for command in GitProvider::tag_commands(&version, &message, remote.as_deref()) {
            style::status(&command);
        }
        return 0;
    }

    if let Err(e) = git.create_tag(&ctx.path, &version, &message) {
        style::error(&format!("Failed to create tag: {}", e));
        return 1;
    }
    match &suggestion.latest {
        Some(latest) => style::success(&format!(
            "Tagged {} ({} changes since {})",
            style::version(&version),
            style::level(suggestion.level),
            latest
        )),
        None => style::success(&format!("Tagged {}", style::version(&version))),
    }

    if let Some(remote) = remote {
        if let Err(e) = git.push_tag(&ctx.path, &remote, &version) {
            style::error(&format!("Failed to push tag: {}", e));
            style::hint(&format!("The tag exists locally; retry with `git push {} {}`", remote, version));
            return 1;
        }
        style::success(&format!("Pushed {} to {}", style::version(&version), remote));
    }
    0
}
