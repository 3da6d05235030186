use super::{ProviderError, RevisionProvider, RevisionSnapshot};
use crate::version::sort_versions;
use std::ffi::OsStr;
use std::path::Path;
use std::process::Command;

/// Revision provider backed by the `git` CLI.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitProvider;

impl GitProvider {
    pub fn new() -> Self {
        Self
    }

    /// Create an annotated tag at `HEAD`.
    pub fn create_tag(&self, root: &Path, version: &str, message: &str) -> Result<(), ProviderError> {
        check_revision(version)?;
        git(root, ["tag", "-a", version, "-m", message])?;
        Ok(())
    }

    pub fn push_tag(&self, root: &Path, remote: &str, version: &str) -> Result<(), ProviderError> {
        check_revision(version)?;
        git(root, ["push", remote, version])?;
        Ok(())
    }

    /// The commands `create_tag` and `push_tag` would run, for dry runs.
    pub fn tag_commands(version: &str, message: &str, remote: Option<&str>) -> Vec<String> {
        let mut commands = vec![format!("git tag -a {} -m {}", version, shell_quote(message))];
        if let Some(remote) = remote {
            commands.push(format!("git push {} {}", remote, version));
        }
        commands
    }
}

impl RevisionProvider for GitProvider {
    fn list_revisions(&self, root: &Path) -> Result<Vec<String>, ProviderError> {
        let output = git(root, ["tag", "--list"])?;
        Ok(sort_versions(output.lines().map(str::trim).filter(|l| !l.is_empty())))
    }

    fn materialize(&self, root: &Path, revision: &str) -> Result<RevisionSnapshot, ProviderError> {
        check_revision(revision)?;
        let toplevel = git(root, ["rev-parse", "--show-toplevel"])?;
        let prefix = git(root, ["rev-parse", "--show-prefix"])?;

        let dir = tempfile::Builder::new()
            .prefix("gover-")
            .tempdir()
            .map_err(ProviderError::TempDir)?;

        tracing::debug!(
            "Cloning {} at {} into {}",
            toplevel.trim(),
            revision,
            dir.path().display()
        );
        run(Command::new("git")
            .args(["clone", "--quiet", "--shared", "--no-checkout", "--"])
            .arg(toplevel.trim())
            .arg(dir.path()))?;
        git(
            dir.path(),
            ["-c", "advice.detachedHead=false", "checkout", "--quiet", "--force", revision, "--"],
        )?;

        Ok(RevisionSnapshot::temporary(dir, Path::new(prefix.trim())))
    }
}

/// Refuse revisions git would read as options.
fn check_revision(revision: &str) -> Result<(), ProviderError> {
    if revision.is_empty() || revision.starts_with('-') {
        return Err(ProviderError::InvalidRevision(revision.to_string()));
    }
    Ok(())
}

fn git<I, S>(dir: &Path, args: I) -> Result<String, ProviderError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run(Command::new("git").arg("-C").arg(dir).args(args))
}

fn run(command: &mut Command) -> Result<String, ProviderError> {
    let output = command.output().map_err(ProviderError::Spawn)?;
    if !output.status.success() {
        let args: Vec<String> = command
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        return Err(ProviderError::Git {
            command: args.join(" "),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn shell_quote(text: &str) -> String {
    if !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=+".contains(c))
    {
        return text.to_string();
    }
    format!("'{}'", text.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_commands() {
        assert_eq!(
            GitProvider::tag_commands("v1.2.0", "version 1.2.0", None),
            vec!["git tag -a v1.2.0 -m 'version 1.2.0'"]
        );
        assert_eq!(
            GitProvider::tag_commands("v1.2.0", "release", Some("origin")),
            vec!["git tag -a v1.2.0 -m release", "git push origin v1.2.0"]
        );
    }

    #[test]
    fn test_shell_quote() {
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(shell_quote(""), "''");
    }

    #[test]
    fn test_option_like_revisions_are_rejected() {
        let err = GitProvider::new()
            .materialize(Path::new("."), "--upload-pack=evil")
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidRevision(_)));
    }
}
