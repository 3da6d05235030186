//! Comparing the working tree against an earlier revision or a saved baseline.

use crate::fs::FileSystem;
use crate::model::ModuleInterface;
use crate::module::{InterfaceError, parse_module};
use crate::revision::{ProviderError, RevisionProvider};
use crate::snapshot::{ChangeLevel, ModuleDifference, diff};
use crate::version::{INITIAL_VERSION, VersionError, suggest_version};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("Failed to read the working tree: {0}")]
    Current(#[source] InterfaceError),
    #[error("Failed to check out {revision}: {source}")]
    Materialize {
        revision: String,
        #[source]
        source: ProviderError,
    },
    #[error("Failed to read the module at {revision}: {source}")]
    Comparison {
        revision: String,
        #[source]
        source: InterfaceError,
    },
    #[error("Failed to list revisions: {0}")]
    Revisions(#[source] ProviderError),
    #[error(transparent)]
    Version(#[from] VersionError),
}

/// Both snapshots of a comparison and what changed between them.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// What the working tree was compared against: a revision or a baseline file.
    pub revision: String,
    pub previous: ModuleInterface,
    pub current: ModuleInterface,
    pub difference: ModuleDifference,
}

/// Outcome of `suggest_next_version`.
#[derive(Debug, Clone)]
pub struct Suggestion {
    /// Latest version tag, if the module has one.
    pub latest: Option<String>,
    pub level: ChangeLevel,
    pub version: String,
}

/// Compare the working tree at `root` with the module at `revision`.
///
/// Both sides are parsed concurrently. The checked-out revision is removed
/// before this returns, whether or not it parsed.
pub fn compare_revision(
    root: &Path,
    revision: &str,
    provider: &dyn RevisionProvider,
    fs: &dyn FileSystem,
) -> Result<Comparison, CompareError> {
    tracing::debug!("Comparing {} against {}", root.display(), revision);
    let (current, previous) = rayon::join(
        || parse_module(root, fs).map_err(CompareError::Current),
        || parse_revision(root, revision, provider, fs),
    );
    // The working tree's error wins when both sides fail.
    let current = current?;
    let previous = previous?;

    let difference = diff(&previous, &current);
    Ok(Comparison {
        revision: revision.to_string(),
        previous,
        current,
        difference,
    })
}

/// Compare the working tree with a previously saved interface.
pub fn compare_baseline(
    root: &Path,
    baseline: ModuleInterface,
    label: &str,
    fs: &dyn FileSystem,
) -> Result<Comparison, CompareError> {
    let current = parse_module(root, fs).map_err(CompareError::Current)?;
    let difference = diff(&baseline, &current);
    Ok(Comparison {
        revision: label.to_string(),
        previous: baseline,
        current,
        difference,
    })
}

/// Suggest the next version: compare with the latest version tag and bump it
/// according to the size of the change. Untagged modules start at `v0.1.0`.
pub fn suggest_next_version(
    root: &Path,
    provider: &dyn RevisionProvider,
    fs: &dyn FileSystem,
) -> Result<Suggestion, CompareError> {
    let revisions = provider
        .list_revisions(root)
        .map_err(CompareError::Revisions)?;

    let Some(latest) = revisions.last() else {
        tracing::debug!("No version tags found, starting at {}", INITIAL_VERSION);
        return Ok(Suggestion {
            latest: None,
            level: ChangeLevel::None,
            version: INITIAL_VERSION.to_string(),
        });
    };

    let comparison = compare_revision(root, latest, provider, fs)?;
    let level = comparison.difference.level();
    let version = suggest_version(Some(latest), level)?;
    Ok(Suggestion {
        latest: Some(latest.clone()),
        level,
        version,
    })
}

fn parse_revision(
    root: &Path,
    revision: &str,
    provider: &dyn RevisionProvider,
    fs: &dyn FileSystem,
) -> Result<ModuleInterface, CompareError> {
    let snapshot = provider
        .materialize(root, revision)
        .map_err(|source| CompareError::Materialize {
            revision: revision.to_string(),
            source,
        })?;

    // On error the snapshot is dropped here, which removes it.
    let interface = parse_module(snapshot.root(), fs).map_err(|source| CompareError::Comparison {
        revision: revision.to_string(),
        source,
    })?;

    if let Err(e) = snapshot.release() {
        tracing::warn!("{}", e);
    }
    Ok(interface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;
    use crate::revision::RevisionSnapshot;
    use std::collections::BTreeMap;

    /// Serves revisions from directories of a `MockFs`.
    struct FakeProvider {
        tags: Vec<String>,
        trees: BTreeMap<String, String>,
    }

    impl RevisionProvider for FakeProvider {
        fn list_revisions(&self, _root: &Path) -> Result<Vec<String>, ProviderError> {
            Ok(self.tags.clone())
        }

        fn materialize(&self, _root: &Path, revision: &str) -> Result<RevisionSnapshot, ProviderError> {
            self.trees
                .get(revision)
                .map(RevisionSnapshot::existing)
                .ok_or_else(|| ProviderError::InvalidRevision(revision.to_string()))
        }
    }

    fn fixture() -> (MockFs, FakeProvider) {
        let fs = MockFs::with_files([
            ("/work/go.mod", "module example.com/m\n"),
            ("/work/m.go", "package m\n\nfunc F(x int, y string) error { return nil }\n"),
            ("/old/go.mod", "module example.com/m\n"),
            ("/old/m.go", "package m\n\nfunc F(x int) error { return nil }\n"),
            ("/broken/m.go", "package m\n"),
        ]);
        let provider = FakeProvider {
            tags: vec!["v0.3.1".to_string(), "v0.3.2".to_string()],
            trees: BTreeMap::from([
                ("v0.3.2".to_string(), "/old".to_string()),
                ("v0.3.1".to_string(), "/broken".to_string()),
            ]),
        };
        (fs, provider)
    }

    #[test]
    fn test_compare_revision_reports_change() {
        let (fs, provider) = fixture();
        let comparison = compare_revision(Path::new("/work"), "v0.3.2", &provider, &fs).unwrap();

        let change = &comparison.difference.package_changes["example.com/m"].changes["F"];
        assert_eq!(change.old.to_string(), "func F(int) error");
        assert_eq!(change.new.to_string(), "func F(int, string) error");
        assert!(comparison.difference.breaking());
    }

    #[test]
    fn test_suggest_next_version() {
        let (fs, provider) = fixture();
        let suggestion = suggest_next_version(Path::new("/work"), &provider, &fs).unwrap();
        assert_eq!(suggestion.latest.as_deref(), Some("v0.3.2"));
        assert_eq!(suggestion.level, ChangeLevel::Breaking);
        assert_eq!(suggestion.version, "v0.4.0");
    }

    #[test]
    fn test_untagged_module_starts_at_initial_version() {
        let (fs, mut provider) = fixture();
        provider.tags.clear();
        let suggestion = suggest_next_version(Path::new("/work"), &provider, &fs).unwrap();
        assert_eq!(suggestion.latest, None);
        assert_eq!(suggestion.version, INITIAL_VERSION);
    }

    #[test]
    fn test_errors_name_the_failing_side() {
        let (fs, provider) = fixture();

        let err = compare_revision(Path::new("/work"), "v9.9.9", &provider, &fs).unwrap_err();
        assert!(matches!(err, CompareError::Materialize { .. }));

        let err = compare_revision(Path::new("/work"), "v0.3.1", &provider, &fs).unwrap_err();
        assert!(matches!(err, CompareError::Comparison { .. }));

        let err = compare_revision(Path::new("/nowhere"), "v0.3.1", &provider, &fs).unwrap_err();
        assert!(matches!(err, CompareError::Current(_)));
    }

    #[test]
    fn test_compare_baseline() {
        let (fs, _) = fixture();
        let baseline = parse_module(Path::new("/old"), &fs).unwrap();
        let comparison = compare_baseline(Path::new("/work"), baseline, "api.json", &fs).unwrap();
        assert_eq!(comparison.revision, "api.json");
        assert_eq!(comparison.difference.level(), ChangeLevel::Breaking);
    }
}
