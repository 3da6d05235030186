use super::InterfaceError;
use crate::fs::{FileSystem, WalkRules, WalkedDir};
use std::path::Path;

pub const GO_MOD: &str = "go.mod";

const MODULE_WALK: WalkRules = WalkRules {
    skip_dir: is_ignored_dir,
    boundary: GO_MOD,
};

/// List the directories of the module rooted at `root` that hold Go sources,
/// with their non-test `.go` files. The root itself has relative path `""`.
///
/// Hidden, `_`-prefixed, `vendor` and `testdata` directories are skipped,
/// and so is any subdirectory that has its own `go.mod`.
pub fn discover_module_dirs(
    root: &Path,
    fs: &dyn FileSystem,
) -> Result<Vec<WalkedDir>, InterfaceError> {
    if !fs.exists(&root.join(GO_MOD)) {
        return Err(InterfaceError::ModuleRootNotFound(root.to_path_buf()));
    }

    let dirs: Vec<WalkedDir> = fs
        .walk_dirs(root, MODULE_WALK)
        .map_err(|source| InterfaceError::io(root, source))?
        .into_iter()
        .filter_map(|mut dir| {
            dir.files.retain(|name| is_go_source(name));
            (!dir.files.is_empty()).then_some(dir)
        })
        .collect();
    tracing::debug!("Discovered {} package directories under {}", dirs.len(), root.display());
    Ok(dirs)
}

/// A non-test Go source file.
pub fn is_go_source(name: &str) -> bool {
    name.ends_with(".go") && !name.ends_with("_test.go")
}

fn is_ignored_dir(name: &str) -> bool {
    name.starts_with('_') || name == "vendor" || name == "testdata"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFs;

    fn relative(dirs: &[WalkedDir]) -> Vec<&str> {
        dirs.iter().map(|d| d.relative.as_str()).collect()
    }

    #[test]
    fn test_walks_module_tree_in_order() {
        let fs = MockFs::with_files([
            ("/m/go.mod", "module example.com/m"),
            ("/m/m.go", "package m"),
            ("/m/b/b.go", "package b"),
            ("/m/a/a.go", "package a"),
            ("/m/a/inner/x.go", "package inner"),
            ("/m/a/a_test.go", "package a"),
            ("/m/docs/README.md", "docs"),
        ]);
        let dirs = discover_module_dirs(Path::new("/m"), &fs).unwrap();
        assert_eq!(relative(&dirs), vec!["", "a", "a/inner", "b"]);
        assert_eq!(dirs[0].files, vec!["m.go"]);
        assert_eq!(dirs[1].files, vec!["a.go"]);
    }

    #[test]
    fn test_skips_ignored_and_nested_modules() {
        let fs = MockFs::with_files([
            ("/m/go.mod", "module example.com/m"),
            ("/m/pkg/p.go", "package pkg"),
            ("/m/.git/hooks/h.go", "package hooks"),
            ("/m/_scratch/s.go", "package s"),
            ("/m/vendor/dep/d.go", "package dep"),
            ("/m/pkg/testdata/t.go", "package t"),
            ("/m/tools/go.mod", "module example.com/m/tools"),
            ("/m/tools/t.go", "package tools"),
        ]);
        let dirs = discover_module_dirs(Path::new("/m"), &fs).unwrap();
        assert_eq!(relative(&dirs), vec!["pkg"]);
    }

    #[test]
    fn test_only_test_files_is_not_a_package_dir() {
        let fs = MockFs::with_files([
            ("/m/go.mod", "module example.com/m"),
            ("/m/e2e/e2e_test.go", "package e2e"),
        ]);
        assert!(discover_module_dirs(Path::new("/m"), &fs).unwrap().is_empty());
    }

    #[test]
    fn test_missing_go_mod() {
        let fs = MockFs::with_files([("/m/m.go", "package m")]);
        let err = discover_module_dirs(Path::new("/m"), &fs).unwrap_err();
        assert!(matches!(err, InterfaceError::ModuleRootNotFound(_)));
    }

    #[test]
    fn test_source_file_filter() {
        assert!(is_go_source("client.go"));
        assert!(!is_go_source("client_test.go"));
        assert!(!is_go_source("client.go.orig"));
    }
}
