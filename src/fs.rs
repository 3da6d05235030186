//! Filesystem access behind a trait.
//!
//! Module discovery, source parsing, config loading and snapshot files all go
//! through `FileSystem`, so a whole module tree can live in memory in tests.

use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Which directories `FileSystem::walk_dirs` descends into.
#[derive(Debug, Clone, Copy)]
pub struct WalkRules {
    /// Directory names that are never entered. Hidden entries are always skipped.
    pub skip_dir: fn(&str) -> bool,
    /// A subdirectory holding a file with this name starts another tree and is not entered.
    pub boundary: &'static str,
}

/// A directory reached by a walk, with the names of the files directly inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedDir {
    /// Path below the walk root with `/` separators; `""` for the root itself.
    pub relative: String,
    /// Sorted file names.
    pub files: Vec<String>,
}

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Create or replace the file at `path`.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;

    /// Every directory under `root` that `rules` let the walk enter, parents before
    /// children and siblings by name.
    fn walk_dirs(&self, root: &Path, rules: WalkRules) -> io::Result<Vec<WalkedDir>>;

    /// Create (or truncate) a file and return a writer for it.
    fn create_file(&self, path: &Path) -> io::Result<Box<dyn Write>>;
}

/// The disk, through `std::fs` and `ignore`.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn walk_dirs(&self, root: &Path, rules: WalkRules) -> io::Result<Vec<WalkedDir>> {
        let WalkRules { skip_dir, boundary } = rules;
        // Ignore files have no say in what a Go package contains.
        let walker = ignore::WalkBuilder::new(root)
            .hidden(true)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if entry.depth() == 0 || !is_dir {
                    return true;
                }
                !skip_dir(&entry.file_name().to_string_lossy())
                    && !entry.path().join(boundary).is_file()
            })
            .build();

        let mut dirs: Vec<WalkedDir> = Vec::new();
        let mut index: HashMap<PathBuf, usize> = HashMap::new();
        for entry in walker {
            let entry = entry.map_err(io::Error::other)?;
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            let path = entry.path();
            if file_type.is_dir() {
                index.insert(path.to_path_buf(), dirs.len());
                dirs.push(WalkedDir {
                    relative: relative_slashed(root, path),
                    files: Vec::new(),
                });
            } else if file_type.is_file() {
                if let Some(&i) = path.parent().and_then(|parent| index.get(parent)) {
                    dirs[i]
                        .files
                        .push(entry.file_name().to_string_lossy().into_owned());
                }
            }
        }
        sort_walk(&mut dirs);
        Ok(dirs)
    }

    fn create_file(&self, path: &Path) -> io::Result<Box<dyn Write>> {
        Ok(Box::new(std::fs::File::create(path)?))
    }
}

fn relative_slashed(root: &Path, path: &Path) -> String {
    let Ok(relative) = path.strip_prefix(root) else {
        return String::new();
    };
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

// Component-wise order puts every directory right before its own subtree.
fn sort_walk(dirs: &mut [WalkedDir]) {
    for dir in dirs.iter_mut() {
        dir.files.sort();
    }
    dirs.sort_by(|a, b| a.relative.split('/').cmp(b.relative.split('/')));
}

/// Shared `RealFs` for entry points that aren't handed a filesystem.
pub fn default_fs() -> &'static RealFs {
    static INSTANCE: RealFs = RealFs;
    &INSTANCE
}

/// Join a relative directory onto a root, treating an empty relative path as the root itself.
pub fn join_relative(root: &Path, relative: &Path) -> PathBuf {
    if relative.as_os_str().is_empty() {
        root.to_path_buf()
    } else {
        root.join(relative)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn skip_underscore(name: &str) -> bool {
        name.starts_with('_')
    }

    #[test]
    fn test_real_walk_prunes_and_orders() {
        let dir = TempDir::new().unwrap();
        for file in [
            "go.mod",
            "root.go",
            "b/b.go",
            "a/a.go",
            "a/inner/x.go",
            "_scratch/s.go",
            ".git/config",
            "tools/go.mod",
            "tools/t.go",
        ] {
            let path = dir.path().join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, "").unwrap();
        }

        let rules = WalkRules {
            skip_dir: skip_underscore,
            boundary: "go.mod",
        };
        let dirs = RealFs.walk_dirs(dir.path(), rules).unwrap();
        let relative: Vec<&str> = dirs.iter().map(|d| d.relative.as_str()).collect();
        assert_eq!(relative, vec!["", "a", "a/inner", "b"]);
        assert_eq!(dirs[0].files, vec!["go.mod", "root.go"]);
        assert_eq!(dirs[2].files, vec!["x.go"]);
    }

    #[test]
    fn test_real_walk_missing_root() {
        let dir = TempDir::new().unwrap();
        let rules = WalkRules {
            skip_dir: skip_underscore,
            boundary: "go.mod",
        };
        assert!(RealFs.walk_dirs(&dir.path().join("absent"), rules).is_err());
    }
}
