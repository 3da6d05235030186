//! Interface assembly: from a module root on disk to a `ModuleInterface`.

mod discover;
mod modfile;

pub use discover::{GO_MOD, discover_module_dirs, is_go_source};
pub use modfile::parse_module_path;

use crate::fs::{FileSystem, WalkedDir, join_relative};
use crate::model::{ModuleInterface, PackageInterface};
use crate::parser::{GoParser, ParseError};
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterfaceError {
    #[error("No go.mod found in {}", .0.display())]
    ModuleRootNotFound(PathBuf),
    #[error("go.mod in {} has no module directive", .0.display())]
    MissingModulePath(PathBuf),
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
    #[error("None of the Go files under {} could be parsed", .0.display())]
    NoParsableSources(PathBuf),
}

impl InterfaceError {
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        InterfaceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Read the module path from `root/go.mod`.
pub fn read_module_path(root: &Path, fs: &dyn FileSystem) -> Result<String, InterfaceError> {
    let go_mod = root.join(GO_MOD);
    if !fs.exists(&go_mod) {
        return Err(InterfaceError::ModuleRootNotFound(root.to_path_buf()));
    }
    let content = fs
        .read_to_string(&go_mod)
        .map_err(|source| InterfaceError::io(&go_mod, source))?;
    parse_module_path(&content).ok_or_else(|| InterfaceError::MissingModulePath(root.to_path_buf()))
}

/// Build the interface snapshot of the module rooted at `root`.
///
/// Package directories are parsed in parallel and merged in discovery order.
/// Files that fail to parse are skipped, but a module where no file parses at all is an error.
pub fn parse_module(root: &Path, fs: &dyn FileSystem) -> Result<ModuleInterface, InterfaceError> {
    let module_path = read_module_path(root, fs)?;
    let dirs = discover_module_dirs(root, fs)?;
    let parser = GoParser::new();

    let packages: Vec<ParsedPackage> = dirs
        .par_iter()
        .map(|dir| parse_package(root, dir, &module_path, &parser, fs))
        .collect::<Result<_, _>>()?;

    let files_read: usize = packages.iter().map(|p| p.files_read).sum();
    let files_parsed: usize = packages.iter().map(|p| p.files_parsed).sum();
    if files_read > 0 && files_parsed == 0 {
        return Err(InterfaceError::NoParsableSources(root.to_path_buf()));
    }

    let mut interface = ModuleInterface::new(module_path);
    interface.packages.extend(
        packages
            .into_iter()
            .filter(|p| p.declares_exports)
            .map(|p| (p.import_path, p.exports)),
    );
    tracing::debug!(
        "Parsed {} of {} files into {} packages with {} exports from {}",
        files_parsed,
        files_read,
        interface.packages.len(),
        interface.export_count(),
        root.display()
    );
    Ok(interface)
}

/// Import path of a package directory. The root directory is the module itself.
pub fn import_path(module_path: &str, relative_dir: &str) -> String {
    if relative_dir.is_empty() {
        module_path.to_string()
    } else {
        format!("{}/{}", module_path, relative_dir)
    }
}

struct ParsedPackage {
    import_path: String,
    exports: PackageInterface,
    declares_exports: bool,
    files_read: usize,
    files_parsed: usize,
}

fn parse_package(
    root: &Path,
    dir: &WalkedDir,
    module_path: &str,
    parser: &GoParser,
    fs: &dyn FileSystem,
) -> Result<ParsedPackage, InterfaceError> {
    let dir_path = join_relative(root, Path::new(&dir.relative));
    let mut package = ParsedPackage {
        import_path: import_path(module_path, &dir.relative),
        exports: PackageInterface::new(),
        declares_exports: false,
        files_read: 0,
        files_parsed: 0,
    };

    for name in &dir.files {
        let path = dir_path.join(name);
        let source = fs
            .read_to_string(&path)
            .map_err(|source| InterfaceError::io(&path, source))?;
        package.files_read += 1;

        let file = match parser.parse_file(&source) {
            Ok(file) => file,
            Err(e @ (ParseError::Syntax { .. } | ParseError::MissingPackage)) => {
                tracing::warn!("Skipping {}: {}", path.display(), e);
                continue;
            }
            Err(source) => return Err(InterfaceError::Parse { path, source }),
        };
        package.files_parsed += 1;

        if file.is_external_test() {
            continue;
        }

        for skipped in &file.skipped {
            tracing::warn!(
                "Skipping {} at {}:{}: {}",
                skipped.name,
                path.display(),
                skipped.line,
                skipped.error
            );
        }

        package.declares_exports |= file.declares_exports;
        for export in file.exports {
            package.exports.insert(export.id(), export);
        }
    }

    Ok(package)
}
