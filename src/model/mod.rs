mod export;
mod type_id;

pub use export::{Export, FuncSignature, TypeSignature};
pub use type_id::{
    ChanDir, FuncType, InterfaceElem, StructField, TypeIdentifier, TypeParam, TypeTerm,
    package_short_name, type_params_display, type_params_key,
};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All exports of one package, keyed by export ID.
pub type PackageInterface = BTreeMap<String, Export>;

/// The Interface Snapshot of a module at one revision.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInterface {
    /// Module path from `go.mod`.
    pub path: String,
    /// Package import path → package interface.
    pub packages: BTreeMap<String, PackageInterface>,
}

impl ModuleInterface {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            packages: BTreeMap::new(),
        }
    }

    pub fn package(&self, import_path: &str) -> Option<&PackageInterface> {
        self.packages.get(import_path)
    }

    pub fn export_count(&self) -> usize {
        self.packages.values().map(BTreeMap::len).sum()
    }
}

/// Returns true if a Go identifier is exported (starts with an upper-case letter).
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}
