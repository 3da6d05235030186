use crate::model::{Export, ModuleInterface, PackageInterface};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// How much a difference matters to the version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeLevel {
    None,
    Feature,
    Breaking,
}

impl fmt::Display for ChangeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeLevel::None => write!(f, "none"),
            ChangeLevel::Feature => write!(f, "feature"),
            ChangeLevel::Breaking => write!(f, "breaking"),
        }
    }
}

/// An export present on both sides whose compare key differs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDifference {
    pub old: Export,
    pub new: Export,
}

/// Changes within one package that exists on both sides.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDifference {
    pub removals: BTreeMap<String, Export>,
    pub additions: BTreeMap<String, Export>,
    pub changes: BTreeMap<String, ExportDifference>,
}

impl PackageDifference {
    pub fn any(&self) -> bool {
        !self.removals.is_empty() || !self.additions.is_empty() || !self.changes.is_empty()
    }

    pub fn breaking(&self) -> bool {
        !self.removals.is_empty() || !self.changes.is_empty()
    }
}

/// Everything that differs between two interface snapshots of a module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleDifference {
    /// Module path of the newer snapshot.
    pub module_path: String,
    /// Module path of the older snapshot.
    pub old_module_path: String,
    pub package_removals: BTreeMap<String, PackageInterface>,
    pub package_additions: BTreeMap<String, PackageInterface>,
    /// Only packages with a non-empty difference appear here.
    pub package_changes: BTreeMap<String, PackageDifference>,
}

impl ModuleDifference {
    pub fn module_path_changed(&self) -> bool {
        self.module_path != self.old_module_path
    }

    pub fn any(&self) -> bool {
        self.module_path_changed()
            || !self.package_removals.is_empty()
            || !self.package_additions.is_empty()
            || self.package_changes.values().any(PackageDifference::any)
    }

    pub fn breaking(&self) -> bool {
        self.module_path_changed()
            || !self.package_removals.is_empty()
            || self.package_changes.values().any(PackageDifference::breaking)
    }

    pub fn level(&self) -> ChangeLevel {
        if self.breaking() {
            ChangeLevel::Breaking
        } else if self.any() {
            ChangeLevel::Feature
        } else {
            ChangeLevel::None
        }
    }
}

/// Compare two interface snapshots. `old` is the baseline.
pub fn diff(old: &ModuleInterface, new: &ModuleInterface) -> ModuleDifference {
    let mut difference = ModuleDifference {
        module_path: new.path.clone(),
        old_module_path: old.path.clone(),
        ..ModuleDifference::default()
    };

    for (path, old_pkg) in &old.packages {
        match new.packages.get(path) {
            None => {
                difference
                    .package_removals
                    .insert(path.clone(), old_pkg.clone());
            }
            Some(new_pkg) => {
                let pkg_diff = diff_package(old_pkg, new_pkg);
                if pkg_diff.any() {
                    difference.package_changes.insert(path.clone(), pkg_diff);
                }
            }
        }
    }

    for (path, new_pkg) in &new.packages {
        if !old.packages.contains_key(path) {
            difference
                .package_additions
                .insert(path.clone(), new_pkg.clone());
        }
    }

    difference
}

pub fn diff_package(old: &PackageInterface, new: &PackageInterface) -> PackageDifference {
    let mut difference = PackageDifference::default();

    for (id, old_export) in old {
        match new.get(id) {
            None => {
                difference.removals.insert(id.clone(), old_export.clone());
            }
            Some(new_export) if !old_export.same_as(new_export) => {
                difference.changes.insert(
                    id.clone(),
                    ExportDifference {
                        old: old_export.clone(),
                        new: new_export.clone(),
                    },
                );
            }
            Some(_) => {}
        }
    }

    for (id, new_export) in new {
        if !old.contains_key(id) {
            difference.additions.insert(id.clone(), new_export.clone());
        }
    }

    difference
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FuncSignature, FuncType, TypeIdentifier};

    fn func(name: &str, params: &[&str]) -> Export {
        Export::Func(FuncSignature {
            name: name.to_string(),
            receiver: None,
            type_params: Vec::new(),
            sig: FuncType {
                params: params.iter().map(|p| TypeIdentifier::local(*p)).collect(),
                results: vec![],
            },
        })
    }

    fn module(path: &str, packages: &[(&str, Vec<Export>)]) -> ModuleInterface {
        let mut interface = ModuleInterface::new(path);
        for (pkg, exports) in packages {
            interface.packages.insert(
                pkg.to_string(),
                exports.iter().map(|e| (e.id(), e.clone())).collect(),
            );
        }
        interface
    }

    #[test]
    fn test_identical_snapshots_have_no_difference() {
        let a = module("example.com/m", &[("example.com/m", vec![func("F", &["int"])])]);
        let d = diff(&a, &a);
        assert!(!d.any());
        assert!(!d.breaking());
        assert_eq!(d.level(), ChangeLevel::None);
    }

    #[test]
    fn test_added_function_is_a_feature() {
        let old = module("example.com/m", &[("example.com/m", vec![func("F", &[])])]);
        let new = module(
            "example.com/m",
            &[("example.com/m", vec![func("F", &[]), func("G", &[])])],
        );
        let d = diff(&old, &new);
        assert!(d.any());
        assert!(!d.breaking());
        assert_eq!(d.level(), ChangeLevel::Feature);
        assert!(d.package_changes["example.com/m"].additions.contains_key("G"));
    }

    #[test]
    fn test_removed_function_is_breaking() {
        let old = module(
            "example.com/m",
            &[("example.com/m", vec![func("F", &[]), func("G", &[])])],
        );
        let new = module("example.com/m", &[("example.com/m", vec![func("F", &[])])]);
        let d = diff(&old, &new);
        assert!(d.breaking());
        assert!(d.package_changes["example.com/m"].removals.contains_key("G"));
    }

    #[test]
    fn test_signature_change_is_breaking_change() {
        let old = module("example.com/m", &[("example.com/m", vec![func("F", &["int"])])]);
        let new = module(
            "example.com/m",
            &[("example.com/m", vec![func("F", &["int", "int"])])],
        );
        let d = diff(&old, &new);
        let change = &d.package_changes["example.com/m"].changes["F"];
        assert_eq!(change.old.to_string(), "func F(int)");
        assert_eq!(change.new.to_string(), "func F(int, int)");
        assert_eq!(d.level(), ChangeLevel::Breaking);
    }

    #[test]
    fn test_package_addition_and_removal() {
        let old = module(
            "example.com/m",
            &[("example.com/m/a", vec![func("A", &[])])],
        );
        let new = module(
            "example.com/m",
            &[("example.com/m/b", vec![func("B", &[])])],
        );
        let d = diff(&old, &new);
        assert!(d.package_removals.contains_key("example.com/m/a"));
        assert!(d.package_additions.contains_key("example.com/m/b"));
        assert!(d.package_changes.is_empty());
        assert!(d.breaking());

        let d = diff(&ModuleInterface::new("example.com/m"), &new);
        assert_eq!(d.level(), ChangeLevel::Feature);
    }

    #[test]
    fn test_unchanged_packages_are_not_recorded() {
        let pkg = ("example.com/m", vec![func("F", &[])]);
        let old = module("example.com/m", &[pkg.clone()]);
        let new = module(
            "example.com/m",
            &[pkg, ("example.com/m/extra", vec![func("X", &[])])],
        );
        assert!(diff(&old, &new).package_changes.is_empty());
    }

    #[test]
    fn test_module_path_change_is_breaking() {
        let old = module("example.com/m", &[]);
        let new = module("example.com/m/v2", &[]);
        let d = diff(&old, &new);
        assert!(d.module_path_changed());
        assert!(d.any());
        assert!(d.breaking());
    }

    #[test]
    fn test_breaking_implies_any() {
        let snapshots = [
            module("example.com/m", &[]),
            module("example.com/m", &[("example.com/m", vec![func("F", &[])])]),
            module("example.com/m", &[("example.com/m", vec![func("F", &["int"])])]),
            module("example.com/m", &[("example.com/m/x", vec![func("F", &[])])]),
        ];
        for old in &snapshots {
            for new in &snapshots {
                let d = diff(old, new);
                assert!(!d.breaking() || d.any());
                assert_eq!(d.any(), d.level() != ChangeLevel::None);
            }
        }
    }
}
