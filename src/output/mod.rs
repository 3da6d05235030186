mod json;
mod markdown;
mod text;

pub use json::JsonOutput;
pub use markdown::MarkdownOutput;
pub use text::TextOutput;

use crate::cli::ChangeFilter;
use crate::model::ModuleInterface;
use crate::snapshot::{ModuleDifference, PackageDifference};
use std::io::Write;

pub trait OutputFormatter {
    fn format_interface<W: Write>(
        &self,
        interface: &ModuleInterface,
        writer: &mut W,
    ) -> std::io::Result<()>;

    /// Write `difference`, the change from `revision` to the working tree.
    fn format_diff<W: Write>(
        &self,
        difference: &ModuleDifference,
        revision: &str,
        writer: &mut W,
    ) -> std::io::Result<()>;
}

impl ChangeFilter {
    /// Whether the module difference is worth reporting at all.
    pub fn shows_module(self, difference: &ModuleDifference) -> bool {
        match self {
            ChangeFilter::Any => difference.any(),
            ChangeFilter::Breaking => difference.breaking(),
        }
    }

    pub fn shows_package(self, difference: &PackageDifference) -> bool {
        match self {
            ChangeFilter::Any => difference.any(),
            ChangeFilter::Breaking => difference.breaking(),
        }
    }

    /// Additions are never breaking, so only `any` lists them.
    pub fn shows_additions(self) -> bool {
        self == ChangeFilter::Any
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::model::{Export, FuncSignature, FuncType, ModuleInterface, TypeIdentifier};
    use crate::snapshot::{ModuleDifference, diff};

    pub fn func(name: &str, params: &[&str]) -> Export {
        Export::Func(FuncSignature {
            name: name.to_string(),
            receiver: None,
            type_params: Vec::new(),
            sig: FuncType {
                params: params.iter().map(|p| TypeIdentifier::local(*p)).collect(),
                results: vec![TypeIdentifier::local("error")],
            },
        })
    }

    pub fn module(packages: &[(&str, Vec<Export>)]) -> ModuleInterface {
        let mut interface = ModuleInterface::new("example.com/m");
        for (pkg, exports) in packages {
            interface.packages.insert(
                pkg.to_string(),
                exports.iter().map(|e| (e.id(), e.clone())).collect(),
            );
        }
        interface
    }

    /// F changes, G is removed, H is added, package `old` goes away and `extra` appears.
    pub fn sample_diff() -> ModuleDifference {
        let old = module(&[
            ("example.com/m", vec![func("F", &["int"]), func("G", &[])]),
            ("example.com/m/old", vec![func("Legacy", &[])]),
        ]);
        let new = module(&[
            ("example.com/m", vec![func("F", &["int", "string"]), func("H", &[])]),
            ("example.com/m/extra", vec![func("Extra", &[])]),
        ]);
        diff(&old, &new)
    }

    /// Only additions: a feature-level difference.
    pub fn feature_diff() -> ModuleDifference {
        let old = module(&[("example.com/m", vec![func("F", &["int"])])]);
        let new = module(&[("example.com/m", vec![func("F", &["int"]), func("H", &[])])]);
        diff(&old, &new)
    }
}
