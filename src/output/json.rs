use crate::cli::ChangeFilter;
use crate::model::{Export, ModuleInterface};
use crate::output::OutputFormatter;
use crate::snapshot::{ChangeLevel, ModuleDifference};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

pub struct JsonOutput {
    pub changes: ChangeFilter,
}

impl JsonOutput {
    pub fn new(changes: ChangeFilter) -> Self {
        Self { changes }
    }
}

#[derive(Serialize)]
struct JsonInterface<'a> {
    module: &'a str,
    packages: BTreeMap<&'a str, Vec<JsonExport>>,
}

#[derive(Serialize)]
struct JsonExport {
    id: String,
    kind: &'static str,
    signature: String,
}

#[derive(Serialize)]
struct JsonDiff<'a> {
    module: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    old_module: Option<&'a str>,
    revision: &'a str,
    level: ChangeLevel,
    any: bool,
    breaking: bool,
    package_removals: Vec<&'a str>,
    package_additions: Vec<&'a str>,
    package_changes: BTreeMap<&'a str, JsonPackageDiff<'a>>,
}

#[derive(Serialize)]
struct JsonPackageDiff<'a> {
    removals: BTreeMap<&'a str, String>,
    additions: BTreeMap<&'a str, String>,
    changes: BTreeMap<&'a str, JsonChange>,
}

#[derive(Serialize)]
struct JsonChange {
    old: String,
    new: String,
}

impl From<&Export> for JsonExport {
    fn from(export: &Export) -> Self {
        let kind = match export {
            Export::Func(_) if export.is_method() => "method",
            Export::Func(_) => "func",
            Export::Type(_) => "type",
        };
        Self {
            id: export.id(),
            kind,
            signature: export.to_string(),
        }
    }
}

impl OutputFormatter for JsonOutput {
    fn format_interface<W: Write>(
        &self,
        interface: &ModuleInterface,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let json = JsonInterface {
            module: &interface.path,
            packages: interface
                .packages
                .iter()
                .map(|(path, package)| {
                    (path.as_str(), package.values().map(JsonExport::from).collect())
                })
                .collect(),
        };
        serde_json::to_writer_pretty(&mut *writer, &json)?;
        writeln!(writer)
    }

    fn format_diff<W: Write>(
        &self,
        difference: &ModuleDifference,
        revision: &str,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let additions = self.changes.shows_additions();
        let package_changes = difference
            .package_changes
            .iter()
            .filter(|(_, package)| self.changes.shows_package(package))
            .map(|(path, package)| {
                let json = JsonPackageDiff {
                    removals: signatures(&package.removals),
                    additions: if additions {
                        signatures(&package.additions)
                    } else {
                        BTreeMap::new()
                    },
                    changes: package
                        .changes
                        .iter()
                        .map(|(id, change)| {
                            (
                                id.as_str(),
                                JsonChange {
                                    old: change.old.to_string(),
                                    new: change.new.to_string(),
                                },
                            )
                        })
                        .collect(),
                };
                (path.as_str(), json)
            })
            .collect();

        let json = JsonDiff {
            module: &difference.module_path,
            old_module: difference
                .module_path_changed()
                .then_some(difference.old_module_path.as_str()),
            revision,
            level: difference.level(),
            any: difference.any(),
            breaking: difference.breaking(),
            package_removals: difference.package_removals.keys().map(String::as_str).collect(),
            package_additions: if additions {
                difference.package_additions.keys().map(String::as_str).collect()
            } else {
                Vec::new()
            },
            package_changes,
        };
        serde_json::to_writer_pretty(&mut *writer, &json)?;
        writeln!(writer)
    }
}

fn signatures(exports: &BTreeMap<String, Export>) -> BTreeMap<&str, String> {
    exports
        .iter()
        .map(|(id, export)| (id.as_str(), export.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::{func, module, sample_diff};
    use serde_json::Value;

    fn render_diff(filter: ChangeFilter) -> Value {
        let mut out = Vec::new();
        JsonOutput::new(filter)
            .format_diff(&sample_diff(), "v0.3.2", &mut out)
            .unwrap();
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn test_diff_json() {
        let json = render_diff(ChangeFilter::Any);
        assert_eq!(json["level"], "breaking");
        assert_eq!(json["breaking"], true);
        assert_eq!(json["revision"], "v0.3.2");
        assert!(json.get("old_module").is_none());
        assert_eq!(json["package_removals"][0], "example.com/m/old");
        assert_eq!(json["package_additions"][0], "example.com/m/extra");

        let pkg = &json["package_changes"]["example.com/m"];
        assert_eq!(pkg["changes"]["F"]["old"], "func F(int) error");
        assert_eq!(pkg["changes"]["F"]["new"], "func F(int, string) error");
        assert_eq!(pkg["removals"]["G"], "func G() error");
        assert_eq!(pkg["additions"]["H"], "func H() error");
    }

    #[test]
    fn test_breaking_filter_drops_additions() {
        let json = render_diff(ChangeFilter::Breaking);
        assert_eq!(json["package_additions"].as_array().unwrap().len(), 0);
        let pkg = &json["package_changes"]["example.com/m"];
        assert!(pkg["additions"].as_object().unwrap().is_empty());
        assert_eq!(pkg["removals"]["G"], "func G() error");
    }

    #[test]
    fn test_interface_json() {
        let interface = module(&[("example.com/m", vec![func("F", &["int"])])]);
        let mut out = Vec::new();
        JsonOutput::new(ChangeFilter::Any)
            .format_interface(&interface, &mut out)
            .unwrap();
        let json: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["module"], "example.com/m");
        let export = &json["packages"]["example.com/m"][0];
        assert_eq!(export["id"], "F");
        assert_eq!(export["kind"], "func");
        assert_eq!(export["signature"], "func F(int) error");
    }
}
