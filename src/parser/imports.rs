use super::common::{node_text, unquote};
use crate::model::package_short_name;
use std::collections::HashMap;
use tree_sitter::Node;

/// Maps the names a file uses for its imports to full import paths.
///
/// Built once per file, before any declaration of that file is processed.
#[derive(Debug, Default, Clone)]
pub struct ImportResolver {
    by_alias: HashMap<String, String>,
}

impl ImportResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a resolver from every `import_declaration` under a file's root node.
    pub fn from_file(root: &Node, source: &str) -> Self {
        let mut resolver = Self::new();
        let mut cursor = root.walk();
        for decl in root.children(&mut cursor) {
            if decl.kind() == "import_declaration" {
                resolver.insert_declaration(&decl, source);
            }
        }
        resolver
    }

    fn insert_declaration(&mut self, decl: &Node, source: &str) {
        let mut cursor = decl.walk();
        for child in decl.named_children(&mut cursor) {
            match child.kind() {
                "import_spec" => self.insert_spec(&child, source),
                "import_spec_list" => {
                    let mut inner = child.walk();
                    for spec in child.named_children(&mut inner) {
                        if spec.kind() == "import_spec" {
                            self.insert_spec(&spec, source);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn insert_spec(&mut self, spec: &Node, source: &str) {
        let Some(path) = spec.child_by_field_name("path") else {
            return;
        };
        let path = unquote(node_text(&path, source));
        let alias = spec
            .child_by_field_name("name")
            .map(|name| node_text(&name, source));
        self.insert(alias, path);
    }

    /// Record one import. Without an explicit alias the package's default name is used.
    /// Blank and dot imports introduce no name and are ignored.
    pub fn insert(&mut self, alias: Option<&str>, path: &str) {
        let alias = match alias {
            Some("_") | Some(".") => return,
            Some(alias) => alias,
            None => package_short_name(path),
        };
        self.by_alias.insert(alias.to_string(), path.to_string());
    }

    pub fn resolve(&self, alias: &str) -> Option<&str> {
        self.by_alias.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_alias.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_alias.is_empty()
    }
}
