//! Builds `TypeIdentifier`s from tree-sitter type expressions.

use super::DeclError;
use super::common::{field_children, has_token, named_children, node_text};
use super::imports::ImportResolver;
use crate::model::{
    ChanDir, FuncType, InterfaceElem, StructField, TypeIdentifier, TypeParam, TypeTerm,
    is_exported,
};
use tree_sitter::Node;

/// Resolves type expressions of one file against that file's imports.
pub struct TypeResolver<'a> {
    source: &'a str,
    imports: &'a ImportResolver,
}

impl<'a> TypeResolver<'a> {
    pub fn new(source: &'a str, imports: &'a ImportResolver) -> Self {
        Self { source, imports }
    }

    pub fn resolve(&self, node: &Node) -> Result<TypeIdentifier, DeclError> {
        match node.kind() {
            "type_identifier" | "identifier" => Ok(TypeIdentifier::local(self.text(node))),
            "qualified_type" => self.resolve_qualified(node),
            "pointer_type" => Ok(TypeIdentifier::pointer(self.resolve_only_child(node)?)),
            "parenthesized_type" => self.resolve_only_child(node),
            "slice_type" => Ok(TypeIdentifier::slice(self.resolve_field(node, "element")?)),
            "array_type" => {
                let len = node
                    .child_by_field_name("length")
                    .ok_or_else(|| DeclError::malformed(node))?;
                Ok(TypeIdentifier::Array {
                    len: self.text(&len).split_whitespace().collect(),
                    elem: Box::new(self.resolve_field(node, "element")?),
                })
            }
            "map_type" => Ok(TypeIdentifier::Map {
                key: Box::new(self.resolve_field(node, "key")?),
                value: Box::new(self.resolve_field(node, "value")?),
            }),
            "channel_type" => Ok(TypeIdentifier::Chan {
                dir: self.chan_dir(node),
                elem: Box::new(self.resolve_field(node, "value")?),
            }),
            "function_type" => Ok(TypeIdentifier::Func(self.resolve_signature(node)?)),
            "struct_type" => self.resolve_struct(node),
            "interface_type" => self.resolve_interface(node),
            "generic_type" => self.resolve_generic(node),
            // Constraint syntax wrapping a single type, e.g. a type argument.
            "type_elem" | "type_constraint" => {
                let children = named_children(node);
                match children.as_slice() {
                    [only] => self.resolve(only),
                    _ => Err(DeclError::unsupported(node)),
                }
            }
            _ => Err(DeclError::unsupported(node)),
        }
    }

    /// Parameter and result types of a function-like node with
    /// `parameters` and optional `result` fields.
    pub fn resolve_signature(&self, node: &Node) -> Result<FuncType, DeclError> {
        let params = match node.child_by_field_name("parameters") {
            Some(list) => self.resolve_parameter_list(&list)?,
            None => Vec::new(),
        };
        let results = match node.child_by_field_name("result") {
            Some(result) if result.kind() == "parameter_list" => {
                self.resolve_parameter_list(&result)?
            }
            Some(result) => vec![self.resolve(&result)?],
            None => Vec::new(),
        };
        Ok(FuncType { params, results })
    }

    /// One entry per declared name, so `a, b int` yields two `int`s.
    pub fn resolve_parameter_list(&self, list: &Node) -> Result<Vec<TypeIdentifier>, DeclError> {
        let mut types = Vec::new();
        for param in named_children(list) {
            match param.kind() {
                "parameter_declaration" => {
                    let ty = self.resolve_field(&param, "type")?;
                    let count = field_children(&param, "name").len().max(1);
                    types.extend(std::iter::repeat_n(ty, count));
                }
                "variadic_parameter_declaration" => {
                    types.push(TypeIdentifier::ellipsis(self.resolve_field(&param, "type")?));
                }
                "comment" => {}
                _ => return Err(DeclError::unsupported(&param)),
            }
        }
        Ok(types)
    }

    /// One parameter per declared name, so `[K, V comparable]` yields two.
    pub fn resolve_type_params(&self, list: &Node) -> Result<Vec<TypeParam>, DeclError> {
        let mut params = Vec::new();
        for decl in named_children(list) {
            match decl.kind() {
                "type_parameter_declaration" => {
                    let constraint = decl
                        .child_by_field_name("type")
                        .ok_or_else(|| DeclError::malformed(&decl))?;
                    let terms = self.resolve_terms(&constraint)?;
                    for name in field_children(&decl, "name") {
                        params.push(TypeParam {
                            name: self.text(&name).to_string(),
                            constraint: terms.clone(),
                        });
                    }
                }
                "comment" => {}
                _ => return Err(DeclError::unsupported(&decl)),
            }
        }
        Ok(params)
    }

    /// Terms of a type set in key order. A lone type is a single term.
    fn resolve_terms(&self, node: &Node) -> Result<Vec<TypeTerm>, DeclError> {
        let mut terms = match node.kind() {
            "type_elem" | "type_constraint" => named_children(node)
                .iter()
                .filter(|child| child.kind() != "comment")
                .map(|child| self.resolve_term(child))
                .collect::<Result<Vec<_>, _>>()?,
            _ => vec![self.resolve_term(node)?],
        };
        terms.sort_by_key(TypeTerm::canonical_key);
        terms.dedup();
        Ok(terms)
    }

    fn resolve_term(&self, node: &Node) -> Result<TypeTerm, DeclError> {
        if node.kind() == "negated_type" {
            return Ok(TypeTerm {
                tilde: true,
                ty: self.resolve_only_child(node)?,
            });
        }
        Ok(TypeTerm::new(self.resolve(node)?))
    }

    fn resolve_qualified(&self, node: &Node) -> Result<TypeIdentifier, DeclError> {
        let package = node
            .child_by_field_name("package")
            .ok_or_else(|| DeclError::malformed(node))?;
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| DeclError::malformed(node))?;

        let alias = self.text(&package);
        let path = self
            .imports
            .resolve(alias)
            .ok_or_else(|| DeclError::ImportNotFound {
                alias: alias.to_string(),
            })?;
        Ok(TypeIdentifier::imported(path, self.text(&name)))
    }

    fn resolve_generic(&self, node: &Node) -> Result<TypeIdentifier, DeclError> {
        let base = self.resolve_field(node, "type")?;
        let arguments = node
            .child_by_field_name("type_arguments")
            .ok_or_else(|| DeclError::malformed(node))?;
        let args = named_children(&arguments)
            .iter()
            .filter(|arg| arg.kind() != "comment")
            .map(|arg| self.resolve(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(TypeIdentifier::Generic {
            base: Box::new(base),
            args,
        })
    }

    fn resolve_struct(&self, node: &Node) -> Result<TypeIdentifier, DeclError> {
        let mut fields = Vec::new();
        let Some(list) = named_children(node)
            .into_iter()
            .find(|child| child.kind() == "field_declaration_list")
        else {
            return Ok(TypeIdentifier::Struct { fields });
        };

        for decl in named_children(&list) {
            if decl.kind() != "field_declaration" {
                continue;
            }
            let names = field_children(&decl, "name");
            if names.is_empty() {
                // Embedded field: `T`, `*T`, `pkg.T` or `T[int]`.
                let mut ty = self.resolve_field(&decl, "type")?;
                if has_token(&decl, "*") {
                    ty = TypeIdentifier::pointer(ty);
                }
                if ty.base_name().is_some_and(is_exported) {
                    fields.push(StructField { name: None, ty });
                }
                continue;
            }

            let exported: Vec<&str> = names
                .iter()
                .map(|name| self.text(name))
                .filter(|name| is_exported(name))
                .collect();
            if exported.is_empty() {
                continue;
            }
            let ty = self.resolve_field(&decl, "type")?;
            for name in exported {
                fields.push(StructField {
                    name: Some(name.to_string()),
                    ty: ty.clone(),
                });
            }
        }

        Ok(TypeIdentifier::Struct { fields })
    }

    fn resolve_interface(&self, node: &Node) -> Result<TypeIdentifier, DeclError> {
        let mut elems = Vec::new();
        let mut sealed = false;
        for child in named_children(node) {
            match child.kind() {
                "method_elem" => {
                    let name = child
                        .child_by_field_name("name")
                        .ok_or_else(|| DeclError::malformed(&child))?;
                    let name = self.text(&name);
                    if is_exported(name) {
                        elems.push(InterfaceElem::Method {
                            name: name.to_string(),
                            sig: self.resolve_signature(&child)?,
                        });
                    } else {
                        sealed = true;
                    }
                }
                "comment" => {}
                _ => {
                    let mut terms = self.resolve_terms(&child)?;
                    let elem = match terms.as_slice() {
                        [TypeTerm { tilde: false, .. }] => InterfaceElem::Embedded {
                            ty: terms.remove(0).ty,
                        },
                        _ => InterfaceElem::Union { terms },
                    };
                    elems.push(elem);
                }
            }
        }
        if sealed {
            elems.push(InterfaceElem::Unexported);
        }
        elems.sort_by_key(InterfaceElem::sort_key);
        Ok(TypeIdentifier::Interface { elems })
    }

    fn chan_dir(&self, node: &Node) -> ChanDir {
        let mut cursor = node.walk();
        let tokens: Vec<&str> = node
            .children(&mut cursor)
            .filter(|child| !child.is_named())
            .map(|child| child.kind())
            .collect();
        match tokens.as_slice() {
            ["<-", "chan", ..] => ChanDir::Recv,
            ["chan", "<-", ..] => ChanDir::Send,
            _ => ChanDir::Both,
        }
    }

    fn resolve_field(&self, node: &Node, field: &str) -> Result<TypeIdentifier, DeclError> {
        let child = node
            .child_by_field_name(field)
            .ok_or_else(|| DeclError::malformed(node))?;
        self.resolve(&child)
    }

    fn resolve_only_child(&self, node: &Node) -> Result<TypeIdentifier, DeclError> {
        let child = named_children(node)
            .into_iter()
            .find(|child| child.kind() != "comment")
            .ok_or_else(|| DeclError::malformed(node))?;
        self.resolve(&child)
    }

    fn text(&self, node: &Node) -> &'a str {
        node_text(node, self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::go::parse_tree;

    /// Resolve the underlying type of the first `type X <expr>` in `source`.
    fn resolve_decl(source: &str) -> Result<TypeIdentifier, DeclError> {
        let tree = parse_tree(source).unwrap();
        let root = tree.root_node();
        let imports = ImportResolver::from_file(&root, source);
        let resolver = TypeResolver::new(source, &imports);

        let decl = named_children(&root)
            .into_iter()
            .find(|n| n.kind() == "type_declaration")
            .unwrap();
        let spec = named_children(&decl)
            .into_iter()
            .find(|n| n.kind() == "type_spec")
            .unwrap();
        resolver.resolve(&spec.child_by_field_name("type").unwrap())
    }

    #[test]
    fn test_local_and_imported() {
        let ty = resolve_decl("package p\ntype A int\n").unwrap();
        assert_eq!(ty, TypeIdentifier::local("int"));

        let ty = resolve_decl("package p\nimport \"time\"\ntype A time.Duration\n").unwrap();
        assert_eq!(ty, TypeIdentifier::imported("time", "Duration"));
    }

    #[test]
    fn test_import_alias_does_not_change_identity() {
        let plain = resolve_decl("package p\nimport \"net/http\"\ntype A http.Handler\n").unwrap();
        let renamed = resolve_decl("package p\nimport h \"net/http\"\ntype A h.Handler\n").unwrap();
        assert!(plain.same_type(&renamed));
        assert_eq!(plain.canonical_key(), "net/http.Handler");
    }

    #[test]
    fn test_unknown_import_alias() {
        let err = resolve_decl("package p\ntype A missing.Thing\n").unwrap_err();
        assert!(matches!(err, DeclError::ImportNotFound { ref alias } if alias == "missing"));
    }

    #[test]
    fn test_composite_shapes() {
        let source = "package p\nimport \"io\"\ntype A map[string][]*io.Reader\n";
        let ty = resolve_decl(source).unwrap();
        assert_eq!(ty.to_string(), "map[string][]*io.Reader");
        assert_eq!(ty.canonical_key(), "map[string][]*io.Reader");

        let ty = resolve_decl("package p\ntype A [ 16 ]byte\n").unwrap();
        assert_eq!(ty.canonical_key(), "[16]byte");

        let ty = resolve_decl("package p\ntype A <-chan error\n").unwrap();
        assert_eq!(ty.canonical_key(), "<-chan error");
        let ty = resolve_decl("package p\ntype A chan<- int\n").unwrap();
        assert_eq!(ty.canonical_key(), "chan<- int");
        let ty = resolve_decl("package p\ntype A chan int\n").unwrap();
        assert_eq!(ty.canonical_key(), "chan int");
    }

    #[test]
    fn test_function_type_expands_names() {
        let source = "package p\ntype Handler func(a, b int, rest ...string) (n int, err error)\n";
        let ty = resolve_decl(source).unwrap();
        assert_eq!(ty.to_string(), "func(int, int, ...string) (int, error)");
        assert_eq!(
            ty.canonical_key(),
            "func(int,int,...string,)(int,error,)"
        );
    }

    #[test]
    fn test_struct_keeps_only_exported_fields() {
        let source = r#"package p

import "sync"

type Config struct {
	Name, Host string
	port int
	*sync.Mutex
	inner
	Tags []string `json:"tags"`
}
"#;
        let ty = resolve_decl(source).unwrap();
        assert_eq!(
            ty.to_string(),
            "struct{Name string; Host string; *sync.Mutex; Tags []string}"
        );
    }

    #[test]
    fn test_interface_is_order_independent() {
        let a = resolve_decl(
            "package p\nimport \"io\"\ntype A interface {\n\tio.Reader\n\tClose() error\n\tFlush()\n}\n",
        )
        .unwrap();
        let b = resolve_decl(
            "package p\nimport \"io\"\ntype A interface {\n\tFlush()\n\tClose() error\n\tio.Reader\n}\n",
        )
        .unwrap();
        assert_eq!(a.canonical_key(), b.canonical_key());
        assert_eq!(a.to_string(), "interface{Close() error; Flush(); io.Reader}");
    }

    #[test]
    fn test_constraint_union_is_a_sorted_type_set() {
        let ty = resolve_decl("package p\ntype Number interface {\n\t~int | ~float64\n}\n")
            .unwrap();
        assert_eq!(ty.to_string(), "interface{~float64 | ~int}");

        let reordered =
            resolve_decl("package p\ntype Number interface {\n\t~float64 | ~int\n}\n").unwrap();
        assert!(ty.same_type(&reordered));

        let widened = resolve_decl("package p\ntype Number interface {\n\tint | ~float64\n}\n")
            .unwrap();
        assert!(!ty.same_type(&widened));
    }

    #[test]
    fn test_approximation_outside_a_type_set_is_unsupported() {
        let err = resolve_decl("package p\ntype A ~int\n").unwrap_err();
        assert!(matches!(err, DeclError::UnsupportedTypeExpr { ref kind } if kind == "negated_type"));
    }

    #[test]
    fn test_unexported_method_seals_interface() {
        let open = resolve_decl("package p\ntype A interface {\n\tRun()\n}\n").unwrap();
        let sealed =
            resolve_decl("package p\ntype A interface {\n\tRun()\n\tm()\n}\n").unwrap();
        let sealed_twice =
            resolve_decl("package p\ntype A interface {\n\tn()\n\tRun()\n\tm()\n}\n").unwrap();

        assert!(!open.same_type(&sealed));
        assert!(sealed.same_type(&sealed_twice));
        assert_eq!(sealed.to_string(), "interface{Run(); unexported methods}");
    }

    /// Type parameters of the first generic function in `source`.
    fn resolve_params(source: &str) -> Result<Vec<TypeParam>, DeclError> {
        let tree = parse_tree(source).unwrap();
        let root = tree.root_node();
        let imports = ImportResolver::from_file(&root, source);
        let resolver = TypeResolver::new(source, &imports);

        let func = named_children(&root)
            .into_iter()
            .find(|n| n.kind() == "function_declaration")
            .unwrap();
        resolver.resolve_type_params(&func.child_by_field_name("type_parameters").unwrap())
    }

    #[test]
    fn test_type_params_resolve_constraint_imports() {
        let plain = resolve_params(
            "package p\nimport \"fmt\"\nfunc Show[T fmt.Stringer](v T) string { return \"\" }\n",
        )
        .unwrap();
        let renamed = resolve_params(
            "package p\nimport f \"fmt\"\nfunc Show[T f.Stringer](v T) string { return \"\" }\n",
        )
        .unwrap();
        assert_eq!(plain, renamed);
        assert_eq!(plain[0].constraint[0].ty, TypeIdentifier::imported("fmt", "Stringer"));
    }

    #[test]
    fn test_type_params_expand_shared_constraints() {
        let params = resolve_params(
            "package p\nimport t \"time\"\nfunc Max[A, B ~int64 | t.Duration](a A, b B) {}\n",
        )
        .unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params[1].name, "B");
        assert_eq!(params[1].to_string(), "B time.Duration | ~int64");
        assert_eq!(params[0].constraint, params[1].constraint);
    }

    #[test]
    fn test_type_param_constraint_with_unknown_import() {
        let err = resolve_params("package p\nfunc F[T missing.Iface](v T) {}\n").unwrap_err();
        assert!(matches!(err, DeclError::ImportNotFound { ref alias } if alias == "missing"));
    }

    #[test]
    fn test_generic_instantiation() {
        let ty = resolve_decl("package p\ntype IntList List[int]\n").unwrap();
        assert_eq!(ty.to_string(), "List[int]");
        assert_eq!(ty.canonical_key(), "List[int,]");
    }
}
