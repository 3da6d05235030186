use super::common::{named_children, node_line, node_text};
use super::signature::{
    build_function, build_method, build_type, declared_name, receiver_text, value_names,
};
use super::{DeclError, ImportResolver, ParseError, TypeResolver};
use crate::model::{Export, is_exported};
use tree_sitter::{Node, Tree};

crate::define_parser!(GO_PARSER, tree_sitter_go::LANGUAGE);

/// Parse Go source into a syntax tree on this thread's parser.
pub fn parse_tree(source: &str) -> Result<Tree, ParseError> {
    GO_PARSER.with(|cell| {
        let mut slot = cell.borrow_mut();
        let parser = slot
            .as_mut()
            .ok_or_else(|| ParseError::Parse("Go grammar could not be loaded".to_string()))?;
        parser
            .parse(source, None)
            .ok_or_else(|| ParseError::Parse("parser returned no tree".to_string()))
    })
}

/// A declaration that looked exported but could not be described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDecl {
    pub name: String,
    pub line: usize,
    pub error: DeclError,
}

/// The exported surface of one Go source file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    pub package: String,
    /// Exports in declaration order.
    pub exports: Vec<Export>,
    pub skipped: Vec<SkippedDecl>,
    /// True if the file declares any exported top-level name,
    /// constants and variables included.
    pub declares_exports: bool,
}

impl ParsedFile {
    /// `_test` packages hold external tests and never contribute exports.
    pub fn is_external_test(&self) -> bool {
        self.package.ends_with("_test")
    }
}

pub struct GoParser;

impl GoParser {
    pub fn new() -> Self {
        Self
    }

    /// Extract every exported function, method and type of a file.
    ///
    /// Only a missing or broken package clause rejects the file. A declaration
    /// containing a syntax error, or one that can't be resolved, lands in `skipped`.
    pub fn parse_file(&self, source: &str) -> Result<ParsedFile, ParseError> {
        let tree = parse_tree(source)?;
        let root = tree.root_node();

        let mut file = ParsedFile {
            package: package_name(&root, source)?,
            ..ParsedFile::default()
        };

        let imports = ImportResolver::from_file(&root, source);
        let types = TypeResolver::new(source, &imports);

        for decl in named_children(&root) {
            match decl.kind() {
                "package_clause" | "import_declaration" | "comment" => {}
                "function_declaration" | "method_declaration" if decl.has_error() => {
                    file.record(&decl, source, Err(syntax_error(&decl)));
                }
                "function_declaration" => {
                    file.record(&decl, source, build_function(&decl, source, &types));
                }
                "method_declaration" => {
                    file.record(&decl, source, build_method(&decl, source, &types));
                }
                "type_declaration" => {
                    for spec in named_children(&decl) {
                        if !matches!(spec.kind(), "type_spec" | "type_alias") {
                            if spec.has_error() {
                                file.record(&spec, source, Err(syntax_error(&spec)));
                            }
                            continue;
                        }
                        let built = if spec.has_error() {
                            Err(syntax_error(&spec))
                        } else {
                            build_type(&spec, source, &types)
                        };
                        file.record(&spec, source, built);
                    }
                }
                "const_declaration" | "var_declaration" => {
                    if value_specs(&decl)
                        .iter()
                        .flat_map(|spec| value_names(spec, source))
                        .any(is_exported)
                    {
                        file.declares_exports = true;
                    }
                }
                _ if decl.has_error() => {
                    file.record(&decl, source, Err(syntax_error(&decl)));
                }
                _ => {}
            }
        }

        Ok(file)
    }
}

impl Default for GoParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ParsedFile {
    fn record(&mut self, node: &Node, source: &str, built: Result<Option<Export>, DeclError>) {
        match built {
            Ok(Some(export)) => {
                self.declares_exports = true;
                self.exports.push(export);
            }
            Ok(None) => {}
            Err(error) => {
                let name = skipped_name(node, source);
                if !is_method(node) && name.as_deref().is_some_and(is_exported) {
                    self.declares_exports = true;
                }
                self.skipped.push(SkippedDecl {
                    name: name.unwrap_or_else(|| node.kind().to_string()),
                    line: node_line(node),
                    error,
                });
            }
        }
    }
}

fn is_method(node: &Node) -> bool {
    node.kind() == "method_declaration"
}

fn skipped_name(node: &Node, source: &str) -> Option<String> {
    let name = declared_name(node, source).ok()?;
    if is_method(node) {
        let receiver = receiver_text(node, source).unwrap_or("?");
        return Some(format!("{}.{}", receiver, name));
    }
    Some(name.to_string())
}

fn package_name(root: &Node, source: &str) -> Result<String, ParseError> {
    let broken = || ParseError::Syntax {
        line: first_error_line(root),
    };
    let Some(clause) = named_children(root)
        .into_iter()
        .find(|n| n.kind() == "package_clause")
    else {
        return Err(if root.has_error() {
            broken()
        } else {
            ParseError::MissingPackage
        });
    };
    if clause.has_error() {
        return Err(ParseError::Syntax {
            line: first_error_line(&clause),
        });
    }
    named_children(&clause)
        .into_iter()
        .find(|n| n.kind() == "package_identifier")
        .map(|n| node_text(&n, source).to_string())
        .ok_or_else(broken)
}

fn syntax_error(node: &Node) -> DeclError {
    DeclError::Syntax {
        line: first_error_line(node),
    }
}

// Grouped declarations may wrap their specs in a `*_spec_list`.
fn value_specs<'t>(decl: &Node<'t>) -> Vec<Node<'t>> {
    let mut specs = Vec::new();
    for child in named_children(decl) {
        match child.kind() {
            "const_spec" | "var_spec" => specs.push(child),
            "var_spec_list" | "const_spec_list" => specs.extend(
                named_children(&child)
                    .into_iter()
                    .filter(|n| matches!(n.kind(), "const_spec" | "var_spec")),
            ),
            _ => {}
        }
    }
    specs
}

fn first_error_line(root: &Node) -> usize {
    let mut stack = vec![*root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return node_line(&node);
        }
        if node.has_error() {
            let mut children = named_children(&node);
            if children.is_empty() {
                let mut cursor = node.walk();
                children = node.children(&mut cursor).collect();
            }
            children.reverse();
            stack.extend(children);
        }
    }
    node_line(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> ParsedFile {
        GoParser::new().parse_file(source).unwrap()
    }

    fn ids(file: &ParsedFile) -> Vec<String> {
        file.exports.iter().map(Export::id).collect()
    }

    #[test]
    fn test_collects_exported_surface() {
        let file = parse(
            r#"package client

import (
	"context"
	"net/http"
)

type Client struct {
	HTTP *http.Client
	base string
}

type Option func(*Client)

type Alias = Client

func New(opts ...Option) *Client { return nil }

func (c *Client) Get(ctx context.Context, url string) (*http.Response, error) {
	return nil, nil
}

func (c *Client) reset() {}

func helper() {}
"#,
        );

        assert_eq!(file.package, "client");
        assert!(file.declares_exports);
        assert!(file.skipped.is_empty());
        assert_eq!(
            ids(&file),
            vec!["Client", "Option", "Alias", "New", "Client.Get"]
        );
        assert_eq!(
            file.exports[4].to_string(),
            "func (*Client) Get(context.Context, string) (*http.Response, error)"
        );
        assert_eq!(file.exports[2].to_string(), "type Alias = Client");
    }

    #[test]
    fn test_constants_alone_mark_file_as_exporting() {
        let file = parse("package p\n\nconst (\n\tMaxSize = 10\n\tminSize = 1\n)\n");
        assert!(file.exports.is_empty());
        assert!(file.declares_exports);

        let file = parse("package p\n\nvar internal = 3\n");
        assert!(!file.declares_exports);
    }

    #[test]
    fn test_unresolvable_declaration_is_skipped_not_fatal() {
        let file = parse(
            "package p\n\nfunc Broken(x undeclared.Type) {}\n\nfunc Fine() int { return 1 }\n",
        );
        assert_eq!(ids(&file), vec!["Fine"]);
        assert_eq!(file.skipped.len(), 1);
        assert_eq!(file.skipped[0].name, "Broken");
        assert_eq!(file.skipped[0].line, 3);
        assert_eq!(
            file.skipped[0].error,
            DeclError::ImportNotFound {
                alias: "undeclared".to_string()
            }
        );
    }

    #[test]
    fn test_syntax_error_skips_only_the_declaration() {
        let file = parse("package p\n\nfunc Good() int { return 1 }\n\nfunc Broken( {\n");
        assert_eq!(file.package, "p");
        assert!(ids(&file).contains(&"Good".to_string()));
        assert!(!ids(&file).contains(&"Broken".to_string()));
        assert!(
            file.skipped
                .iter()
                .any(|s| matches!(s.error, DeclError::Syntax { .. }))
        );
    }

    #[test]
    fn test_generic_alias_does_not_reject_the_file() {
        let file = parse("package p\n\nfunc F() {}\n\ntype A[T any] = []T\n");
        assert!(ids(&file).contains(&"F".to_string()));
    }

    #[test]
    fn test_broken_or_missing_package_clause_rejects_file() {
        let parser = GoParser::new();
        let err = parser.parse_file("package\n\nfunc F() {}\n").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));

        let err = parser.parse_file("func F() {}\n").unwrap_err();
        assert!(matches!(err, ParseError::MissingPackage));
    }

    #[test]
    fn test_external_test_package() {
        let file = parse("package client_test\n\nfunc TestX() {}\n");
        assert!(file.is_external_test());
        assert!(!parse("package client\n").is_external_test());
    }
}
