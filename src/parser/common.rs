use tree_sitter::Node;

/// Source text of a node. Tree-sitter works on the same `&str` we hand it,
/// so byte ranges always fall on char boundaries.
pub fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// 1-based line of a node, for diagnostics.
pub fn node_line(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Strip the quotes from an interpreted (`"..."`) or raw (`` `...` ``) string literal.
pub fn unquote(literal: &str) -> &str {
    literal.trim_matches('"').trim_matches('`')
}

/// Named children of a node, collected so callers don't juggle cursors.
pub fn named_children<'t>(node: &Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// Children bound to a grammar field, e.g. every `name` of `a, b int`.
pub fn field_children<'t>(node: &Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

/// True if the node has an anonymous child token with the given text, like `*` or `<-`.
pub fn has_token(node: &Node, token: &str) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .any(|child| !child.is_named() && child.kind() == token)
}

/// Macro to define a thread-local parser with a given language.
/// Usage: `define_parser!(PARSER_NAME, language_fn)`
#[macro_export]
macro_rules! define_parser {
    ($name:ident, $language:expr) => {
        thread_local! {
            static $name: std::cell::RefCell<Option<tree_sitter::Parser>> = std::cell::RefCell::new({
                let mut parser = tree_sitter::Parser::new();
                parser.set_language(&$language.into()).ok().map(|_| parser)
            });
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"net/http\""), "net/http");
        assert_eq!(unquote("`net/http`"), "net/http");
    }
}
