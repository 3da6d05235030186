//! Turns function, method and type declarations into export records.

use super::DeclError;
use super::common::{field_children, named_children, node_text};
use super::types::TypeResolver;
use crate::model::{Export, FuncSignature, TypeParam, TypeSignature, is_exported};
use tree_sitter::Node;

/// Build the export for a `function_declaration`.
///
/// Returns `Ok(None)` when the function is not exported.
pub fn build_function(
    node: &Node,
    source: &str,
    types: &TypeResolver,
) -> Result<Option<Export>, DeclError> {
    let name = declared_name(node, source)?;
    if !is_exported(name) {
        return Ok(None);
    }

    Ok(Some(Export::Func(FuncSignature {
        name: name.to_string(),
        receiver: None,
        type_params: type_params(node, types)?,
        sig: types.resolve_signature(node)?,
    })))
}

/// Build the export for a `method_declaration`.
///
/// Returns `Ok(None)` when the method or its receiver's base type is not exported.
pub fn build_method(
    node: &Node,
    source: &str,
    types: &TypeResolver,
) -> Result<Option<Export>, DeclError> {
    let name = declared_name(node, source)?;
    if !is_exported(name) {
        return Ok(None);
    }

    let receiver_list = node
        .child_by_field_name("receiver")
        .ok_or_else(|| DeclError::malformed(node))?;
    let receiver_decl = named_children(&receiver_list)
        .into_iter()
        .find(|child| child.kind() == "parameter_declaration")
        .ok_or_else(|| DeclError::malformed(&receiver_list))?;
    let receiver_type = receiver_decl
        .child_by_field_name("type")
        .ok_or_else(|| DeclError::malformed(&receiver_decl))?;

    let receiver = types.resolve(&receiver_type)?;
    if !receiver.base_name().is_some_and(is_exported) {
        return Ok(None);
    }

    Ok(Some(Export::Func(FuncSignature {
        name: name.to_string(),
        receiver: Some(receiver),
        type_params: Vec::new(),
        sig: types.resolve_signature(node)?,
    })))
}

/// Build the export for a `type_spec` (`type A B`) or `type_alias` (`type A = B`).
///
/// Returns `Ok(None)` when the type is not exported.
pub fn build_type(
    node: &Node,
    source: &str,
    types: &TypeResolver,
) -> Result<Option<Export>, DeclError> {
    let name = declared_name(node, source)?;
    if !is_exported(name) {
        return Ok(None);
    }

    let underlying = node
        .child_by_field_name("type")
        .ok_or_else(|| DeclError::malformed(node))?;

    Ok(Some(Export::Type(TypeSignature {
        name: name.to_string(),
        alias: node.kind() == "type_alias",
        type_params: type_params(node, types)?,
        underlying: types.resolve(&underlying)?,
    })))
}

/// Receiver type of a method as written, without resolving imports.
/// Used to name a skipped method in diagnostics.
pub fn receiver_text<'a>(node: &Node, source: &'a str) -> Option<&'a str> {
    let list = node.child_by_field_name("receiver")?;
    let decl = named_children(&list)
        .into_iter()
        .find(|child| child.kind() == "parameter_declaration")?;
    let ty = decl.child_by_field_name("type")?;
    Some(node_text(&ty, source).trim_start_matches('*'))
}

pub fn declared_name<'a>(node: &Node, source: &'a str) -> Result<&'a str, DeclError> {
    node.child_by_field_name("name")
        .map(|name| node_text(&name, source))
        .ok_or_else(|| DeclError::malformed(node))
}

/// Names declared by a `const_spec` / `var_spec`.
pub fn value_names<'a>(node: &Node, source: &'a str) -> Vec<&'a str> {
    field_children(node, "name")
        .iter()
        .map(|name| node_text(name, source))
        .collect()
}

fn type_params(node: &Node, types: &TypeResolver) -> Result<Vec<TypeParam>, DeclError> {
    match node.child_by_field_name("type_parameters") {
        Some(list) => types.resolve_type_params(&list),
        None => Ok(Vec::new()),
    }
}
