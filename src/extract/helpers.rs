//! Name computation and node classification for the visitor

use crate::syntax::{first_named_child, named_children, node_text};
use tree_sitter::Node;

/// `<Box>` / `<Box />`; fragments have no name and never match
pub(super) fn is_element_opening(node: Node<'_>) -> bool {
    matches!(node.kind(), "jsx_opening_element" | "jsx_self_closing_element")
}

/// Imports and re-exports (`export { a }`, `export * from "x"`) are never
/// descended; exported declarations and `export default <expr>` are
pub(super) fn is_pruned(node: Node<'_>) -> bool {
    match node.kind() {
        "import_statement" => true,
        "export_statement" => {
            node.child_by_field_name("source").is_some()
                || named_children(node)
                    .iter()
                    .any(|child| child.kind() == "export_clause")
        }
        _ => false,
    }
}

/// Full element name, `Namespace.Member` included
pub fn element_name<'s>(element: Node<'_>, source: &'s str) -> Option<&'s str> {
    element
        .child_by_field_name("name")
        .map(|name| node_text(name, source))
        .filter(|name| !name.is_empty())
}

/// Callee text of a call expression (`css`, `styled.div`, `cva`)
pub fn callee_name<'s>(call: Node<'_>, source: &'s str) -> Option<&'s str> {
    call.child_by_field_name("function")
        .map(|function| node_text(function, source))
}

/// Tag of a tagged template; a call tag (`styled("a")`) resolves to its callee
pub fn tag_name<'s>(template_call: Node<'_>, source: &'s str) -> Option<&'s str> {
    let tag = template_call.child_by_field_name("function")?;
    if tag.kind() == "call_expression" {
        return callee_name(tag, source);
    }
    Some(node_text(tag, source))
}

/// Template literal of a tagged template call, `None` for ordinary calls
pub(super) fn tagged_template<'tree>(call: Node<'tree>) -> Option<Node<'tree>> {
    call.child_by_field_name("arguments")
        .filter(|arguments| arguments.kind() == "template_string")
}

/// Attribute name, including namespaced names (`xlink:href`)
pub(super) fn attribute_name<'s>(attribute: Node<'_>, source: &'s str) -> Option<&'s str> {
    first_named_child(attribute).map(|name| node_text(name, source))
}

/// Expression spread by a `{...expr}` attribute
pub(super) fn spread_attribute_target<'tree>(node: Node<'tree>) -> Option<Node<'tree>> {
    let spread = first_named_child(node).filter(|child| child.kind() == "spread_element")?;
    first_named_child(spread)
}

/// Element-opening node that owns an attribute or spread attribute
pub(super) fn owning_element<'tree>(attribute: Node<'tree>) -> Option<Node<'tree>> {
    attribute.parent().filter(|parent| is_element_opening(*parent))
}
