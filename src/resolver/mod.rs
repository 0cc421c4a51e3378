//! Single-node value resolution
//!
//! The engine never evaluates expressions itself: it hands attribute values,
//! spread targets, call arguments and template literals to a `ValueResolver`
//! and folds whatever boxes come back. `LiteralResolver` is the stock
//! implementation; callers with richer evaluation (cross-file bindings, theme
//! tokens) plug in their own.

mod literal;

pub use literal::LiteralResolver;

use crate::box_model::{BoxNode, MapBox, NodeRef};
use crate::syntax::node_text;
use std::collections::HashMap;
use std::sync::Arc;
use tree_sitter::{Node, Tree};

/// Read-only view of the file being extracted, shared with the resolver
pub struct SourceContext<'tree> {
    source: &'tree str,
    shared: Arc<str>,
    declarations: HashMap<&'tree str, Vec<Declaration<'tree>>>,
}

/// One name introduced into a scope
#[derive(Debug, Clone, Copy)]
struct Declaration<'tree> {
    /// Node id of the scope the name lives in
    scope: usize,
    /// Initializer, only for `const name = value`
    value: Option<Node<'tree>>,
}

impl<'tree> SourceContext<'tree> {
    pub fn new(tree: &'tree Tree, source: &'tree str) -> Self {
        let declarations = collect_declarations(tree.root_node(), source);
        Self {
            source,
            shared: Arc::from(source),
            declarations,
        }
    }

    pub fn source(&self) -> &'tree str {
        self.source
    }

    pub fn text(&self, node: Node<'_>) -> &'tree str {
        node_text(node, self.source)
    }

    pub fn node_ref(&self, node: Node<'_>) -> NodeRef {
        NodeRef::new(node, &self.shared)
    }

    /// Initializer of the `const` that `name` refers to at `reference`
    ///
    /// Scopes are searched from the reference outwards; the nearest one that
    /// declares `name` decides. `None` when that declaration is not a `const`
    /// with an initializer, when the scope declares the name more than once,
    /// or when no enclosing scope declares it.
    pub fn binding(&self, name: &str, reference: Node<'_>) -> Option<Node<'tree>> {
        let declarations = self.declarations.get(name)?;
        let mut current = Some(reference);

        while let Some(node) = current {
            if is_scope(node.kind()) {
                let mut in_scope = declarations.iter().filter(|d| d.scope == node.id());
                if let Some(declaration) = in_scope.next() {
                    if in_scope.next().is_some() {
                        return None;
                    }
                    return declaration.value;
                }
            }
            current = node.parent();
        }
        None
    }
}

fn is_scope(kind: &str) -> bool {
    is_function_scope(kind)
        || matches!(
            kind,
            "statement_block" | "class_body" | "for_statement" | "for_in_statement" | "switch_body"
        )
}

/// Scopes that own `var` declarations and parameters
fn is_function_scope(kind: &str) -> bool {
    matches!(
        kind,
        "program"
            | "function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "generator_function_declaration"
            | "arrow_function"
            | "method_definition"
    )
}

fn enclosing_scope(node: Node<'_>, function_level: bool) -> Option<usize> {
    let mut current = node.parent();
    while let Some(parent) = current {
        let kind = parent.kind();
        if is_function_scope(kind) || (!function_level && is_scope(kind)) {
            return Some(parent.id());
        }
        current = parent.parent();
    }
    None
}

/// Every variable declarator and parameter in the file, grouped by name
///
/// Only `const name = value` keeps its initializer. `let`, `var`,
/// destructured names, loop variables and parameters are recorded so that
/// they shadow outer bindings.
fn collect_declarations<'tree>(
    root: Node<'tree>,
    source: &'tree str,
) -> HashMap<&'tree str, Vec<Declaration<'tree>>> {
    let mut declarations = HashMap::new();
    let mut cursor = root.walk();

    loop {
        let node = cursor.node();
        match node.kind() {
            "variable_declarator" => {
                if let (Some(name), Some(declaration)) =
                    (node.child_by_field_name("name"), node.parent())
                {
                    let is_var = declaration.kind() == "variable_declaration";
                    let is_const = declaration
                        .child_by_field_name("kind")
                        .is_some_and(|kind| kind.kind() == "const");
                    let value = node
                        .child_by_field_name("value")
                        .filter(|_| is_const && name.kind() == "identifier");
                    if let Some(scope) = enclosing_scope(declaration, is_var) {
                        declare(&mut declarations, source, name, scope, value);
                    }
                }
            }
            "formal_parameters" => {
                if let Some(function) = node.parent() {
                    declare(&mut declarations, source, node, function.id(), None);
                }
            }
            // `x => ...`
            "arrow_function" => {
                if let Some(parameter) = node.child_by_field_name("parameter") {
                    declare(&mut declarations, source, parameter, node.id(), None);
                }
            }
            // `for (const x of xs)`
            "for_in_statement" => {
                if let Some(left) = node.child_by_field_name("left") {
                    declare(&mut declarations, source, left, node.id(), None);
                }
            }
            _ => {}
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return declarations;
            }
        }
    }
}

fn declare<'tree>(
    declarations: &mut HashMap<&'tree str, Vec<Declaration<'tree>>>,
    source: &'tree str,
    pattern: Node<'tree>,
    scope: usize,
    value: Option<Node<'tree>>,
) {
    for identifier in binding_identifiers(pattern) {
        declarations
            .entry(node_text(identifier, source))
            .or_default()
            .push(Declaration { scope, value });
    }
}

/// Identifiers bound by a declarator name, loop variable or parameter list,
/// looking through destructuring patterns
fn binding_identifiers(pattern: Node<'_>) -> Vec<Node<'_>> {
    let mut found = Vec::new();
    let mut pending = vec![pattern];

    while let Some(node) = pending.pop() {
        match node.kind() {
            "identifier" | "shorthand_property_identifier_pattern" => found.push(node),
            "required_parameter" | "optional_parameter" => {
                pending.extend(node.child_by_field_name("pattern"));
            }
            "assignment_pattern" | "object_assignment_pattern" => {
                pending.extend(node.child_by_field_name("left"));
            }
            "pair_pattern" => pending.extend(node.child_by_field_name("value")),
            "type_annotation" => {}
            _ => {
                let mut cursor = node.walk();
                pending.extend(node.named_children(&mut cursor));
            }
        }
    }
    found
}

/// Argument gates for one matched call
pub struct ArgumentFilter<'f> {
    /// Applied to the keys of object-literal arguments
    pub match_prop: &'f dyn Fn(&str, &NodeRef) -> bool,
    /// Applied to every positional argument with its index
    pub match_arg: &'f dyn Fn(Node<'_>, usize) -> bool,
}

/// Turns single syntax nodes into boxes
///
/// Implementations must not fail on syntactically valid input: a value that
/// cannot be determined statically is `BoxNode::Unresolvable` (or `None` for
/// attributes). `Error` exists for resolvers backed by fallible services; the
/// engine returns it to the caller unchanged.
pub trait ValueResolver {
    type Error;

    /// Evaluate an arbitrary expression (spread targets go through here)
    fn resolve_expression<'tree>(
        &self,
        node: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
    ) -> Result<BoxNode, Self::Error>;

    /// Value of a `jsx_attribute`; `None` means the attribute contributes nothing
    fn resolve_attribute_value<'tree>(
        &self,
        attribute: Node<'tree>,
        ctx: &SourceContext<'tree>,
    ) -> Result<Option<BoxNode>, Self::Error>;

    /// Positional arguments of a call, already gated by `filter`
    fn resolve_arguments<'tree>(
        &self,
        call: Node<'tree>,
        ctx: &SourceContext<'tree>,
        filter: &ArgumentFilter<'_>,
    ) -> Result<Vec<BoxNode>, Self::Error>;

    fn resolve_template<'tree>(
        &self,
        template: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
    ) -> Result<BoxNode, Self::Error>;

    /// Object-to-map conversion: the ordered entries of `source` as a fresh
    /// map whose provenance is `node`
    fn to_map(&self, source: &MapBox, node: &NodeRef) -> MapBox {
        MapBox::new(source.entries.clone(), node.clone(), source.stack.clone())
    }
}
