//! Stock resolver: literals, object/array literals, conditionals, const bindings
//!
//! Anything beyond local, syntactically evident values (function calls,
//! imports, runtime state) comes back as `Unresolvable`.

use super::{ArgumentFilter, SourceContext, ValueResolver};
use crate::box_model::{BoxNode, MapBox, NodeRef, PropMap, Scalar};
use crate::syntax::{
    first_named_child, named_children, parse_number, unescape, unquote, unwrap_expression,
};
use std::convert::Infallible;
use tracing::trace;
use tree_sitter::Node;

/// How many `const` indirections are followed before giving up
const MAX_BINDING_DEPTH: usize = 8;

/// How deeply expressions nest before the rest is left unresolved
const MAX_EXPRESSION_DEPTH: usize = 64;

/// Recursion budget of one evaluation
#[derive(Debug, Clone, Copy, Default)]
struct Depth {
    nesting: usize,
    bindings: usize,
}

impl Depth {
    fn nested(self) -> Option<Self> {
        (self.nesting < MAX_EXPRESSION_DEPTH).then_some(Self {
            nesting: self.nesting + 1,
            ..self
        })
    }

    fn through_binding(self) -> Option<Self> {
        (self.bindings < MAX_BINDING_DEPTH).then_some(Self {
            bindings: self.bindings + 1,
            ..self
        })
    }
}

type PropFilter<'f> = Option<&'f dyn Fn(&str, &NodeRef) -> bool>;

#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralResolver;

impl LiteralResolver {
    pub fn new() -> Self {
        Self
    }

    fn eval<'tree>(
        &self,
        node: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
        depth: Depth,
    ) -> BoxNode {
        let node_ref = ctx.node_ref(node);
        let Some(depth) = depth.nested() else {
            trace!("Expression nesting limit reached at line {}", node_ref.line);
            return BoxNode::unresolvable(node_ref, stack.to_vec());
        };
        let literal = |value: Scalar| BoxNode::literal(value, ctx.node_ref(node), stack.to_vec());

        match node.kind() {
            "string" => match unescape(unquote(ctx.text(node))) {
                Some(text) => literal(Scalar::String(text)),
                None => BoxNode::unresolvable(node_ref, stack.to_vec()),
            },
            "number" => match parse_number(ctx.text(node)) {
                Some(n) => literal(Scalar::Number(n)),
                None => BoxNode::unresolvable(node_ref, stack.to_vec()),
            },
            "true" => literal(Scalar::Boolean(true)),
            "false" => literal(Scalar::Boolean(false)),
            "null" => literal(Scalar::Null),
            "undefined" => literal(Scalar::Undefined),
            "template_string" => self.template(node, stack, ctx, depth),

            "parenthesized_expression"
            | "as_expression"
            | "satisfies_expression"
            | "non_null_expression"
            | "jsx_expression" => match first_named_child(node) {
                Some(inner) => self.eval(inner, &descend(stack, node_ref), ctx, depth),
                None => BoxNode::unresolvable(node_ref, stack.to_vec()),
            },
            // `<T>value`: the expression is the last named child
            "type_assertion" => match named_children(node).last() {
                Some(inner) => self.eval(*inner, &descend(stack, node_ref), ctx, depth),
                None => BoxNode::unresolvable(node_ref, stack.to_vec()),
            },

            "unary_expression" => self.unary(node, stack, ctx, depth),
            "binary_expression" => self.binary(node, stack, ctx, depth),
            "ternary_expression" => {
                let inner = descend(stack, node_ref.clone());
                let (Some(condition), Some(consequence), Some(alternative)) = (
                    node.child_by_field_name("condition"),
                    node.child_by_field_name("consequence"),
                    node.child_by_field_name("alternative"),
                ) else {
                    return BoxNode::unresolvable(node_ref, stack.to_vec());
                };
                BoxNode::conditional(
                    ctx.node_ref(condition),
                    vec![
                        self.eval(consequence, &inner, ctx, depth),
                        self.eval(alternative, &inner, ctx, depth),
                    ],
                    node_ref,
                    stack.to_vec(),
                )
            }

            "object" => BoxNode::Object(self.object(node, stack, ctx, depth, None)),
            "array" => self.array(node, stack, ctx, depth),

            "identifier" => self.identifier(node, ctx.text(node), stack, ctx, depth),
            "member_expression" => {
                let (Some(object), Some(property)) = (
                    node.child_by_field_name("object"),
                    node.child_by_field_name("property"),
                ) else {
                    return BoxNode::unresolvable(node_ref, stack.to_vec());
                };
                if property.kind() != "property_identifier" {
                    return BoxNode::unresolvable(node_ref, stack.to_vec());
                }
                let target = self.eval(object, &descend(stack, node_ref.clone()), ctx, depth);
                member(&target, &Scalar::String(ctx.text(property).to_string()))
                    .unwrap_or_else(|| BoxNode::unresolvable(node_ref, stack.to_vec()))
            }
            "subscript_expression" => {
                let (Some(object), Some(index)) = (
                    node.child_by_field_name("object"),
                    node.child_by_field_name("index"),
                ) else {
                    return BoxNode::unresolvable(node_ref, stack.to_vec());
                };
                let inner = descend(stack, node_ref.clone());
                let target = self.eval(object, &inner, ctx, depth);
                let key = self.eval(index, &inner, ctx, depth);
                key.as_scalar()
                    .and_then(|key| member(&target, key))
                    .unwrap_or_else(|| BoxNode::unresolvable(node_ref, stack.to_vec()))
            }

            _ => {
                trace!("Unresolvable {} at line {}", node.kind(), node_ref.line);
                BoxNode::unresolvable(node_ref, stack.to_vec())
            }
        }
    }

    fn identifier<'tree>(
        &self,
        node: Node<'tree>,
        name: &str,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
        depth: Depth,
    ) -> BoxNode {
        let node_ref = ctx.node_ref(node);
        if name == "undefined" {
            return BoxNode::literal(Scalar::Undefined, node_ref, stack.to_vec());
        }
        let Some(depth) = depth.through_binding() else {
            return BoxNode::unresolvable(node_ref, stack.to_vec());
        };
        match ctx.binding(name, node) {
            Some(value) => self.eval(value, &descend(stack, node_ref), ctx, depth),
            None => BoxNode::unresolvable(node_ref, stack.to_vec()),
        }
    }

    fn unary<'tree>(
        &self,
        node: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
        depth: Depth,
    ) -> BoxNode {
        let node_ref = ctx.node_ref(node);
        let (Some(operator), Some(argument)) = (
            node.child_by_field_name("operator"),
            node.child_by_field_name("argument"),
        ) else {
            return BoxNode::unresolvable(node_ref, stack.to_vec());
        };

        let value = self.eval(argument, &descend(stack, node_ref.clone()), ctx, depth);
        let folded = match (operator.kind(), value.as_scalar()) {
            ("-", Some(Scalar::Number(n))) => Some(Scalar::Number(-n)),
            ("+", Some(Scalar::Number(n))) => Some(Scalar::Number(*n)),
            ("!", Some(scalar)) => Some(Scalar::Boolean(!scalar.is_truthy())),
            _ => None,
        };
        match folded {
            Some(scalar) => BoxNode::literal(scalar, node_ref, stack.to_vec()),
            None => BoxNode::unresolvable(node_ref, stack.to_vec()),
        }
    }

    fn binary<'tree>(
        &self,
        node: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
        depth: Depth,
    ) -> BoxNode {
        let node_ref = ctx.node_ref(node);
        let (Some(operator), Some(left), Some(right)) = (
            node.child_by_field_name("operator"),
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) else {
            return BoxNode::unresolvable(node_ref, stack.to_vec());
        };
        let inner = descend(stack, node_ref.clone());

        match operator.kind() {
            // `cond && value`: value applies only when the guard holds
            "&&" => BoxNode::conditional(
                ctx.node_ref(left),
                vec![self.eval(right, &inner, ctx, depth)],
                node_ref,
                stack.to_vec(),
            ),
            "||" | "??" => BoxNode::conditional(
                ctx.node_ref(left),
                vec![
                    self.eval(left, &inner, ctx, depth),
                    self.eval(right, &inner, ctx, depth),
                ],
                node_ref,
                stack.to_vec(),
            ),
            "+" => {
                let lhs = self.eval(left, &inner, ctx, depth);
                let rhs = self.eval(right, &inner, ctx, depth);
                let sum = match (lhs.as_scalar(), rhs.as_scalar()) {
                    (Some(Scalar::Number(a)), Some(Scalar::Number(b))) => {
                        Some(Scalar::Number(a + b))
                    }
                    (Some(a @ Scalar::String(_)), Some(b)) | (Some(a), Some(b @ Scalar::String(_))) => {
                        Some(Scalar::String(format!("{}{}", a.to_key(), b.to_key())))
                    }
                    _ => None,
                };
                match sum {
                    Some(scalar) => BoxNode::literal(scalar, node_ref, stack.to_vec()),
                    None => BoxNode::unresolvable(node_ref, stack.to_vec()),
                }
            }
            _ => BoxNode::unresolvable(node_ref, stack.to_vec()),
        }
    }

    /// Evaluate an object literal; `filter` gates its keys when the caller
    /// classifies the object as an already-filtered map
    fn object<'tree>(
        &self,
        node: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
        depth: Depth,
        filter: PropFilter<'_>,
    ) -> MapBox {
        let node_ref = ctx.node_ref(node);
        let inner = descend(stack, node_ref.clone());
        let accepts = |name: &str, value: &BoxNode| filter.is_none_or(|f| f(name, value.node()));

        let mut entries = PropMap::new();
        let mut conditions = Vec::new();

        for child in named_children(node) {
            match child.kind() {
                "pair" => {
                    let (Some(key), Some(value)) = (
                        child.child_by_field_name("key"),
                        child.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    let Some(name) = self.property_key(key, &inner, ctx, depth) else {
                        continue;
                    };
                    let value = self.eval(value, &descend(&inner, ctx.node_ref(child)), ctx, depth);
                    if accepts(&name, &value) {
                        entries.insert(name, value);
                    }
                }
                "shorthand_property_identifier" => {
                    let name = ctx.text(child);
                    let value = self.identifier(child, name, &inner, ctx, depth);
                    if accepts(name, &value) {
                        entries.insert(name.to_string(), value);
                    }
                }
                "spread_element" => {
                    let Some(target) = first_named_child(child) else {
                        continue;
                    };
                    let spread = self.eval(target, &descend(&inner, ctx.node_ref(child)), ctx, depth);
                    match spread {
                        BoxNode::Map(map) | BoxNode::Object(map) => {
                            for (name, value) in map.entries {
                                if accepts(&name, &value) {
                                    entries.insert(name, value);
                                }
                            }
                            conditions.extend(map.spread_conditions);
                        }
                        BoxNode::Conditional(conditional) => conditions.push(conditional),
                        BoxNode::Literal(_) | BoxNode::List(_) | BoxNode::Unresolvable(_) => {}
                    }
                }
                // methods, accessors
                _ => {}
            }
        }

        MapBox::new(entries, node_ref, stack.to_vec()).with_spread_conditions(conditions)
    }

    fn property_key<'tree>(
        &self,
        key: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
        depth: Depth,
    ) -> Option<String> {
        match key.kind() {
            "property_identifier" => Some(ctx.text(key).to_string()),
            "string" => unescape(unquote(ctx.text(key))),
            "number" => parse_number(ctx.text(key)).map(|n| Scalar::Number(n).to_key()),
            "computed_property_name" => {
                let inner = first_named_child(key)?;
                self.eval(inner, stack, ctx, depth)
                    .as_scalar()
                    .map(Scalar::to_key)
            }
            _ => None,
        }
    }

    fn array<'tree>(
        &self,
        node: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
        depth: Depth,
    ) -> BoxNode {
        let node_ref = ctx.node_ref(node);
        let inner = descend(stack, node_ref.clone());
        let mut items = Vec::new();

        for child in named_children(node) {
            if child.kind() != "spread_element" {
                items.push(self.eval(child, &inner, ctx, depth));
                continue;
            }
            let Some(target) = first_named_child(child) else {
                continue;
            };
            match self.eval(target, &inner, ctx, depth) {
                BoxNode::List(list) => items.extend(list.items),
                _ => items.push(BoxNode::unresolvable(ctx.node_ref(child), inner.clone())),
            }
        }

        BoxNode::list(items, node_ref, stack.to_vec())
    }

    /// Template literal: raw text between substitutions, substitutions folded
    /// when every one of them resolves to a scalar
    fn template<'tree>(
        &self,
        node: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
        depth: Depth,
    ) -> BoxNode {
        let node_ref = ctx.node_ref(node);
        let inner = descend(stack, node_ref.clone());
        let source = ctx.source();

        // skip the backticks
        let mut cursor_byte = node.start_byte() + 1;
        let end_byte = node.end_byte().saturating_sub(1);
        let mut out = String::new();

        for child in named_children(node) {
            if child.kind() != "template_substitution" {
                continue;
            }
            out.push_str(source.get(cursor_byte..child.start_byte()).unwrap_or_default());
            let value = first_named_child(child)
                .map(|expr| self.eval(expr, &inner, ctx, depth))
                .and_then(|value| value.as_scalar().map(Scalar::to_key));
            match value {
                Some(text) => out.push_str(&text),
                None => return BoxNode::unresolvable(node_ref, stack.to_vec()),
            }
            cursor_byte = child.end_byte();
        }
        out.push_str(source.get(cursor_byte..end_byte).unwrap_or_default());

        BoxNode::literal(Scalar::String(out), node_ref, stack.to_vec())
    }
}

impl ValueResolver for LiteralResolver {
    type Error = Infallible;

    fn resolve_expression<'tree>(
        &self,
        node: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
    ) -> Result<BoxNode, Self::Error> {
        Ok(self.eval(node, stack, ctx, Depth::default()))
    }

    fn resolve_attribute_value<'tree>(
        &self,
        attribute: Node<'tree>,
        ctx: &SourceContext<'tree>,
    ) -> Result<Option<BoxNode>, Self::Error> {
        let children = named_children(attribute);
        let Some(name) = children.first() else {
            return Ok(None);
        };
        let attribute_ref = ctx.node_ref(attribute);

        // `<Box disabled />`
        let Some(value) = children.get(1).copied() else {
            return Ok(Some(BoxNode::literal(
                Scalar::Boolean(true),
                ctx.node_ref(*name),
                vec![attribute_ref],
            )));
        };

        let resolved = match value.kind() {
            // JSX attribute strings are not escape-processed
            "string" => Some(BoxNode::literal(
                Scalar::String(unquote(ctx.text(value)).to_string()),
                ctx.node_ref(value),
                vec![attribute_ref],
            )),
            "jsx_expression" => first_named_child(value).map(|inner| {
                let stack = vec![attribute_ref, ctx.node_ref(value)];
                self.eval(inner, &stack, ctx, Depth::default())
            }),
            _ => None,
        };

        Ok(resolved.filter(|value| !value.is_unresolvable()))
    }

    fn resolve_arguments<'tree>(
        &self,
        call: Node<'tree>,
        ctx: &SourceContext<'tree>,
        filter: &ArgumentFilter<'_>,
    ) -> Result<Vec<BoxNode>, Self::Error> {
        let Some(arguments) = call.child_by_field_name("arguments") else {
            return Ok(Vec::new());
        };
        let stack = vec![ctx.node_ref(call)];

        let boxes = named_children(arguments)
            .into_iter()
            .enumerate()
            .map(|(index, argument)| {
                if !(filter.match_arg)(argument, index) {
                    return BoxNode::unresolvable(ctx.node_ref(argument), stack.clone());
                }
                let unwrapped = unwrap_expression(argument);
                if unwrapped.kind() == "object" {
                    BoxNode::Map(self.object(unwrapped, &stack, ctx, Depth::default(), Some(filter.match_prop)))
                } else {
                    self.eval(argument, &stack, ctx, Depth::default())
                }
            })
            .collect();

        Ok(boxes)
    }

    fn resolve_template<'tree>(
        &self,
        template: Node<'tree>,
        stack: &[NodeRef],
        ctx: &SourceContext<'tree>,
    ) -> Result<BoxNode, Self::Error> {
        Ok(self.template(template, stack, ctx, Depth::default()))
    }
}

fn descend(stack: &[NodeRef], node: NodeRef) -> Vec<NodeRef> {
    let mut next = stack.to_vec();
    next.push(node);
    next
}

/// `target[key]` over an already resolved box
fn member(target: &BoxNode, key: &Scalar) -> Option<BoxNode> {
    match target {
        BoxNode::Map(map) | BoxNode::Object(map) => map.get(&key.to_key()).cloned(),
        BoxNode::List(list) => match key {
            Scalar::Number(n) if *n >= 0.0 && n.fract() == 0.0 => list.items.get(*n as usize).cloned(),
            _ => None,
        },
        BoxNode::Literal(_) | BoxNode::Conditional(_) | BoxNode::Unresolvable(_) => None,
    }
}
