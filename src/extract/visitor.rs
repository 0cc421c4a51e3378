//! Pre-order walk and per-node-kind handlers

use super::context::ExtractionState;
use super::helpers::{
    attribute_name, callee_name, element_name, is_pruned, owning_element,
    spread_attribute_target, tag_name, tagged_template,
};
use super::{EntryKind, InstanceQuery, QueryKind};
use crate::box_model::{BoxNode, MapBox, NodeRef, PropIndex};
use crate::matchers::{Matchers, is_factory_name};
use crate::resolver::{ArgumentFilter, SourceContext, ValueResolver};
use tracing::{debug, trace};
use tree_sitter::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Descend,
    Skip,
}

pub(super) struct Visitor<'a, 'tree, 'm, R> {
    ctx: &'a SourceContext<'tree>,
    matchers: Matchers<'m>,
    resolver: &'a R,
    state: &'a mut ExtractionState,
}

impl<'a, 'tree, 'm, R> Visitor<'a, 'tree, 'm, R>
where
    R: ValueResolver,
{
    pub fn new(
        ctx: &'a SourceContext<'tree>,
        matchers: &Matchers<'m>,
        resolver: &'a R,
        state: &'a mut ExtractionState,
    ) -> Self {
        Self {
            ctx,
            matchers: *matchers,
            resolver,
            state,
        }
    }

    /// Depth-first, pre-order; pruned nodes are visited but never descended
    pub fn walk(&mut self, root: Node<'tree>) -> Result<(), R::Error> {
        let mut cursor = root.walk();
        loop {
            let node = cursor.node();
            if self.visit(node)? == Flow::Descend && cursor.goto_first_child() {
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    return Ok(());
                }
            }
        }
    }

    fn visit(&mut self, node: Node<'tree>) -> Result<Flow, R::Error> {
        if is_pruned(node) {
            trace!("Skipping {} at line {}", node.kind(), node.start_position().row + 1);
            return Ok(Flow::Skip);
        }

        match node.kind() {
            "jsx_opening_element" | "jsx_self_closing_element" => self.visit_element(node),
            "jsx_attribute" => self.visit_attribute(node)?,
            "jsx_expression" => self.visit_spread_attribute(node)?,
            "call_expression" => match tagged_template(node) {
                Some(template) => self.visit_tagged_template(node, template)?,
                None => self.visit_call(node)?,
            },
            _ => {}
        }
        Ok(Flow::Descend)
    }

    fn visit_element(&mut self, element: Node<'tree>) {
        let Some(components) = self.matchers.components else {
            return;
        };
        let Some(name) = element_name(element, self.ctx.source()) else {
            return;
        };
        if !components.match_tag(element, name, is_factory_name(name)) {
            return;
        }

        debug!("Matched component {} at line {}", name, element.start_position().row + 1);
        self.state.ensure_entry(name, EntryKind::Component);
        self.state.ensure_instance(self.ctx.node_ref(element), name);
    }

    fn visit_attribute(&mut self, attribute: Node<'tree>) -> Result<(), R::Error> {
        let Some(components) = self.matchers.components else {
            return Ok(());
        };
        let Some(element) = owning_element(attribute) else {
            return Ok(());
        };
        let Some(index) = self.state.instance_index(element.id()) else {
            return Ok(());
        };
        let Some(prop_name) = attribute_name(attribute, self.ctx.source()) else {
            return Ok(());
        };
        let Some(value) = self.resolver.resolve_attribute_value(attribute, self.ctx)? else {
            return Ok(());
        };

        let attribute_ref = self.ctx.node_ref(attribute);
        let (instance, entry) = self.state.instance_and_entry(index);
        if !components.match_prop(element, &instance.name, prop_name, &attribute_ref) {
            return Ok(());
        }

        instance.props.insert(prop_name.to_string(), value.clone());
        if let Some(entry) = entry {
            entry.props.push(prop_name, value);
        }
        Ok(())
    }

    fn visit_spread_attribute(&mut self, node: Node<'tree>) -> Result<(), R::Error> {
        let Some(components) = self.matchers.components else {
            return Ok(());
        };
        let Some(element) = owning_element(node) else {
            return Ok(());
        };
        let Some(target) = spread_attribute_target(node) else {
            return Ok(());
        };
        let Some(index) = self.state.instance_index(element.id()) else {
            return Ok(());
        };

        let stack = [self.ctx.node_ref(node)];
        let spread = self.resolver.resolve_expression(target, &stack, self.ctx)?;
        let (instance, entry) = self.state.instance_and_entry(index);

        match spread {
            BoxNode::Conditional(conditional) => {
                trace!("Deferring conditional spread on {}", instance.name);
                instance.conditionals.push(conditional);
            }
            BoxNode::Map(source) | BoxNode::Object(source) => {
                let map = self.resolver.to_map(&source, &source.node);
                let mut orphan = PropIndex::new();
                let props = match entry {
                    Some(entry) => &mut entry.props,
                    None => &mut orphan,
                };
                let element_name = instance.name.as_str();
                let accepted = props.fold(&map, |prop, value| {
                    components.match_prop(element, element_name, prop, value.node())
                });
                instance.assign(accepted);
                instance.conditionals.extend(source.spread_conditions);
            }
            BoxNode::Literal(_) | BoxNode::List(_) | BoxNode::Unresolvable(_) => {
                trace!("Discarding non-object spread on {}", instance.name);
            }
        }
        Ok(())
    }

    fn visit_call(&mut self, call: Node<'tree>) -> Result<(), R::Error> {
        let Some(functions) = self.matchers.functions else {
            return Ok(());
        };
        let Some(name) = callee_name(call, self.ctx.source()) else {
            return Ok(());
        };
        if !functions.match_fn(call, name) {
            return Ok(());
        }

        debug!("Matched call {} at line {}", name, call.start_position().row + 1);
        let entry = self.state.ensure_entry(name, EntryKind::Function);

        let match_prop: &dyn Fn(&str, &NodeRef) -> bool =
            &|prop, node| functions.match_prop(call, name, prop, node);
        let match_arg: &dyn Fn(Node<'_>, usize) -> bool =
            &|arg, index| functions.match_arg(call, name, arg, index);
        let filter = ArgumentFilter {
            match_prop,
            match_arg,
        };
        let arguments = self.resolver.resolve_arguments(call, self.ctx, &filter)?;

        let mut items = Vec::with_capacity(arguments.len());
        for argument in arguments {
            let item = match argument {
                // Evaluated fresh: keys were never checked, filter them now
                BoxNode::Object(object) => {
                    let map = self.resolver.to_map(&object, &object.node);
                    let accepted = entry.props.fold(&map, |prop, value| {
                        functions.match_prop(call, name, prop, value.node())
                    });
                    BoxNode::Map(
                        MapBox::new(accepted, object.node, object.stack)
                            .with_spread_conditions(object.spread_conditions),
                    )
                }
                // Filtered during argument resolution: trusted as is
                BoxNode::Map(map) => {
                    let converted = self.resolver.to_map(&map, &map.node);
                    entry.props.fold(&converted, |_, _| true);
                    BoxNode::Map(map)
                }
                other @ (BoxNode::Literal(_)
                | BoxNode::List(_)
                | BoxNode::Conditional(_)
                | BoxNode::Unresolvable(_)) => other,
            };
            items.push(item);
        }

        entry.queries.push(InstanceQuery {
            kind: QueryKind::CallExpression,
            name: name.to_string(),
            value: BoxNode::list(items, self.ctx.node_ref(call), Vec::new()),
        });
        Ok(())
    }

    fn visit_tagged_template(
        &mut self,
        call: Node<'tree>,
        template: Node<'tree>,
    ) -> Result<(), R::Error> {
        let Some(matcher) = self.matchers.tagged_templates else {
            return Ok(());
        };
        let Some(name) = tag_name(call, self.ctx.source()) else {
            return Ok(());
        };
        if !matcher.match_tagged_template(call, name) {
            return Ok(());
        }

        debug!("Matched tagged template {} at line {}", name, call.start_position().row + 1);
        let entry = self.state.ensure_entry(name, EntryKind::Function);
        let value = self
            .resolver
            .resolve_template(template, &[self.ctx.node_ref(call)], self.ctx)?;
        entry.queries.push(InstanceQuery {
            kind: QueryKind::TaggedTemplate,
            name: name.to_string(),
            value,
        });
        Ok(())
    }
}
