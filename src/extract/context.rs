//! Traversal state for one extraction call

use super::{EntryKind, ResultEntry};
use crate::box_model::{ConditionalBox, NodeRef, PropMap};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Per-element record, live from the element's opening node until reconciliation
#[derive(Debug)]
pub(super) struct ComponentInstance {
    pub name: String,
    pub node: NodeRef,
    /// Last write wins, in source order
    pub props: PropMap,
    /// Spreads whose target was conditional; kept unresolved
    pub conditionals: Vec<ConditionalBox>,
}

impl ComponentInstance {
    /// Overwrite props with `entries`, later writes replacing earlier ones
    pub fn assign(&mut self, entries: PropMap) {
        for (name, value) in entries {
            self.props.insert(name, value);
        }
    }
}

/// Result table plus the instance arena keyed by element node identity
#[derive(Debug, Default)]
pub(super) struct ExtractionState {
    pub results: IndexMap<String, ResultEntry>,
    pub instances: Vec<ComponentInstance>,
    by_node: HashMap<usize, usize>,
}

impl ExtractionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The entry for `name`, registered with `kind` if this is its first match
    pub fn ensure_entry(&mut self, name: &str, kind: EntryKind) -> &mut ResultEntry {
        self.results
            .entry(name.to_string())
            .or_insert_with(|| ResultEntry::new(kind))
    }

    /// Arena slot for the element node, created on first visit only
    pub fn ensure_instance(&mut self, node: NodeRef, name: &str) -> usize {
        if let Some(&index) = self.by_node.get(&node.id) {
            return index;
        }
        let index = self.instances.len();
        self.by_node.insert(node.id, index);
        self.instances.push(ComponentInstance {
            name: name.to_string(),
            node,
            props: PropMap::new(),
            conditionals: Vec::new(),
        });
        index
    }

    pub fn instance_index(&self, node_id: usize) -> Option<usize> {
        self.by_node.get(&node_id).copied()
    }

    /// Instance and its result entry, borrowed together
    pub fn instance_and_entry(
        &mut self,
        index: usize,
    ) -> (&mut ComponentInstance, Option<&mut ResultEntry>) {
        let instance = &mut self.instances[index];
        let entry = self.results.get_mut(&instance.name);
        (instance, entry)
    }
}
