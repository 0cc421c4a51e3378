//! Append-only per-name value history

use super::{BoxNode, MapBox, PropMap};
use indexmap::IndexMap;
use serde::Serialize;

/// Every value contributed under each name, in source order
///
/// Entries are only ever appended; nothing is overwritten or re-ordered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropIndex {
    entries: IndexMap<String, Vec<BoxNode>>,
}

impl PropIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: BoxNode) {
        self.entries.entry(name.into()).or_default().push(value);
    }

    /// Fold the entries of an object-shaped box into the index
    ///
    /// Entries rejected by `filter` are skipped. Callers holding a `Map` that
    /// was already filtered upstream pass an accept-all filter; callers holding
    /// a freshly evaluated `Object` pass the real predicate. Returns the
    /// accepted entries so callers can reuse them without evaluating the
    /// predicate again.
    pub fn fold<F>(&mut self, map: &MapBox, mut filter: F) -> PropMap
    where
        F: FnMut(&str, &BoxNode) -> bool,
    {
        let mut accepted = PropMap::new();
        for (name, value) in &map.entries {
            if !filter(name, value) {
                continue;
            }
            self.push(name.clone(), value.clone());
            accepted.insert(name.clone(), value.clone());
        }
        accepted
    }

    pub fn get(&self, name: &str) -> &[BoxNode] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[BoxNode])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
