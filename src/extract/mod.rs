//! Single-pass extraction engine
//!
//! One pre-order walk of the syntax tree dispatches per node kind and fills
//! two running tables: the per-name `ResultEntry` table and the arena of
//! per-element instance states. A second, separate pass reconciles the arena
//! into finalized component instances, because an element's prop set is only
//! complete once its whole subtree has been visited.
//!
//! - **context**: the traversal state owned by one extraction call
//! - **visitor**: the walk and the per-node-kind handlers
//! - **reconcile**: the post-traversal finalization pass
//! - **helpers**: name computation and node classification

mod context;
mod helpers;
mod reconcile;
mod visitor;

pub use helpers::{callee_name, element_name, tag_name};

use crate::box_model::{BoxNode, PropIndex};
use crate::matchers::Matchers;
use crate::resolver::{SourceContext, ValueResolver};
use context::ExtractionState;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;
use tree_sitter::Tree;
use visitor::Visitor;

/// What kind of syntax site a result entry was first registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Component,
    Function,
}

/// What kind of syntax site produced one instance query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueryKind {
    Component,
    CallExpression,
    TaggedTemplate,
}

/// One finalized occurrence of a matched element, call or template
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceQuery {
    pub kind: QueryKind,
    pub name: String,
    #[serde(rename = "box")]
    pub value: BoxNode,
}

/// Everything extracted for one matched name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultEntry {
    pub kind: EntryKind,
    pub props: PropIndex,
    pub queries: Vec<InstanceQuery>,
}

impl ResultEntry {
    pub fn new(kind: EntryKind) -> Self {
        Self {
            kind,
            props: PropIndex::new(),
            queries: Vec::new(),
        }
    }
}

/// Matched name → result entry, in first-match order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    entries: IndexMap<String, ResultEntry>,
}

impl ExtractionResult {
    pub fn get(&self, name: &str) -> Option<&ResultEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResultEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of instance queries across all names
    pub fn query_count(&self) -> usize {
        self.entries.values().map(|e| e.queries.len()).sum()
    }
}

impl From<IndexMap<String, ResultEntry>> for ExtractionResult {
    fn from(entries: IndexMap<String, ResultEntry>) -> Self {
        Self { entries }
    }
}

/// Extract every matched element, call and tagged template from `tree`
///
/// All state lives in this call; concurrent extractions of different files
/// share nothing. Resolver errors are returned unchanged.
pub fn extract<R>(
    tree: &Tree,
    source: &str,
    matchers: &Matchers<'_>,
    resolver: &R,
) -> Result<ExtractionResult, R::Error>
where
    R: ValueResolver,
{
    if matchers.is_empty() {
        debug!("No matcher groups configured, nothing to extract");
        return Ok(ExtractionResult::default());
    }

    let ctx = SourceContext::new(tree, source);
    let mut state = ExtractionState::new();
    Visitor::new(&ctx, matchers, resolver, &mut state).walk(tree.root_node())?;

    let result = reconcile::reconcile(state);
    debug!(
        "Extracted {} names, {} instances",
        result.len(),
        result.query_count()
    );
    Ok(result)
}
