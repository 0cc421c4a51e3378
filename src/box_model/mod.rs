//! Box value model
//!
//! A `BoxNode` is a partially evaluated expression: either a resolved scalar,
//! a structure of further boxes, a conditional whose branches stay unresolved,
//! or an explicit `Unresolvable` marker. Every box remembers the node it came
//! from plus the ancestor stack the resolver walked to reach it.
//!
//! - **node_ref**: owned provenance handles for tree-sitter nodes
//! - **prop_index**: the append-only per-name history and its fold primitive

mod node_ref;
mod prop_index;

pub use node_ref::NodeRef;
pub use prop_index::PropIndex;

use indexmap::IndexMap;
use serde::Serialize;

/// Ordered mapping of property name to box, in source order
pub type PropMap = IndexMap<String, BoxNode>;

/// Guard recorded against a map that came from a conditionally spread object
pub type SpreadCondition = ConditionalBox;

/// Statically known scalar value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// JavaScript truthiness of the scalar
    pub fn is_truthy(&self) -> bool {
        match self {
            Scalar::String(s) => !s.is_empty(),
            Scalar::Number(n) => *n != 0.0 && !n.is_nan(),
            Scalar::Boolean(b) => *b,
            Scalar::Null | Scalar::Undefined => false,
        }
    }

    /// String form used when a scalar becomes an object key or is concatenated
    pub fn to_key(&self) -> String {
        match self {
            Scalar::String(s) => s.clone(),
            Scalar::Number(n) if n.fract() == 0.0 && n.is_finite() => format!("{}", *n as i64),
            Scalar::Number(n) => n.to_string(),
            Scalar::Boolean(b) => b.to_string(),
            Scalar::Null => "null".to_string(),
            Scalar::Undefined => "undefined".to_string(),
        }
    }
}

/// Tagged union over every shape a statically extracted value can take
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum BoxNode {
    Literal(LiteralBox),
    List(ListBox),
    /// Entries already classified (and filtered) by an upstream path
    Map(MapBox),
    /// Entries produced by evaluating an object expression, never filtered
    Object(MapBox),
    Conditional(ConditionalBox),
    Unresolvable(UnresolvableBox),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiteralBox {
    pub value: Scalar,
    pub node: NodeRef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<NodeRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListBox {
    pub items: Vec<BoxNode>,
    pub node: NodeRef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<NodeRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapBox {
    pub entries: PropMap,
    pub node: NodeRef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<NodeRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub spread_conditions: Vec<SpreadCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionalBox {
    /// Expression that decides which branch applies (`cond` in `cond && x`)
    pub guard: NodeRef,
    pub branches: Vec<BoxNode>,
    pub node: NodeRef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<NodeRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvableBox {
    pub node: NodeRef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stack: Vec<NodeRef>,
}

impl MapBox {
    pub fn new(entries: PropMap, node: NodeRef, stack: Vec<NodeRef>) -> Self {
        Self {
            entries,
            node,
            stack,
            spread_conditions: Vec::new(),
        }
    }

    /// Attach the guards of conditionally spread objects that fed this map
    pub fn with_spread_conditions(mut self, conditions: Vec<SpreadCondition>) -> Self {
        self.spread_conditions.extend(conditions);
        self
    }

    pub fn get(&self, name: &str) -> Option<&BoxNode> {
        self.entries.get(name)
    }
}

impl BoxNode {
    pub fn literal(value: Scalar, node: NodeRef, stack: Vec<NodeRef>) -> Self {
        BoxNode::Literal(LiteralBox { value, node, stack })
    }

    pub fn list(items: Vec<BoxNode>, node: NodeRef, stack: Vec<NodeRef>) -> Self {
        BoxNode::List(ListBox { items, node, stack })
    }

    pub fn map(entries: PropMap, node: NodeRef, stack: Vec<NodeRef>) -> Self {
        BoxNode::Map(MapBox::new(entries, node, stack))
    }

    pub fn conditional(
        guard: NodeRef,
        branches: Vec<BoxNode>,
        node: NodeRef,
        stack: Vec<NodeRef>,
    ) -> Self {
        BoxNode::Conditional(ConditionalBox {
            guard,
            branches,
            node,
            stack,
        })
    }

    pub fn unresolvable(node: NodeRef, stack: Vec<NodeRef>) -> Self {
        BoxNode::Unresolvable(UnresolvableBox { node, stack })
    }

    /// Node the value was produced from
    pub fn node(&self) -> &NodeRef {
        match self {
            BoxNode::Literal(b) => &b.node,
            BoxNode::List(b) => &b.node,
            BoxNode::Map(b) | BoxNode::Object(b) => &b.node,
            BoxNode::Conditional(b) => &b.node,
            BoxNode::Unresolvable(b) => &b.node,
        }
    }

    /// Ancestor nodes walked to reach the value
    pub fn stack(&self) -> &[NodeRef] {
        match self {
            BoxNode::Literal(b) => &b.stack,
            BoxNode::List(b) => &b.stack,
            BoxNode::Map(b) | BoxNode::Object(b) => &b.stack,
            BoxNode::Conditional(b) => &b.stack,
            BoxNode::Unresolvable(b) => &b.stack,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            BoxNode::Literal(_) => "literal",
            BoxNode::List(_) => "list",
            BoxNode::Map(_) => "map",
            BoxNode::Object(_) => "object",
            BoxNode::Conditional(_) => "conditional",
            BoxNode::Unresolvable(_) => "unresolvable",
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            BoxNode::Literal(b) => Some(&b.value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    /// Object-shaped boxes, whether classified (`Map`) or freshly evaluated (`Object`)
    pub fn as_map(&self) -> Option<&MapBox> {
        match self {
            BoxNode::Map(b) | BoxNode::Object(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&ListBox> {
        match self {
            BoxNode::List(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_conditional(&self) -> Option<&ConditionalBox> {
        match self {
            BoxNode::Conditional(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_unresolvable(&self) -> bool {
        matches!(self, BoxNode::Unresolvable(_))
    }
}
