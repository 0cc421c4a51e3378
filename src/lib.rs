// box-extractor - static extraction of style values from TSX/JSX sources
//!
//! Walks a tree-sitter syntax tree once and collects, for every matched
//! component, function call and tagged template, the statically resolvable
//! values handed to it. Values are kept as boxes: literal, list, map,
//! object, conditional or unresolvable, each carrying its source location
//! and the chain of nodes that led to it.

pub mod box_model;
pub mod cli;
pub mod error;
pub mod extract;
pub mod language; // Dialect detection and parser setup
pub mod matchers;
pub mod resolver;
pub mod syntax;


// Re-export common types
pub use box_model::{BoxNode, ConditionalBox, MapBox, NodeRef, PropIndex, PropMap, Scalar};
pub use error::{ExtractError, Result};
pub use extract::{EntryKind, ExtractionResult, InstanceQuery, QueryKind, ResultEntry, extract};
pub use language::{Dialect, parse_file, parse_source};
pub use matchers::{
    CompiledMatchers, ComponentMatcher, FunctionMatcher, MatcherConfig, Matchers,
    TaggedTemplateMatcher,
};
pub use resolver::{ArgumentFilter, LiteralResolver, SourceContext, ValueResolver};
