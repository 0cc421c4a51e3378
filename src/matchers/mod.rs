//! Matcher protocol
//!
//! The engine asks three independent, caller-supplied predicate groups which
//! elements, calls and tagged templates are of interest. A missing group turns
//! the whole extraction category off.
//!
//! - **config**: declarative, glob-based matchers loaded from TOML

pub mod config;

pub use config::{
    CompiledMatchers, ComponentRules, FunctionRules, MatcherConfig, TaggedTemplateRules,
};

use crate::box_model::NodeRef;
use tree_sitter::Node;

/// Predicates for markup elements and their attributes
pub trait ComponentMatcher {
    /// `is_factory` is set for namespaced names such as `styled.div`
    fn match_tag(&self, element: Node<'_>, name: &str, is_factory: bool) -> bool;

    fn match_prop(&self, element: Node<'_>, element_name: &str, prop_name: &str, prop: &NodeRef)
    -> bool;
}

/// Predicates for call expressions and their arguments
pub trait FunctionMatcher {
    fn match_fn(&self, call: Node<'_>, fn_name: &str) -> bool;

    fn match_prop(&self, call: Node<'_>, fn_name: &str, prop_name: &str, prop: &NodeRef) -> bool;

    /// Gate for positional arguments; rejected arguments become `Unresolvable`
    fn match_arg(&self, _call: Node<'_>, _fn_name: &str, _arg: Node<'_>, _index: usize) -> bool {
        true
    }
}

/// Predicate for tagged template invocations
pub trait TaggedTemplateMatcher {
    fn match_tagged_template(&self, template: Node<'_>, fn_name: &str) -> bool;
}

/// The matcher groups handed to one extraction call
#[derive(Clone, Copy, Default)]
pub struct Matchers<'m> {
    pub components: Option<&'m dyn ComponentMatcher>,
    pub functions: Option<&'m dyn FunctionMatcher>,
    pub tagged_templates: Option<&'m dyn TaggedTemplateMatcher>,
}

impl<'m> Matchers<'m> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_components(mut self, matcher: &'m dyn ComponentMatcher) -> Self {
        self.components = Some(matcher);
        self
    }

    pub fn with_functions(mut self, matcher: &'m dyn FunctionMatcher) -> Self {
        self.functions = Some(matcher);
        self
    }

    pub fn with_tagged_templates(mut self, matcher: &'m dyn TaggedTemplateMatcher) -> Self {
        self.tagged_templates = Some(matcher);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_none() && self.functions.is_none() && self.tagged_templates.is_none()
    }
}

/// Whether a matched name uses a namespace separator (`Namespace.Member`)
pub fn is_factory_name(name: &str) -> bool {
    name.contains('.')
}
