//! Declarative matcher configuration
//!
//! ```toml
//! [components]
//! tags = ["Box", "styled.*"]
//! props = ["color", "bg*"]      # empty or missing = every prop
//!
//! [functions]
//! names = ["css", "cva"]
//! max_args = 1
//!
//! [tagged_templates]
//! names = ["css", "styled.*"]
//! ```
//!
//! Every list holds glob patterns compiled with globset. A section that is
//! absent disables its extraction category.

use super::{ComponentMatcher, FunctionMatcher, Matchers, TaggedTemplateMatcher};
use crate::box_model::NodeRef;
use crate::error::{ExtractError, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;
use tree_sitter::Node;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    #[serde(default)]
    pub components: Option<ComponentRules>,
    #[serde(default)]
    pub functions: Option<FunctionRules>,
    #[serde(default)]
    pub tagged_templates: Option<TaggedTemplateRules>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComponentRules {
    pub tags: Vec<String>,
    #[serde(default)]
    pub props: Vec<String>,
    /// Accept namespaced names such as `styled.div`
    #[serde(default = "default_true")]
    pub factories: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FunctionRules {
    pub names: Vec<String>,
    #[serde(default)]
    pub props: Vec<String>,
    /// Only the first `max_args` positional arguments are resolved
    #[serde(default)]
    pub max_args: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaggedTemplateRules {
    pub names: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl MatcherConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        debug!("Loaded matcher config from {}", path.display());
        Self::from_toml_str(&content)
    }

    /// Compile every glob list once, up front
    pub fn compile(&self) -> Result<CompiledMatchers> {
        let components = self
            .components
            .as_ref()
            .map(|rules| -> Result<CompiledComponents> {
                Ok(CompiledComponents {
                    tags: NamePatterns::compile(&rules.tags)?,
                    props: NamePatterns::compile(&rules.props)?,
                    factories: rules.factories,
                })
            })
            .transpose()?;

        let functions = self
            .functions
            .as_ref()
            .map(|rules| -> Result<CompiledFunctions> {
                Ok(CompiledFunctions {
                    names: NamePatterns::compile(&rules.names)?,
                    props: NamePatterns::compile(&rules.props)?,
                    max_args: rules.max_args,
                })
            })
            .transpose()?;

        let tagged_templates = self
            .tagged_templates
            .as_ref()
            .map(|rules| -> Result<CompiledTaggedTemplates> {
                Ok(CompiledTaggedTemplates {
                    names: NamePatterns::compile(&rules.names)?,
                })
            })
            .transpose()?;

        Ok(CompiledMatchers {
            components,
            functions,
            tagged_templates,
        })
    }
}

/// Glob list over names; an empty list accepts every name
#[derive(Debug, Clone)]
struct NamePatterns {
    set: Option<GlobSet>,
}

impl NamePatterns {
    fn compile(patterns: &[String]) -> Result<Self> {
        if patterns.is_empty() {
            return Ok(Self { set: None });
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern).map_err(|source| ExtractError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|source| ExtractError::InvalidPattern {
            pattern: patterns.join(","),
            source,
        })?;
        Ok(Self { set: Some(set) })
    }

    fn is_match(&self, name: &str) -> bool {
        self.set.as_ref().is_none_or(|set| set.is_match(name))
    }
}

#[derive(Debug, Clone)]
struct CompiledComponents {
    tags: NamePatterns,
    props: NamePatterns,
    factories: bool,
}

#[derive(Debug, Clone)]
struct CompiledFunctions {
    names: NamePatterns,
    props: NamePatterns,
    max_args: Option<usize>,
}

#[derive(Debug, Clone)]
struct CompiledTaggedTemplates {
    names: NamePatterns,
}

/// Glob matchers ready to be queried by the engine
#[derive(Debug, Clone)]
pub struct CompiledMatchers {
    components: Option<CompiledComponents>,
    functions: Option<CompiledFunctions>,
    tagged_templates: Option<CompiledTaggedTemplates>,
}

impl CompiledMatchers {
    /// Matcher groups for one extraction call; absent sections stay disabled
    pub fn as_matchers(&self) -> Matchers<'_> {
        Matchers {
            components: self
                .components
                .as_ref()
                .map(|c| c as &dyn ComponentMatcher),
            functions: self
                .functions
                .as_ref()
                .map(|f| f as &dyn FunctionMatcher),
            tagged_templates: self
                .tagged_templates
                .as_ref()
                .map(|t| t as &dyn TaggedTemplateMatcher),
        }
    }
}

impl ComponentMatcher for CompiledComponents {
    fn match_tag(&self, _element: Node<'_>, name: &str, is_factory: bool) -> bool {
        if is_factory && !self.factories {
            return false;
        }
        self.tags.is_match(name)
    }

    fn match_prop(
        &self,
        _element: Node<'_>,
        _element_name: &str,
        prop_name: &str,
        _prop: &NodeRef,
    ) -> bool {
        self.props.is_match(prop_name)
    }
}

impl FunctionMatcher for CompiledFunctions {
    fn match_fn(&self, _call: Node<'_>, fn_name: &str) -> bool {
        self.names.is_match(fn_name)
    }

    fn match_prop(&self, _call: Node<'_>, _fn_name: &str, prop_name: &str, _prop: &NodeRef) -> bool {
        self.props.is_match(prop_name)
    }

    fn match_arg(&self, _call: Node<'_>, _fn_name: &str, _arg: Node<'_>, index: usize) -> bool {
        self.max_args.is_none_or(|max| index < max)
    }
}

impl TaggedTemplateMatcher for CompiledTaggedTemplates {
    fn match_tagged_template(&self, _template: Node<'_>, fn_name: &str) -> bool {
        self.names.is_match(fn_name)
    }
}
