//! Source dialect detection and tree-sitter parser setup

use crate::error::{ExtractError, Result};
use std::path::Path;
use tracing::debug;
use tree_sitter::{Language, Parser, Tree};

/// Grammar used to parse a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// TypeScript with JSX; also parses plain JavaScript/JSX
    Tsx,
    /// TypeScript without JSX (`<T>expr` casts are ambiguous with markup)
    TypeScript,
}

impl Dialect {
    /// Detect dialect from file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "tsx" | "jsx" | "js" | "mjs" | "cjs" => Ok(Dialect::Tsx),
            "ts" | "mts" | "cts" => Ok(Dialect::TypeScript),
            _ => Err(ExtractError::UnsupportedExtension(extension)),
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }

    pub fn language(self) -> Language {
        match self {
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        }
    }
}

/// Parse source text with the grammar for `dialect`
pub fn parse_source(source: &str, dialect: Dialect) -> Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&dialect.language())?;
    debug!("Parsing {} bytes as {:?}", source.len(), dialect);
    parser
        .parse(source, None)
        .ok_or_else(|| ExtractError::ParseFailed(format!("{:?} source", dialect)))
}

/// Read and parse a file, picking the grammar from its extension
pub fn parse_file(path: &Path) -> Result<(String, Tree)> {
    let dialect = Dialect::from_path(path)?;
    let source = std::fs::read_to_string(path)?;
    let tree = parse_source(&source, dialect).map_err(|e| match e {
        ExtractError::ParseFailed(_) => ExtractError::ParseFailed(path.display().to_string()),
        other => other,
    })?;
    Ok((source, tree))
}
