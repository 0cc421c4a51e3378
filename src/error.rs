use thiserror::Error;

/// Failures around the extraction core: grammar loading, parsing, configuration
///
/// The traversal itself never fails on a parsed tree; resolver failures are
/// surfaced through the resolver's own error type instead of this enum.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Grammar error: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("Parser produced no tree for {0}")]
    ParseFailed(String),

    #[error("Unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("Invalid matcher pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid matcher config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
