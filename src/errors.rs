//! Error types for configuration loading and artifact generation.

use std::io;
use std::path::PathBuf;

use astgen_grammar::GrammarError;
use miette::Diagnostic;
use thiserror::Error;

/// Failure while loading configuration, loading the grammar or writing artifacts.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Grammar(#[from] GrammarError),

    #[error("failed to parse configuration `{path}`: {source}")]
    #[diagnostic(
        code(astgen::config::parse),
        help("configuration keys: namespace, root_class, token_type, indent_width, header_comment, value_types, integral_types, enum_types, runtime, text, classification")
    )]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to read `{path}`: {source}")]
    #[diagnostic(code(astgen::io::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write `{path}`: {source}")]
    #[diagnostic(code(astgen::io::write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unknown artifact `{name}`")]
    #[diagnostic(code(astgen::artifact::unknown), help("known artifacts: {known}"))]
    UnknownArtifact { name: String, known: String },
}

pub type GenerateResult<T> = Result<T, GenerateError>;
