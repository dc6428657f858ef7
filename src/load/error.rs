use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("failed to read env file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed line {line_number} in '{path}': {reason}: {line:?}")]
    MalformedLine {
        path: PathBuf,
        line_number: usize,
        line: String,
        reason: LineError,
    },

    #[error("undeclared variable '{name}' referenced by '{key}'")]
    UndeclaredVariable { name: String, key: String },

    #[error("circular reference: {}", chain.join(" -> "))]
    CircularReference { chain: Vec<String> },
}

/// Reason a single line could not be split into a key and a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum LineError {
    #[error("missing '=' separator")]
    MissingSeparator,

    #[error("empty key")]
    EmptyKey,

    #[error("unterminated quoted value")]
    UnterminatedQuote,

    #[error("unexpected characters after closing quote")]
    TrailingCharacters,

    #[error("NUL byte in line")]
    NulByte,
}
