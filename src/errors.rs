// Error types for dictionary compilation and feature computation.
//
// Compilation failures abort the whole dictionary build. Per-document
// failures are a separate, cheap `DocumentError` so a batch can record them
// in place without losing the other documents' vectors.

use std::path::PathBuf;

/// Result type defaulting to [`LiwcError`].
pub type Result<T, E = LiwcError> = std::result::Result<T, E>;

/// Everything that can go wrong while building or using a LIWC dictionary.
#[derive(Debug, thiserror::Error)]
pub enum LiwcError {
    /// The raw dictionary file is missing and no cache artifact exists.
    #[error("LIWC dictionary not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The language tag has no dictionary file mapping.
    #[error("unsupported LIWC language tag '{0}' (supported: eng, span)")]
    UnsupportedLanguage(String),

    /// A line of the raw dictionary does not have the expected shape.
    #[error("malformed LIWC dictionary at line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Tables assembled outside the parser disagree with each other.
    #[error("inconsistent LIWC dictionary tables: {0}")]
    InvalidTables(String),

    /// A cache artifact could not be decoded or does not match its source.
    #[error("unreadable dictionary cache {}: {reason}", .path.display())]
    Deserialization { path: PathBuf, reason: String },

    /// Any other filesystem failure.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl LiwcError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LiwcError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(line: usize, reason: impl Into<String>) -> Self {
        LiwcError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

/// Failure to compute a vector for one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// Normalization divides by the token count, so at least one token is required.
    #[error("document has no tokens")]
    EmptyDocument,
}
