//! Error handling types and utilities.

use std::path::PathBuf;

/// A specialized Result type for searchindex operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when loading a search-index artifact fails.
///
/// All variants are fatal: a corrupt or partially valid artifact must never
/// produce a usable index.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Artifact file could not be read.
    #[error("failed to read search index at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input looked like a loader call but the payload could not be extracted.
    #[error("malformed loader wrapper: expected `Search.setIndex({{...}})`")]
    LoaderWrapper,

    /// Payload was not a valid index object.
    #[error("malformed search index payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A parallel array does not line up with `docnames`.
    #[error("{field} has {actual} entries but there are {expected} docnames")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A posting references a document index outside `docnames`.
    #[error("term {term:?} references document #{doc_ref} but only {doc_count} documents exist")]
    DanglingDocRef {
        term: String,
        doc_ref: usize,
        doc_count: usize,
    },
}
