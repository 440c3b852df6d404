//! Error type for lookups and extractor parameters.

use crate::DocId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The term occurs in no document of the corpus.
    #[error("term '{0}' does not occur in any document")]
    TermNotFound(String),

    /// The term occurs in the corpus but is a stopword, so it has no inverted-index entry.
    #[error("term '{0}' is a stopword and is excluded from the inverted index")]
    StopwordExcluded(String),

    /// The term is known to the corpus but does not occur in this document.
    #[error("term '{term}' does not occur in document {doc}")]
    TermNotInDocument { term: String, doc: DocId },

    #[error("document {doc} is out of range (corpus has {len} documents)")]
    DocumentOutOfRange { doc: DocId, len: usize },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// True for every "absent key" condition, false for rejected parameters.
    pub fn is_not_found(&self) -> bool {
        !matches!(self, Error::InvalidParameter(_))
    }
}
