//! Read-only lookups over a built [`IndexBundle`].
//!
//! Every lookup returns a typed [`Error`] for missing keys so callers can tell
//! "unknown term", "stopword", "not in this document" and "no such document"
//! apart. Nothing here formats text for users.

use crate::bundle::IndexBundle;
use crate::error::{Error, Result};
use crate::tokenizer::Span;
use crate::DocId;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentOccurrence {
    pub doc: DocId,
    pub frequency: u32,
    pub positions: Vec<Span>,
}

/// Everything known about one indexed term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermReport {
    pub term: String,
    pub documents: Vec<DocId>,
    pub occurrences: Vec<DocumentOccurrence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexEntry {
    pub term: String,
    pub documents: Vec<DocId>,
}

/// Inverted-index entries, plus requested terms that have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexListing {
    pub entries: Vec<IndexEntry>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct QueryService<'a> {
    bundle: &'a IndexBundle,
}

impl<'a> QueryService<'a> {
    pub fn new(bundle: &'a IndexBundle) -> Self {
        Self { bundle }
    }

    /// Inverted-index entry for `term`. Stopwords fail even when they occur in documents.
    pub fn documents_containing(&self, term: &str) -> Result<&'a [DocId]> {
        if let Some(docs) = self.bundle.inverted().get(term) {
            return Ok(docs);
        }
        if self.bundle.dictionary().contains(term) && self.bundle.stopwords().matches(term) {
            Err(Error::StopwordExcluded(term.to_string()))
        } else {
            Err(Error::TermNotFound(term.to_string()))
        }
    }

    pub fn frequency_of(&self, term: &str, doc: DocId) -> Result<u32> {
        let table = &self.bundle.frequencies()[self.document_slot(doc)?];
        let id = self.bundle.dictionary().id_of(term).ok_or_else(|| Error::TermNotFound(term.to_string()))?;
        table.get(id).ok_or_else(|| Error::TermNotInDocument { term: term.to_string(), doc })
    }

    pub fn positions_of(&self, term: &str, doc: DocId) -> Result<&'a [Span]> {
        let positions = &self.bundle.positions()[self.document_slot(doc)?];
        if !self.bundle.dictionary().contains(term) {
            return Err(Error::TermNotFound(term.to_string()));
        }
        positions.get(term).ok_or_else(|| Error::TermNotInDocument { term: term.to_string(), doc })
    }

    /// Document list, then frequency and positions per document. All or nothing.
    pub fn describe_term(&self, term: &str) -> Result<TermReport> {
        let documents = self.documents_containing(term)?;
        let occurrences = documents
            .iter()
            .map(|&doc| {
                Ok(DocumentOccurrence {
                    doc,
                    frequency: self.frequency_of(term, doc)?,
                    positions: self.positions_of(term, doc)?.to_vec(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(TermReport { term: term.to_string(), documents: documents.to_vec(), occurrences })
    }

    /// The whole inverted index in dictionary order.
    pub fn listing(&self) -> IndexListing {
        let entries = self
            .bundle
            .inverted()
            .iter()
            .map(|(term, docs)| IndexEntry { term: term.to_string(), documents: docs.to_vec() })
            .collect();
        IndexListing { entries, missing: Vec::new() }
    }

    /// Entries for `terms` in the given order; terms without an entry go to `missing`.
    pub fn listing_for<S: AsRef<str>>(&self, terms: &[S]) -> IndexListing {
        let mut listing = IndexListing::default();
        for term in terms {
            let term = term.as_ref();
            match self.bundle.inverted().get(term) {
                Some(docs) => listing.entries.push(IndexEntry { term: term.to_string(), documents: docs.to_vec() }),
                None => listing.missing.push(term.to_string()),
            }
        }
        listing
    }

    fn document_slot(&self, doc: DocId) -> Result<usize> {
        let len = self.bundle.num_documents();
        let slot = doc as usize;
        if slot < len {
            Ok(slot)
        } else {
            Err(Error::DocumentOutOfRange { doc, len })
        }
    }
}
