use crate::tokenizer::{Span, Tokenizer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Term -> occurrence spans for one document, spans in order of appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentPositions {
    spans: HashMap<String, Vec<Span>>,
}

impl DocumentPositions {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, term: String, span: Span) {
        self.spans.entry(term).or_default().push(span);
    }

    /// `None` when the term does not occur in this document; never an empty slice.
    pub fn get(&self, term: &str) -> Option<&[Span]> {
        self.spans.get(term).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Span])> {
        self.spans.iter().map(|(term, spans)| (term.as_str(), spans.as_slice()))
    }
}

/// Scans each raw document with the position-aware tokenizer.
pub fn build_positional_index<T: Tokenizer, D: AsRef<str>>(tokenizer: &T, documents: &[D]) -> Vec<DocumentPositions> {
    documents
        .iter()
        .map(|doc| {
            let mut positions = DocumentPositions::new();
            for token in tokenizer.tokens(doc.as_ref()) {
                positions.push(token.term, token.span);
            }
            positions
        })
        .collect()
}
