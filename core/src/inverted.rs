use crate::dictionary::Dictionary;
use crate::frequency::TermFrequencies;
use crate::stopwords::StopwordSet;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Term -> ascending, duplicate-free list of documents containing it.
///
/// Entries are kept in dictionary id order; stopwords have no entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvertedIndex {
    entries: Vec<(String, Vec<DocId>)>,
    lookup: HashMap<String, usize>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, term: &str, docs: Vec<DocId>) {
        self.lookup.insert(term.to_string(), self.entries.len());
        self.entries.push((term.to_string(), docs));
    }

    pub fn get(&self, term: &str) -> Option<&[DocId]> {
        self.lookup.get(term).map(|&i| self.entries[i].1.as_slice())
    }

    pub fn contains(&self, term: &str) -> bool {
        self.lookup.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DocId])> {
        self.entries.iter().map(|(term, docs)| (term.as_str(), docs.as_slice()))
    }
}

pub fn build_inverted_index(dictionary: &Dictionary, tables: &[TermFrequencies], stopwords: &StopwordSet) -> InvertedIndex {
    let mut index = InvertedIndex::new();
    for (id, term) in dictionary.iter() {
        if stopwords.matches(term) {
            continue;
        }
        // scanning tables in order keeps the list ascending and unique
        let docs: Vec<DocId> = tables
            .iter()
            .enumerate()
            .filter(|(_, table)| table.contains(id))
            .map(|(doc, _)| doc as DocId)
            .collect();
        index.insert(term, docs);
    }
    tracing::debug!(terms = index.len(), excluded = dictionary.len() - index.len(), "built inverted index");
    index
}
