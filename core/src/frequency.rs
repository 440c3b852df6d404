use crate::dictionary::Dictionary;
use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Sparse term-id -> count table for one document. Every stored count is >= 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFrequencies {
    counts: HashMap<TermId, u32>,
}

impl TermFrequencies {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, id: TermId) {
        *self.counts.entry(id).or_insert(0) += 1;
    }

    /// `None` when the term does not occur in this document.
    pub fn get(&self, id: TermId) -> Option<u32> {
        self.counts.get(&id).copied()
    }

    pub fn contains(&self, id: TermId) -> bool {
        self.counts.contains_key(&id)
    }

    /// Number of distinct terms.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts, i.e. the document length in tokens.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TermId, u32)> + '_ {
        self.counts.iter().map(|(&id, &count)| (id, count))
    }
}

/// One table per document, in document order.
pub fn build_frequency_tables<S: AsRef<str>>(dictionary: &Dictionary, texts: &[Vec<S>]) -> Vec<TermFrequencies> {
    texts
        .iter()
        .enumerate()
        .map(|(doc, text)| {
            let mut table = TermFrequencies::new();
            for term in text {
                let term: &str = term.as_ref();
                match dictionary.id_of(term) {
                    Some(id) => table.add(id),
                    None => tracing::warn!(doc, term, "term missing from dictionary"),
                }
            }
            table
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_per_document() {
        let texts = vec![vec!["a", "b", "a"], vec!["b"], vec![]];
        let d = Dictionary::build(&texts);
        let tables = build_frequency_tables(&d, &texts);
        assert_eq!(tables.len(), 3);
        let a = d.id_of("a").unwrap();
        let b = d.id_of("b").unwrap();
        assert_eq!(tables[0].get(a), Some(2));
        assert_eq!(tables[0].get(b), Some(1));
        assert_eq!(tables[0].total(), 3);
        assert_eq!(tables[1].get(a), None);
        assert!(tables[2].is_empty());
    }

    #[test]
    fn counts_are_never_zero() {
        let texts = vec![vec!["x", "y", "x", "z"], vec!["z", "z"]];
        let d = Dictionary::build(&texts);
        for table in build_frequency_tables(&d, &texts) {
            assert!(table.iter().all(|(_, c)| c > 0));
        }
    }
}
