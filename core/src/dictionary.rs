use crate::TermId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bidirectional term <-> id mapping with dense ids.
///
/// Ids are handed out in first-seen order: documents in index order, then
/// tokens in document order. Rebuilding from the same input therefore
/// always yields the same ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dictionary {
    ids: HashMap<String, TermId>,
    terms: Vec<String>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build<S: AsRef<str>>(texts: &[Vec<S>]) -> Self {
        let mut dictionary = Self::new();
        for text in texts {
            for term in text {
                dictionary.intern(term.as_ref());
            }
        }
        dictionary
    }

    fn intern(&mut self, term: &str) -> TermId {
        if let Some(&id) = self.ids.get(term) {
            return id;
        }
        let id = self.terms.len() as TermId;
        self.ids.insert(term.to_string(), id);
        self.terms.push(term.to_string());
        id
    }

    pub fn id_of(&self, term: &str) -> Option<TermId> {
        self.ids.get(term).copied()
    }

    pub fn term_of(&self, id: TermId) -> Option<&str> {
        self.terms.get(id as usize).map(String::as_str)
    }

    pub fn contains(&self, term: &str) -> bool {
        self.ids.contains_key(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// `(id, term)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TermId, &str)> {
        self.terms.iter().enumerate().map(|(id, term)| (id as TermId, term.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(docs: &[&str]) -> Vec<Vec<String>> {
        docs.iter().map(|d| d.split_whitespace().map(String::from).collect()).collect()
    }

    #[test]
    fn first_seen_order_across_documents() {
        let d = Dictionary::build(&texts(&["the cat sat", "the dog sat", "cat and dog play"]));
        let order: Vec<&str> = d.iter().map(|(_, t)| t).collect();
        assert_eq!(order, vec!["the", "cat", "sat", "dog", "and", "play"]);
        assert_eq!(d.id_of("dog"), Some(3));
        assert_eq!(d.term_of(5), Some("play"));
    }

    #[test]
    fn ids_are_dense_and_bijective() {
        let d = Dictionary::build(&texts(&["a b a c", "c d"]));
        assert_eq!(d.len(), 4);
        for (id, term) in d.iter() {
            assert_eq!(d.id_of(term), Some(id));
            assert_eq!(d.term_of(id), Some(term));
        }
        assert_eq!(d.term_of(4), None);
        assert_eq!(d.id_of("zzz"), None);
    }

    #[test]
    fn empty_corpus() {
        let d = Dictionary::build::<String>(&[]);
        assert!(d.is_empty());
        let d = Dictionary::build(&texts(&["", ""]));
        assert!(d.is_empty());
    }
}
