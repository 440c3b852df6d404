//! Per-document TF-IDF keyword ranking.
//!
//! Works directly on raw documents and never touches an [`IndexBundle`](crate::IndexBundle),
//! so keywords can be extracted before, after or without a build.

use crate::error::{Error, Result};
use crate::stopwords::StopwordSet;
use crate::tokenizer::{is_ideographic, Tokenizer};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdfMode {
    /// `ln(N / df)`
    Standard,
    /// `ln(1 + N / df)`, stays positive for terms present in every document.
    #[default]
    Smoothed,
}

impl IdfMode {
    pub fn idf(self, num_docs: usize, df: usize) -> f64 {
        let ratio = num_docs as f64 / df.max(1) as f64;
        match self {
            IdfMode::Standard => ratio.ln(),
            IdfMode::Smoothed => (1.0 + ratio).ln(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordConfig {
    pub top_k: usize,
    pub idf: IdfMode,
    /// Shorter terms are never ranked. Han terms are exempt, since the tokenizer emits them one character at a time.
    pub min_term_chars: usize,
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self { top_k: 10, idf: IdfMode::default(), min_term_chars: 2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredTerm {
    pub term: String,
    pub score: f64,
}

pub struct KeywordExtractor<'a, T> {
    tokenizer: &'a T,
    config: KeywordConfig,
    stopwords: Option<StopwordSet>,
}

impl<'a, T: Tokenizer> KeywordExtractor<'a, T> {
    pub fn new(tokenizer: &'a T, config: KeywordConfig) -> Self {
        Self { tokenizer, config, stopwords: None }
    }

    /// Leave these terms out of the ranking. Without this call stopwords are ranked like any term.
    pub fn with_stopwords(mut self, stopwords: &StopwordSet) -> Self {
        self.stopwords = Some(stopwords.canonical(self.tokenizer));
        self
    }

    pub fn config(&self) -> &KeywordConfig {
        &self.config
    }

    /// Top-K terms of every document, highest score first.
    ///
    /// Equal scores keep the order in which the terms first appear in the document.
    pub fn extract_scored<D: AsRef<str>>(&self, documents: &[D]) -> Result<Vec<Vec<ScoredTerm>>> {
        if self.config.top_k == 0 {
            return Err(Error::InvalidParameter("top_k must be at least 1".into()));
        }

        let counted: Vec<Vec<(String, u32)>> = documents.iter().map(|doc| self.count_terms(doc.as_ref())).collect();
        let mut df: HashMap<&str, usize> = HashMap::new();
        for terms in &counted {
            for (term, _) in terms {
                *df.entry(term.as_str()).or_insert(0) += 1;
            }
        }
        let num_docs = counted.len();

        let ranked = counted
            .iter()
            .enumerate()
            .map(|(doc, terms)| {
                let total: u32 = terms.iter().map(|(_, count)| count).sum();
                let mut scored: Vec<ScoredTerm> = terms
                    .iter()
                    .map(|(term, count)| {
                        let tf = *count as f64 / total as f64;
                        let idf = self.config.idf.idf(num_docs, df.get(term.as_str()).copied().unwrap_or(1));
                        ScoredTerm { term: term.clone(), score: tf * idf }
                    })
                    .collect();
                scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
                scored.truncate(self.config.top_k);
                tracing::debug!(doc, candidates = terms.len(), kept = scored.len(), "ranked keywords");
                scored
            })
            .collect();
        Ok(ranked)
    }

    /// Union of every document's top-K, first-seen order, duplicates dropped.
    pub fn extract<D: AsRef<str>>(&self, documents: &[D]) -> Result<Vec<String>> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut keywords = Vec::new();
        for ranked in self.extract_scored(documents)? {
            for scored in ranked {
                if seen.insert(scored.term.clone()) {
                    keywords.push(scored.term);
                }
            }
        }
        Ok(keywords)
    }

    /// Counts in order of first appearance.
    fn count_terms(&self, text: &str) -> Vec<(String, u32)> {
        let mut counts: Vec<(String, u32)> = Vec::new();
        let mut slots: HashMap<String, usize> = HashMap::new();
        for term in self.tokenizer.terms(text) {
            if term.chars().count() < self.config.min_term_chars && !is_ideographic(&term) {
                continue;
            }
            if self.stopwords.as_ref().is_some_and(|s| s.matches(&term)) {
                continue;
            }
            match slots.get(&term) {
                Some(&slot) => counts[slot].1 += 1,
                None => {
                    slots.insert(term.clone(), counts.len());
                    counts.push((term, 1));
                }
            }
        }
        counts
    }
}
