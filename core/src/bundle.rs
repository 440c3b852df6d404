use crate::dictionary::Dictionary;
use crate::frequency::{build_frequency_tables, TermFrequencies};
use crate::inverted::{build_inverted_index, InvertedIndex};
use crate::positions::{build_positional_index, DocumentPositions};
use crate::stopwords::StopwordSet;
use crate::tokenizer::Tokenizer;

/// Immutable result of one build. Rebuilding produces a new bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexBundle {
    dictionary: Dictionary,
    frequencies: Vec<TermFrequencies>,
    positions: Vec<DocumentPositions>,
    inverted: InvertedIndex,
    stopwords: StopwordSet,
}

impl IndexBundle {
    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn frequencies(&self) -> &[TermFrequencies] {
        &self.frequencies
    }

    pub fn positions(&self) -> &[DocumentPositions] {
        &self.positions
    }

    pub fn inverted(&self) -> &InvertedIndex {
        &self.inverted
    }

    /// The stopwords as canonicalised by the build's tokenizer.
    pub fn stopwords(&self) -> &StopwordSet {
        &self.stopwords
    }

    pub fn num_documents(&self) -> usize {
        self.frequencies.len()
    }
}

/// Runs the whole pipeline: tokenize, dictionary, frequencies, positions, inverted index.
#[derive(Debug, Clone, Default)]
pub struct IndexBuilder<T> {
    tokenizer: T,
}

impl<T: Tokenizer> IndexBuilder<T> {
    pub fn new(tokenizer: T) -> Self {
        Self { tokenizer }
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    pub fn build<D: AsRef<str>>(&self, documents: &[D], stopwords: &StopwordSet) -> IndexBundle {
        let stopwords = stopwords.canonical(&self.tokenizer);
        let texts: Vec<Vec<String>> = documents.iter().map(|doc| self.tokenizer.terms(doc.as_ref()).collect()).collect();

        let dictionary = Dictionary::build(&texts);
        tracing::debug!(num_terms = dictionary.len(), "built dictionary");
        let frequencies = build_frequency_tables(&dictionary, &texts);
        let positions = build_positional_index(&self.tokenizer, documents);
        let inverted = build_inverted_index(&dictionary, &frequencies, &stopwords);

        tracing::info!(
            num_docs = documents.len(),
            num_terms = dictionary.len(),
            indexed_terms = inverted.len(),
            "index bundle built"
        );
        IndexBundle { dictionary, frequencies, positions, inverted, stopwords }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::WordTokenizer;

    #[test]
    fn empty_corpus_gives_empty_bundle() {
        let b = IndexBuilder::new(WordTokenizer::default()).build::<&str>(&[], &StopwordSet::new());
        assert_eq!(b.num_documents(), 0);
        assert!(b.dictionary().is_empty());
        assert!(b.inverted().is_empty());
    }

    #[test]
    fn documents_without_terms_still_count() {
        let b = IndexBuilder::new(WordTokenizer::default()).build(&["...", "cat"], &StopwordSet::new());
        assert_eq!(b.num_documents(), 2);
        assert!(b.frequencies()[0].is_empty());
        assert!(b.positions()[0].is_empty());
        assert_eq!(b.inverted().get("cat"), Some(&[1][..]));
    }

    #[test]
    fn borrowed_tokenizer_builds_the_same_bundle() {
        let tok = WordTokenizer::default();
        let docs = ["a cat", "a dog"];
        let owned = IndexBuilder::new(tok.clone()).build(&docs, &StopwordSet::new());
        let borrowed = IndexBuilder::new(&tok).build(&docs, &StopwordSet::new());
        assert_eq!(owned, borrowed);
    }

    #[test]
    fn stopwords_are_canonicalised_with_the_tokenizer() {
        use crate::tokenizer::WordTokenizerConfig;

        let stem = WordTokenizer::new(WordTokenizerConfig { stem: true, ..Default::default() });
        let b = IndexBuilder::new(stem).build(&["she does run"], &StopwordSet::english());
        assert!(b.dictionary().contains("doe"));
        assert!(!b.inverted().contains("doe"));
        assert!(b.inverted().contains("run"));

        let keep_case = WordTokenizer::new(WordTokenizerConfig { lowercase: false, ..Default::default() });
        let b = IndexBuilder::new(keep_case).build(&["The Cat"], &["the"].into_iter().collect());
        assert!(!b.inverted().contains("The"));
        assert!(b.inverted().contains("Cat"));
    }
}
