pub mod bundle;
pub mod dictionary;
pub mod error;
pub mod frequency;
pub mod inverted;
pub mod keywords;
pub mod positions;
pub mod query;
pub mod source;
pub mod stopwords;
pub mod tokenizer;

pub use bundle::{IndexBuilder, IndexBundle};
pub use dictionary::Dictionary;
pub use error::{Error, Result};
pub use frequency::TermFrequencies;
pub use inverted::InvertedIndex;
pub use keywords::{IdfMode, KeywordConfig, KeywordExtractor, ScoredTerm};
pub use positions::DocumentPositions;
pub use query::{DocumentOccurrence, IndexEntry, IndexListing, QueryService, TermReport};
pub use stopwords::StopwordSet;
pub use tokenizer::{Span, Token, Tokenizer, WordTokenizer, WordTokenizerConfig};

pub type TermId = u32;
pub type DocId = u32;

/// Build an index bundle with the default [`WordTokenizer`].
pub fn build_index<D: AsRef<str>>(documents: &[D], stopwords: &StopwordSet) -> IndexBundle {
    IndexBuilder::new(WordTokenizer::default()).build(documents, stopwords)
}

/// Union of the per-document top-`top_k` keywords, first-seen order, no duplicates.
pub fn extract_keywords<D: AsRef<str>>(documents: &[D], top_k: usize) -> Result<Vec<String>> {
    let tokenizer = WordTokenizer::default();
    let config = KeywordConfig { top_k, ..KeywordConfig::default() };
    KeywordExtractor::new(&tokenizer, config).extract(documents)
}

/// Document list, per-document frequency and positions of `term`.
pub fn describe_term(term: &str, bundle: &IndexBundle) -> Result<TermReport> {
    QueryService::new(bundle).describe_term(term)
}
