use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // Han characters are emitted one per token; every other letter/digit run is one token.
    // Combining marks stay attached to their word so NFKC can compose them.
    static ref RE: Regex =
        Regex::new(r"(?u)\p{Han}|[[\p{L}\p{N}]--\p{Han}][[\p{L}\p{M}\p{N}_']--\p{Han}]*").expect("valid regex");
    static ref HAN: Regex = Regex::new(r"(?u)^\p{Han}+$").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Half-open range of character (not byte) offsets into the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<(usize, usize)> for Span {
    fn from((start, end): (usize, usize)) -> Self {
        Self::new(start, end)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Canonical term.
    pub term: String,
    /// Where the surface form sits in the raw text.
    pub span: Span,
}

/// Splits raw text into terms. Implementations must be deterministic.
pub trait Tokenizer {
    /// Lazily yields every token of `text` with its character span, in text order.
    fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Token> + 'a;

    /// The term stream of [`Tokenizer::tokens`] without offsets.
    fn terms<'a>(&'a self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        self.tokens(text).map(|t| t.term)
    }

    /// Canonical form of a single user-supplied term, for lookups against built indexes.
    ///
    /// Input that does not tokenize to exactly one token is returned trimmed but otherwise untouched.
    fn canonical_term(&self, raw: &str) -> String {
        let mut tokens = self.tokens(raw);
        match (tokens.next(), tokens.next()) {
            (Some(token), None) => token.term,
            _ => raw.trim().to_string(),
        }
    }
}

/// True for terms made only of Han ideographs, which carry meaning one character at a time.
pub fn is_ideographic(term: &str) -> bool {
    HAN.is_match(term)
}

impl<T: Tokenizer> Tokenizer for &T {
    fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Token> + 'a {
        (**self).tokens(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordTokenizerConfig {
    pub lowercase: bool,
    pub nfkc: bool,
    /// English Snowball stemming.
    pub stem: bool,
}

impl Default for WordTokenizerConfig {
    fn default() -> Self {
        Self { lowercase: true, nfkc: true, stem: false }
    }
}

/// Regex word tokenizer with optional per-token NFKC, lowercasing and stemming.
///
/// Canonicalisation applies to each matched word only, so spans always point
/// at the surface form in the original text.
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer {
    config: WordTokenizerConfig,
}

impl WordTokenizer {
    pub fn new(config: WordTokenizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WordTokenizerConfig {
        &self.config
    }

    fn canonical(&self, surface: &str) -> String {
        let mut term = if self.config.nfkc { surface.nfkc().collect::<String>() } else { surface.to_string() };
        if self.config.lowercase {
            term = term.to_lowercase();
        }
        if self.config.stem {
            term = STEMMER.stem(&term).into_owned();
        }
        term
    }
}

impl Tokenizer for WordTokenizer {
    fn tokens<'a>(&'a self, text: &'a str) -> impl Iterator<Item = Token> + 'a {
        // (byte, char) position just past the previous match
        let mut cursor = (0usize, 0usize);
        RE.find_iter(text).map(move |mat| {
            let start = cursor.1 + text[cursor.0..mat.start()].chars().count();
            let end = start + mat.as_str().chars().count();
            cursor = (mat.end(), end);
            Token { term: self.canonical(mat.as_str()), span: Span::new(start, end) }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_offsets_for_ascii() {
        let t: Vec<Token> = WordTokenizer::default().tokens("the cat sat").collect();
        assert_eq!(t.len(), 3);
        assert_eq!(t[2].term, "sat");
        assert_eq!(t[2].span, Span::new(8, 11));
        assert_eq!(t[1].span, Span::new(4, 7));
    }

    #[test]
    fn offsets_count_chars_not_bytes() {
        let t: Vec<Token> = WordTokenizer::default().tokens("héllo wörld").collect();
        assert_eq!(t[0].span, Span::new(0, 5));
        assert_eq!(t[1].span, Span::new(6, 11));
    }

    #[test]
    fn stemming_keeps_surface_span() {
        let tok = WordTokenizer::new(WordTokenizerConfig { stem: true, ..Default::default() });
        let t: Vec<Token> = tok.tokens("Running fast").collect();
        assert_eq!(t[0].term, "run");
        assert_eq!(t[0].span, Span::new(0, 7));
    }

    #[test]
    fn combining_marks_stay_in_the_word() {
        let t: Vec<Token> = WordTokenizer::default().tokens("cafe\u{301} noir").collect();
        assert_eq!(t.len(), 2);
        assert_eq!(t[0].term, "caf\u{e9}");
        assert_eq!(t[0].span, Span::new(0, 5));
        assert_eq!(t[1].span, Span::new(6, 10));
    }

    #[test]
    fn canonical_term_matches_indexed_form() {
        let tok = WordTokenizer::default();
        assert_eq!(tok.canonical_term("Cat"), "cat");
        assert_eq!(tok.canonical_term(" ＣＡＴ "), "cat");
        assert_eq!(tok.canonical_term("two words"), "two words");
        let stem = WordTokenizer::new(WordTokenizerConfig { stem: true, ..Default::default() });
        assert_eq!(stem.canonical_term("Running"), "run");
    }

    #[test]
    fn ideographic_terms() {
        assert!(is_ideographic("中"));
        assert!(!is_ideographic("a"));
        assert!(!is_ideographic(""));
    }
}
