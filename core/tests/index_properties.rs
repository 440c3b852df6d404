use std::collections::HashSet;
use termscope_core::tokenizer::{Span, Tokenizer, WordTokenizer};
use termscope_core::{
    build_index, describe_term, extract_keywords, DocId, Error, IndexBundle, KeywordConfig, KeywordExtractor, QueryService,
    StopwordSet,
};

const DOCS: [&str; 3] = ["the cat sat", "the dog sat", "cat and dog play"];

const CORPUS: [&str; 4] = [
    "Rust gives you memory safety without a garbage collector.",
    "A garbage collector pauses; Rust uses ownership and borrowing instead.",
    "Ownership rules: each value has an owner, and the owner drops the value.",
    "",
];

fn stopwords() -> StopwordSet {
    ["the", "and"].into_iter().collect()
}

fn corpus_bundle() -> IndexBundle {
    build_index(&CORPUS, &StopwordSet::english())
}

#[test]
fn scenario_from_three_small_documents() {
    let bundle = build_index(&DOCS, &stopwords());
    let q = QueryService::new(&bundle);
    assert_eq!(q.documents_containing("cat").unwrap(), &[0, 2]);
    assert_eq!(q.documents_containing("sat").unwrap(), &[0, 1]);
    assert_eq!(q.frequency_of("cat", 2).unwrap(), 1);
    assert_eq!(q.positions_of("sat", 0).unwrap(), &[Span::new(8, 11)]);
    let err = q.documents_containing("the").unwrap_err();
    assert!(err.is_not_found());
    assert!(q.frequency_of("the", 0).is_ok());
}

#[test]
fn dictionary_is_complete_and_stable() {
    let bundle = corpus_bundle();
    let tok = WordTokenizer::default();
    for doc in CORPUS {
        for term in tok.terms(doc) {
            let first = bundle.dictionary().id_of(&term).expect("term in dictionary");
            assert_eq!(bundle.dictionary().id_of(&term), Some(first));
            assert_eq!(bundle.dictionary().term_of(first), Some(term.as_str()));
        }
    }
}

#[test]
fn frequency_matches_position_count() {
    let bundle = corpus_bundle();
    let q = QueryService::new(&bundle);
    for (doc, positions) in bundle.positions().iter().enumerate() {
        for (term, spans) in positions.iter() {
            assert_eq!(q.frequency_of(term, doc as DocId).unwrap() as usize, spans.len());
        }
    }
    for (doc, table) in bundle.frequencies().iter().enumerate() {
        for (id, count) in table.iter() {
            let term = bundle.dictionary().term_of(id).unwrap();
            assert_eq!(q.positions_of(term, doc as DocId).unwrap().len(), count as usize);
        }
    }
}

#[test]
fn inverted_index_matches_frequency_tables() {
    let bundle = corpus_bundle();
    let q = QueryService::new(&bundle);
    for (_, term) in bundle.dictionary().iter() {
        if bundle.stopwords().matches(term) {
            continue;
        }
        let expected: Vec<DocId> = (0..bundle.num_documents() as DocId)
            .filter(|&d| q.frequency_of(term, d).map(|c| c > 0).unwrap_or(false))
            .collect();
        assert_eq!(q.documents_containing(term).unwrap(), expected.as_slice());
    }
}

#[test]
fn stopwords_never_reach_the_inverted_index() {
    let bundle = corpus_bundle();
    let q = QueryService::new(&bundle);
    for word in bundle.stopwords().iter() {
        let err = q.documents_containing(word).unwrap_err();
        assert!(matches!(err, Error::StopwordExcluded(_) | Error::TermNotFound(_)));
    }
    // "the" does occur, so it is reported as excluded rather than unknown
    assert_eq!(q.documents_containing("the"), Err(Error::StopwordExcluded("the".into())));
}

#[test]
fn rebuilding_is_idempotent() {
    let a = build_index(&CORPUS, &StopwordSet::english());
    let b = build_index(&CORPUS, &StopwordSet::english());
    assert_eq!(a, b);
    assert_eq!(a.dictionary(), b.dictionary());
    assert_eq!(a.frequencies(), b.frequencies());
    assert_eq!(a.positions(), b.positions());
    assert_eq!(a.inverted(), b.inverted());
}

#[test]
fn rebuild_after_edit_replaces_everything() {
    let before = build_index(&DOCS, &stopwords());
    let mut docs = DOCS.map(String::from).to_vec();
    docs[1] = "a bird sang".to_string();
    let after = build_index(&docs, &stopwords());
    assert_ne!(before, after);
    assert!(QueryService::new(&before).documents_containing("bird").is_err());
    assert_eq!(QueryService::new(&after).documents_containing("bird").unwrap(), &[1]);
    assert_eq!(QueryService::new(&after).documents_containing("sat").unwrap(), &[0]);
}

#[test]
fn keyword_union_is_bounded_and_unique() {
    for k in [1usize, 2, 3, 100] {
        let keywords = extract_keywords(&CORPUS, k).unwrap();
        assert!(keywords.len() <= k * CORPUS.len());
        let unique: HashSet<&String> = keywords.iter().collect();
        assert_eq!(unique.len(), keywords.len());

        let tokenizer = WordTokenizer::default();
        let ranked = KeywordExtractor::new(&tokenizer, KeywordConfig { top_k: k, ..KeywordConfig::default() })
            .extract_scored(&CORPUS)
            .unwrap();
        for keyword in &keywords {
            assert!(
                ranked.iter().any(|doc| doc.iter().any(|scored| &scored.term == keyword)),
                "{keyword} is in no document's top {k}"
            );
        }
    }
    assert!(matches!(extract_keywords(&CORPUS, 0), Err(Error::InvalidParameter(_))));
}

#[test]
fn describe_term_reports_every_document() {
    let bundle = build_index(&DOCS, &stopwords());
    let report = describe_term("cat", &bundle).unwrap();
    assert_eq!(report.documents, vec![0, 2]);
    assert_eq!(report.occurrences.len(), 2);
    assert_eq!(report.occurrences[1].positions, vec![Span::new(0, 3)]);
    assert_eq!(describe_term("unicorn", &bundle).unwrap_err(), Error::TermNotFound("unicorn".into()));
}

#[test]
fn empty_corpus_builds_empty_bundle() {
    let bundle = build_index::<&str>(&[], &stopwords());
    assert_eq!(bundle.num_documents(), 0);
    assert!(bundle.inverted().is_empty());
    assert!(extract_keywords::<&str>(&[], 10).unwrap().is_empty());
    let q = QueryService::new(&bundle);
    assert!(matches!(q.frequency_of("cat", 0), Err(Error::DocumentOutOfRange { .. })));
}
