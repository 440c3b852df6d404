use criterion::{criterion_group, criterion_main, Criterion};
use termscope_core::{build_index, extract_keywords, StopwordSet};

fn corpus() -> Vec<String> {
    let words = ["index", "term", "query", "document", "offset", "rust", "the", "and", "keyword", "score"];
    (0..200)
        .map(|d| (0..300).map(|i| words[(d * 7 + i * 13) % words.len()]).collect::<Vec<_>>().join(" "))
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let docs = corpus();
    let stopwords = StopwordSet::english();
    c.bench_function("build_index_200_docs", |b| b.iter(|| build_index(&docs, &stopwords)));
}

fn bench_keywords(c: &mut Criterion) {
    let docs = corpus();
    c.bench_function("extract_keywords_200_docs", |b| b.iter(|| extract_keywords(&docs, 10)));
}

criterion_group!(benches, bench_build, bench_keywords);
criterion_main!(benches);
