pub mod errors;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use errors::ApiError;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use termscope_core::{
    DocId, IndexBuilder, IndexBundle, IndexListing, KeywordConfig, KeywordExtractor, QueryService, ScoredTerm, Span, StopwordSet,
    TermReport, Tokenizer, WordTokenizer, WordTokenizerConfig,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub struct ServerConfig {
    pub documents: Vec<String>,
    pub stopwords: StopwordSet,
    pub tokenizer: WordTokenizerConfig,
    /// When set, write endpoints require a matching `X-ADMIN-TOKEN` header.
    pub admin_token: Option<String>,
}

/// One consistent view of the corpus and the bundle built from it.
#[derive(Clone)]
struct Snapshot {
    documents: Arc<Vec<String>>,
    stopwords: Arc<StopwordSet>,
    bundle: Arc<IndexBundle>,
}

#[derive(Clone)]
pub struct AppState {
    corpus: Arc<RwLock<Snapshot>>,
    tokenizer: Arc<WordTokenizer>,
    admin_token: Option<String>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let tokenizer = WordTokenizer::new(config.tokenizer);
        let bundle = IndexBuilder::new(&tokenizer).build(&config.documents, &config.stopwords);
        let snapshot = Snapshot {
            documents: Arc::new(config.documents),
            stopwords: Arc::new(config.stopwords),
            bundle: Arc::new(bundle),
        };
        Self { corpus: Arc::new(RwLock::new(snapshot)), tokenizer: Arc::new(tokenizer), admin_token: config.admin_token }
    }

    fn snapshot(&self) -> Snapshot {
        self.corpus.read().clone()
    }

    /// Apply `edit` to copies of the documents and stopwords, rebuild, then swap the snapshot.
    fn rebuild<F>(&self, edit: F) -> Result<RebuildSummary, ApiError>
    where
        F: FnOnce(&mut Vec<String>, &mut StopwordSet) -> Result<(), ApiError>,
    {
        let mut guard = self.corpus.write();
        let mut documents = guard.documents.to_vec();
        let mut stopwords = StopwordSet::clone(&guard.stopwords);
        edit(&mut documents, &mut stopwords)?;
        let bundle = IndexBuilder::new(&*self.tokenizer).build(&documents, &stopwords);
        let summary = RebuildSummary::of(&bundle);
        *guard = Snapshot { documents: Arc::new(documents), stopwords: Arc::new(stopwords), bundle: Arc::new(bundle) };
        tracing::info!(num_docs = summary.num_docs, num_terms = summary.num_terms, "corpus rebuilt");
        Ok(summary)
    }
}

#[derive(Debug, Serialize)]
pub struct RebuildSummary {
    pub num_docs: usize,
    pub num_terms: usize,
    pub indexed_terms: usize,
}

impl RebuildSummary {
    fn of(bundle: &IndexBundle) -> Self {
        Self {
            num_docs: bundle.num_documents(),
            num_terms: bundle.dictionary().len(),
            indexed_terms: bundle.inverted().len(),
        }
    }
}

#[derive(Serialize)]
pub struct DocumentView {
    pub doc_id: DocId,
    pub text: String,
}

#[derive(Deserialize)]
pub struct IndexParams {
    #[serde(default)]
    pub keywords_only: bool,
    #[serde(default = "default_k")]
    pub k: usize,
}

#[derive(Deserialize)]
pub struct KeywordParams {
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub filter_stopwords: bool,
    #[serde(default)]
    pub scores: bool,
}

#[derive(Deserialize)]
pub struct TermParams {
    #[serde(default)]
    pub highlight: bool,
}

fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct TermResponse {
    #[serde(flatten)]
    pub report: TermReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlighted: Option<Vec<DocumentView>>,
}

/// Merged keyword list, or per-document rankings with scores.
#[derive(Serialize)]
#[serde(untagged)]
pub enum KeywordsResponse {
    Merged(Vec<String>),
    Scored(Vec<Vec<ScoredTerm>>),
}

#[derive(Serialize)]
pub struct TermInDocument {
    pub term: String,
    pub doc_id: DocId,
    pub frequency: u32,
    pub positions: Vec<Span>,
}

pub fn build_app(config: ServerConfig) -> Router {
    let app_state = AppState::new(config);

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/documents", get(list_documents).post(append_document))
        .route("/documents/:doc_id", get(get_document).put(replace_document))
        .route("/stopwords", get(get_stopwords).put(replace_stopwords))
        .route("/index", get(index_handler))
        .route("/terms/:term", get(term_handler))
        .route("/terms/:term/documents/:doc_id", get(term_in_document_handler))
        .route("/keywords", get(keywords_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn list_documents(State(state): State<AppState>) -> Json<Vec<DocumentView>> {
    let snapshot = state.snapshot();
    let docs = snapshot
        .documents
        .iter()
        .enumerate()
        .map(|(i, text)| DocumentView { doc_id: i as DocId, text: text.clone() })
        .collect();
    Json(docs)
}

pub async fn get_document(State(state): State<AppState>, Path(doc_id): Path<DocId>) -> Result<Json<DocumentView>, ApiError> {
    let snapshot = state.snapshot();
    let text = snapshot
        .documents
        .get(doc_id as usize)
        .ok_or_else(|| ApiError::NotFound(format!("document {doc_id} not found")))?;
    Ok(Json(DocumentView { doc_id, text: text.clone() }))
}

pub async fn replace_document(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<RebuildSummary>, ApiError> {
    authorize(&state, &headers)?;
    let summary = state.rebuild(|documents, _| {
        let slot = documents
            .get_mut(doc_id as usize)
            .ok_or_else(|| ApiError::NotFound(format!("document {doc_id} not found")))?;
        *slot = body;
        Ok(())
    })?;
    Ok(Json(summary))
}

pub async fn append_document(State(state): State<AppState>, headers: HeaderMap, body: String) -> Result<Json<RebuildSummary>, ApiError> {
    authorize(&state, &headers)?;
    let summary = state.rebuild(|documents, _| {
        documents.push(body);
        Ok(())
    })?;
    Ok(Json(summary))
}

pub async fn get_stopwords(State(state): State<AppState>) -> Json<Vec<String>> {
    let snapshot = state.snapshot();
    Json(snapshot.stopwords.sorted().into_iter().map(String::from).collect())
}

pub async fn replace_stopwords(State(state): State<AppState>, headers: HeaderMap, body: String) -> Result<Json<RebuildSummary>, ApiError> {
    authorize(&state, &headers)?;
    let summary = state.rebuild(|_, stopwords| {
        *stopwords = StopwordSet::from_lines(&body);
        Ok(())
    })?;
    Ok(Json(summary))
}

pub async fn index_handler(State(state): State<AppState>, Query(params): Query<IndexParams>) -> Result<Json<IndexListing>, ApiError> {
    let snapshot = state.snapshot();
    let query = QueryService::new(&snapshot.bundle);
    if !params.keywords_only {
        return Ok(Json(query.listing()));
    }
    let config = KeywordConfig { top_k: params.k, ..KeywordConfig::default() };
    let keywords = KeywordExtractor::new(&*state.tokenizer, config).extract(snapshot.documents.as_slice())?;
    Ok(Json(query.listing_for(&keywords)))
}

pub async fn term_handler(
    State(state): State<AppState>,
    Path(term): Path<String>,
    Query(params): Query<TermParams>,
) -> Result<Json<TermResponse>, ApiError> {
    let snapshot = state.snapshot();
    let term = state.tokenizer.canonical_term(&term);
    let report = QueryService::new(&snapshot.bundle).describe_term(&term)?;
    let highlighted = params.highlight.then(|| {
        report
            .occurrences
            .iter()
            .map(|occ| DocumentView { doc_id: occ.doc, text: highlight(&snapshot.documents[occ.doc as usize], &occ.positions) })
            .collect()
    });
    Ok(Json(TermResponse { report, highlighted }))
}

pub async fn term_in_document_handler(
    State(state): State<AppState>,
    Path((term, doc_id)): Path<(String, DocId)>,
) -> Result<Json<TermInDocument>, ApiError> {
    let snapshot = state.snapshot();
    let term = state.tokenizer.canonical_term(&term);
    let query = QueryService::new(&snapshot.bundle);
    let frequency = query.frequency_of(&term, doc_id)?;
    let positions = query.positions_of(&term, doc_id)?.to_vec();
    Ok(Json(TermInDocument { term, doc_id, frequency, positions }))
}

pub async fn keywords_handler(State(state): State<AppState>, Query(params): Query<KeywordParams>) -> Result<Json<KeywordsResponse>, ApiError> {
    let snapshot = state.snapshot();
    let config = KeywordConfig { top_k: params.k, ..KeywordConfig::default() };
    let mut extractor = KeywordExtractor::new(&*state.tokenizer, config);
    if params.filter_stopwords {
        extractor = extractor.with_stopwords(&snapshot.stopwords);
    }
    let documents = snapshot.documents.as_slice();
    let response = if params.scores {
        KeywordsResponse::Scored(extractor.extract_scored(documents)?)
    } else {
        KeywordsResponse::Merged(extractor.extract(documents)?)
    };
    Ok(Json(response))
}

/// Wrap every span of `text` in `<em>..</em>`. Spans are character offsets, sorted and disjoint.
pub fn highlight(text: &str, spans: &[Span]) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * 9);
    let mut spans = spans.iter().peekable();
    for (i, ch) in text.chars().enumerate() {
        if spans.peek().is_some_and(|s| s.start == i) {
            out.push_str("<em>");
        }
        out.push(ch);
        if spans.peek().is_some_and(|s| s.end == i + 1) {
            out.push_str("</em>");
            spans.next();
        }
    }
    out
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(required) = &state.admin_token else {
        return Ok(());
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("invalid admin token".into()))
    }
}
