use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use termscope_core::source::{load_documents, load_stopwords};
use termscope_core::{
    Error, IdfMode, IndexBuilder, IndexBundle, IndexListing, KeywordConfig, KeywordExtractor, QueryService, ScoredTerm, StopwordSet,
    TermReport, Tokenizer, WordTokenizer, WordTokenizerConfig,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "termscope")]
#[command(about = "Explore which documents contain a term, how often and where", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the inverted index
    Index {
        #[command(flatten)]
        corpus: CorpusArgs,
        /// Only list entries for the extracted top keywords
        #[arg(long, default_value_t = false)]
        keywords_only: bool,
        /// Keywords kept per document with --keywords-only
        #[arg(long, default_value_t = 10)]
        top_k: usize,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Show documents, frequency and offsets of one term
    Describe {
        term: String,
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Extract the top keywords of every document
    Keywords {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[arg(long, default_value_t = 10)]
        top_k: usize,
        /// Leave stopwords out of the ranking
        #[arg(long, default_value_t = false)]
        filter_stopwords: bool,
        /// Print per-document rankings with scores instead of the merged list
        #[arg(long, default_value_t = false)]
        scores: bool,
        #[arg(long, value_enum, default_value_t = IdfArg::Smoothed)]
        idf: IdfArg,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

#[derive(Args)]
struct CorpusArgs {
    /// Document files, or directories of *.txt files, in document order
    #[arg(long, num_args = 1.., required = true)]
    docs: Vec<PathBuf>,
    /// Stopword file, one word per line
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// Add the built-in English stopword list
    #[arg(long, default_value_t = false)]
    english_stopwords: bool,
    /// Do not lowercase terms
    #[arg(long, default_value_t = false)]
    keep_case: bool,
    /// Skip NFKC normalisation of terms
    #[arg(long, default_value_t = false)]
    no_nfkc: bool,
    /// Reduce terms to their English stem
    #[arg(long, default_value_t = false)]
    stem: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum IdfArg {
    Standard,
    Smoothed,
}

impl From<IdfArg> for IdfMode {
    fn from(arg: IdfArg) -> Self {
        match arg {
            IdfArg::Standard => IdfMode::Standard,
            IdfArg::Smoothed => IdfMode::Smoothed,
        }
    }
}

impl CorpusArgs {
    fn tokenizer(&self) -> WordTokenizer {
        WordTokenizer::new(WordTokenizerConfig { lowercase: !self.keep_case, nfkc: !self.no_nfkc, stem: self.stem })
    }

    fn load(&self) -> Result<(Vec<String>, StopwordSet)> {
        let documents = load_documents(&self.docs)?;
        let mut stopwords = match &self.stopwords {
            Some(path) => load_stopwords(path)?,
            None => StopwordSet::new(),
        };
        if self.english_stopwords {
            for word in StopwordSet::english().iter() {
                stopwords.insert(word);
            }
        }
        Ok((documents, stopwords))
    }
}

fn main() -> Result<ExitCode> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Index { corpus, keywords_only, top_k, json } => show_index(&corpus, keywords_only, top_k, json),
        Commands::Describe { term, corpus, json } => describe(&term, &corpus, json),
        Commands::Keywords { corpus, top_k, filter_stopwords, scores, idf, json } => {
            keywords(&corpus, KeywordConfig { top_k, idf: idf.into(), ..KeywordConfig::default() }, filter_stopwords, scores, json)
        }
    }
}

fn show_index(corpus: &CorpusArgs, keywords_only: bool, top_k: usize, json: bool) -> Result<ExitCode> {
    let (documents, stopwords) = corpus.load()?;
    let tokenizer = corpus.tokenizer();
    let bundle = IndexBuilder::new(&tokenizer).build(&documents, &stopwords);
    let query = QueryService::new(&bundle);

    let listing = if keywords_only {
        let config = KeywordConfig { top_k, ..KeywordConfig::default() };
        let keywords = KeywordExtractor::new(&tokenizer, config).extract(&documents)?;
        query.listing_for(&keywords)
    } else {
        query.listing()
    };

    if json {
        print_json(&listing)?;
    } else {
        print!("{}", render_listing(&listing));
    }
    Ok(ExitCode::SUCCESS)
}

fn describe(term: &str, corpus: &CorpusArgs, json: bool) -> Result<ExitCode> {
    let (documents, stopwords) = corpus.load()?;
    let tokenizer = corpus.tokenizer();
    let bundle = IndexBuilder::new(&tokenizer).build(&documents, &stopwords);

    match lookup(term, &tokenizer, &bundle) {
        Ok(report) if json => print_json(&report)?,
        Ok(report) => print!("{}", render_report(&report)),
        Err(err) if err.is_not_found() => {
            tracing::debug!(%err, "describe failed");
            if json {
                print_json(&serde_json::json!({ "term": term, "error": err.to_string() }))?;
            } else {
                eprintln!("{term} does not show in any document");
            }
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return Err(err.into()),
    }
    Ok(ExitCode::SUCCESS)
}

/// Describe `term` after bringing it into the form the bundle was built with.
fn lookup<T: Tokenizer>(term: &str, tokenizer: &T, bundle: &IndexBundle) -> Result<TermReport, Error> {
    QueryService::new(bundle).describe_term(&tokenizer.canonical_term(term))
}

fn keywords(corpus: &CorpusArgs, config: KeywordConfig, filter_stopwords: bool, scores: bool, json: bool) -> Result<ExitCode> {
    let (documents, stopwords) = corpus.load()?;
    let tokenizer = corpus.tokenizer();
    let mut extractor = KeywordExtractor::new(&tokenizer, config);
    if filter_stopwords {
        extractor = extractor.with_stopwords(&stopwords);
    }

    if scores {
        let ranked = extractor.extract_scored(&documents)?;
        if json {
            print_json(&ranked)?;
        } else {
            print!("{}", render_rankings(&ranked));
        }
    } else {
        let keywords = extractor.extract(&documents)?;
        if json {
            print_json(&keywords)?;
        } else {
            for keyword in keywords {
                println!("{keyword}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn render_listing(listing: &IndexListing) -> String {
    let mut out = String::new();
    for entry in &listing.entries {
        out.push_str(&format!("{} shows in documents {:?}\n", entry.term, entry.documents));
    }
    for term in &listing.missing {
        out.push_str(&format!("{term} is not in the inverted index\n"));
    }
    out
}

fn render_report(report: &TermReport) -> String {
    let mut out = format!("{} shows in documents {:?}\n", report.term, report.documents);
    for occ in &report.occurrences {
        let spans: Vec<(usize, usize)> = occ.positions.iter().map(|s| (s.start, s.end)).collect();
        out.push_str(&format!("  document {}: {} times, positions {:?}\n", occ.doc, occ.frequency, spans));
    }
    out
}

fn render_rankings(ranked: &[Vec<ScoredTerm>]) -> String {
    let mut out = String::new();
    for (doc, terms) in ranked.iter().enumerate() {
        out.push_str(&format!("document {doc}\n"));
        for scored in terms {
            out.push_str(&format!("  {:<20} {:.4}\n", scored.term, scored.score));
        }
    }
    out
}
