use anyhow::Result;
use axum::Router;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use termscope_core::source::{load_documents, load_stopwords};
use termscope_core::{StopwordSet, WordTokenizerConfig};
use termscope_server::{build_app, ServerConfig};
use tokio::net::TcpListener;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Document files, or directories of *.txt files, in document order
    #[arg(long, num_args = 0..)]
    docs: Vec<PathBuf>,
    /// Stopword file, one word per line
    #[arg(long)]
    stopwords: Option<PathBuf>,
    /// Use the built-in English stopword list when no file is given
    #[arg(long, default_value_t = false)]
    english_stopwords: bool,
    /// Reduce terms to their English stem
    #[arg(long, default_value_t = false)]
    stem: bool,
    /// Do not lowercase terms
    #[arg(long, default_value_t = false)]
    keep_case: bool,
    /// Skip NFKC normalisation of terms
    #[arg(long, default_value_t = false)]
    no_nfkc: bool,
    /// Host to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl Args {
    fn tokenizer(&self) -> WordTokenizerConfig {
        WordTokenizerConfig { lowercase: !self.keep_case, nfkc: !self.no_nfkc, stem: self.stem }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();

    let documents = load_documents(&args.docs)?;
    let stopwords = match &args.stopwords {
        Some(path) => load_stopwords(path)?,
        None if args.english_stopwords => StopwordSet::english(),
        None => StopwordSet::new(),
    };
    let config = ServerConfig {
        documents,
        stopwords,
        tokenizer: args.tokenizer(),
        admin_token: std::env::var("ADMIN_TOKEN").ok(),
    };
    let app: Router = build_app(config);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
