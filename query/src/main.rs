use anyhow::Result;
use clap::Parser;
use query::QuerySession;
use search_core::persist::TablePaths;
use search_core::SearchConfig;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "query")]
#[command(about = "Answer search queries against tables written by `index`", long_about = None)]
struct Args {
    /// Weight relevance by PageRank authority
    #[arg(long, default_value_t = false)]
    pagerank: bool,
    /// Path of the id/title table
    titles: PathBuf,
    /// Path of the id/authority table
    docs: PathBuf,
    /// Path of the term/weight table
    words: PathBuf,
    /// Number of titles printed per query
    #[arg(long, default_value_t = 10)]
    top_k: usize,
    /// Abandon a query after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let args = Args::parse();
    let config = SearchConfig {
        top_k: args.top_k,
        use_authority: args.pagerank,
        timeout: args.timeout_ms.map(Duration::from_millis),
    };
    let session = QuerySession::load(&TablePaths::new(args.titles, args.docs, args.words), config)?;
    tracing::info!(num_docs = session.tables().corpus.len(), pagerank = args.pagerank, "ready for queries");
    session.run_repl(io::stdin().lock(), io::stdout().lock())?;
    Ok(())
}
