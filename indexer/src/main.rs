use anyhow::Result;
use clap::Parser;
use indexer::run_index;
use search_core::persist::TablePaths;
use search_core::RankConfig;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "index")]
#[command(about = "Build the titles, docs and words tables for a page corpus", long_about = None)]
struct Cli {
    /// Corpus: a .json/.jsonl file of pages, or a directory of them
    corpus: PathBuf,
    /// Output path of the id/title table
    titles: PathBuf,
    /// Output path of the id/authority table
    docs: PathBuf,
    /// Output path of the term/weight table
    words: PathBuf,
    /// Stop ranking once successive vectors are this close
    #[arg(long, default_value_t = 0.001)]
    epsilon: f64,
    /// Upper bound on ranking iterations
    #[arg(long, default_value_t = 1000)]
    max_iterations: usize,
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(std::io::stderr).init();
    let cli = Cli::parse();
    let rank = RankConfig { epsilon: cli.epsilon, max_iterations: cli.max_iterations, ..RankConfig::default() };
    let paths = TablePaths::new(cli.titles, cli.docs, cli.words);
    run_index(&cli.corpus, &paths, rank)?;
    Ok(())
}
