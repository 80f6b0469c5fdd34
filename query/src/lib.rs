use search_core::persist::{load_tables, TablePaths};
use search_core::{query_terms, DocId, EnglishNormalizer, IndexTables, SearchConfig, SearchError, StoreError};
use std::io::{self, BufRead, Write};
use std::time::Instant;

pub const PROMPT: &str = "search> ";
pub const QUIT: &str = ":quit";
pub const NO_RESULTS: &str = "No search results were found";

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub score: f64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<SearchHit>,
}

/// Loaded tables plus the settings every query of the session runs with.
pub struct QuerySession {
    tables: IndexTables,
    config: SearchConfig,
    normalizer: EnglishNormalizer,
}

impl QuerySession {
    pub fn new(tables: IndexTables, config: SearchConfig) -> Self {
        Self { tables, config, normalizer: EnglishNormalizer }
    }

    pub fn load(paths: &TablePaths, config: SearchConfig) -> Result<Self, StoreError> {
        Ok(Self::new(load_tables(paths)?, config))
    }

    pub fn tables(&self) -> &IndexTables { &self.tables }

    pub fn search(&self, query: &str) -> Result<SearchResponse, SearchError> {
        let start = Instant::now();
        let terms = query_terms(&self.normalizer, query);
        let hits = self.tables.scorer(&self.config).search(&terms)?;
        let results = hits
            .into_iter()
            .filter_map(|h| {
                let title = self.tables.corpus.title(h.id)?;
                Some(SearchHit { doc_id: h.id, score: h.score, title: title.to_string() })
            })
            .collect();
        let took_s = start.elapsed().as_secs_f64();
        tracing::debug!(query, took_s, "answered query");
        Ok(SearchResponse { query: query.to_string(), took_s, results })
    }

    /// Prompt for queries on `input` and print ranked titles to `output` until
    /// `:quit` or end of input.
    pub fn run_repl<R: BufRead, W: Write>(&self, input: R, mut output: W) -> io::Result<()> {
        let mut lines = input.lines();
        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;
            let Some(line) = lines.next().transpose()? else { break };
            let query = line.trim();
            if query == QUIT {
                break;
            }
            match self.search(query) {
                Ok(resp) if resp.results.is_empty() => writeln!(output, "{NO_RESULTS}")?,
                Ok(resp) => {
                    for hit in &resp.results {
                        writeln!(output, "{}", hit.title)?;
                    }
                }
                Err(err) => {
                    tracing::warn!(query, %err, "query failed");
                    writeln!(output, "{err}")?;
                }
            }
        }
        Ok(())
    }
}
