use anyhow::{Context, Result};
use search_core::persist::{save_tables, TablePaths};
use search_core::{Indexer, Page, RankConfig, RawPage, StoreError};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What an indexing run produced, for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSummary {
    pub num_docs: usize,
    pub num_terms: usize,
    pub rank_iterations: usize,
    pub rank_converged: bool,
}

/// Index the corpus at `input` and write the three tables.
///
/// The corpus is read and indexed completely before any table is written, so
/// an unreadable input leaves no output files behind.
pub fn run_index(input: &Path, out: &TablePaths, rank: RankConfig) -> Result<IndexSummary> {
    let pages = load_corpus(input)?;
    tracing::info!(num_pages = pages.len(), input = %input.display(), "loaded corpus");
    if pages.is_empty() {
        tracing::warn!(input = %input.display(), "corpus has no usable pages");
    }

    let build = Indexer::new(rank).build(pages).context("indexing corpus")?;
    save_tables(out, &build.tables)?;

    let summary = IndexSummary {
        num_docs: build.tables.corpus.len(),
        num_terms: build.tables.weights.num_terms(),
        rank_iterations: build.rank_iterations,
        rank_converged: build.rank_converged,
    };
    tracing::info!(?summary, "index build complete");
    Ok(summary)
}

/// Corpus files under `input`: the path itself, or every `.json`/`.jsonl`
/// file below it, in path order.
pub fn corpus_files(input: &Path) -> Result<Vec<PathBuf>, StoreError> {
    if !input.exists() {
        return Err(StoreError::NotFound { path: input.to_path_buf() });
    }
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(input).to_path_buf();
            StoreError::Unreadable { path, source: e.into() }
        })?;
        let p = entry.path();
        if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
            files.push(p.to_path_buf());
        }
    }
    Ok(files)
}

/// Read every page record of the corpus. Records that do not decode or lack
/// an id or title are logged and skipped.
pub fn load_corpus(input: &Path) -> Result<Vec<Page>, StoreError> {
    let mut pages = Vec::new();
    for file in corpus_files(input)? {
        let text = read_to_string(&file)?;
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file, &text, &mut pages);
        } else {
            read_json(&file, &text, &mut pages)?;
        }
    }
    Ok(pages)
}

fn read_to_string(path: &Path) -> Result<String, StoreError> {
    let mut f = File::open(path).map_err(|e| StoreError::from_read(path, e))?;
    let mut buf = String::new();
    f.read_to_string(&mut buf).map_err(|e| StoreError::from_read(path, e))?;
    Ok(buf)
}

fn read_jsonl(file: &Path, text: &str, pages: &mut Vec<Page>) {
    for (i, line) in text.lines().enumerate() {
        if line.trim().is_empty() { continue; }
        match serde_json::from_str::<RawPage>(line) {
            Ok(raw) => push_page(file, i + 1, raw, pages),
            Err(err) => tracing::warn!(file = %file.display(), line = i + 1, %err, "skipping undecodable page"),
        }
    }
}

fn read_json(file: &Path, text: &str, pages: &mut Vec<Page>) -> Result<(), StoreError> {
    let json: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| StoreError::Corrupt { path: file.to_path_buf(), line: e.line(), reason: e.to_string() })?;
    let values = match json {
        serde_json::Value::Array(arr) => arr,
        serde_json::Value::Object(_) => vec![json],
        _ => {
            tracing::warn!(file = %file.display(), "expected a page object or an array of pages");
            return Ok(());
        }
    };
    for (i, v) in values.into_iter().enumerate() {
        match serde_json::from_value::<RawPage>(v) {
            Ok(raw) => push_page(file, i + 1, raw, pages),
            Err(err) => tracing::warn!(file = %file.display(), record = i + 1, %err, "skipping undecodable page"),
        }
    }
    Ok(())
}

fn push_page(file: &Path, record: usize, raw: RawPage, pages: &mut Vec<Page>) {
    match Page::try_from(raw) {
        Ok(page) => pages.push(page),
        Err(err) => tracing::warn!(file = %file.display(), record, %err, "skipping malformed page"),
    }
}
