use query::{QuerySession, NO_RESULTS};
use search_core::persist::{save_tables, TablePaths};
use search_core::{Indexer, Page, SearchConfig, SearchError};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn build_tiny_index(dir: &Path, pages: Vec<Page>) -> TablePaths {
    let paths = TablePaths::new(dir.join("titles.txt"), dir.join("docs.txt"), dir.join("words.txt"));
    let build = Indexer::default().build(pages).unwrap();
    save_tables(&paths, &build.tables).unwrap();
    paths
}

fn chain_pages() -> Vec<Page> {
    vec![
        Page::new(1, "A", "aardvark burrows near [[B]]"),
        Page::new(2, "B", "bison graze near [[C]]"),
        Page::new(3, "C", "capybara swims"),
    ]
}

fn hub_pages() -> Vec<Page> {
    vec![
        Page::new(1, "Hub", "hub zebra"),
        Page::new(2, "Pilot", "zebra [[Hub]]"),
        Page::new(3, "Quiet", "[[Hub]]"),
        Page::new(4, "Rest", "[[Hub]]"),
    ]
}

fn titles(session: &QuerySession, query: &str) -> Vec<String> {
    session.search(query).unwrap().results.into_iter().map(|h| h.title).collect()
}

fn repl(session: &QuerySession, input: &str) -> String {
    let mut out = Vec::new();
    session.run_repl(Cursor::new(input), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn unique_term_ranks_its_page_first() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path(), chain_pages());
    for use_authority in [false, true] {
        let config = SearchConfig { use_authority, ..SearchConfig::default() };
        let session = QuerySession::load(&paths, config).unwrap();
        assert_eq!(titles(&session, "Aardvark"), vec!["A"]);
    }
}

#[test]
fn stopword_query_has_no_results() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path(), chain_pages());
    let session = QuerySession::load(&paths, SearchConfig::default()).unwrap();
    assert!(session.search("the of and").unwrap().results.is_empty());
    assert_eq!(repl(&session, "the of and\n:quit\n"), format!("search> {NO_RESULTS}\nsearch> "));
}

#[test]
fn repeated_query_is_identical() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path(), hub_pages());
    let config = SearchConfig { use_authority: true, ..SearchConfig::default() };
    let first = QuerySession::load(&paths, config.clone()).unwrap();
    let second = QuerySession::load(&paths, config).unwrap();
    let a = first.search("zebra pilot").unwrap().results;
    let b = first.search("zebra pilot").unwrap().results;
    let c = second.search("zebra pilot").unwrap().results;
    assert_eq!(a, b);
    assert_eq!(a, c);
    assert_eq!(repl(&first, "zebra\nzebra\n"), repl(&second, "zebra\nzebra\n"));
}

#[test]
fn pagerank_lifts_the_linked_hub() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path(), hub_pages());
    let lexical = QuerySession::load(&paths, SearchConfig::default()).unwrap();
    assert_eq!(titles(&lexical, "zebra"), vec!["Pilot", "Hub"]);
    let config = SearchConfig { use_authority: true, ..SearchConfig::default() };
    let weighted = QuerySession::load(&paths, config).unwrap();
    assert_eq!(titles(&weighted, "zebra"), vec!["Hub", "Pilot"]);
}

#[test]
fn at_most_k_results_with_id_tie_break() {
    let dir = tempdir().unwrap();
    let mut pages: Vec<Page> = (1..=12).map(|i| Page::new(i, format!("Doc {i}"), "walrus")).collect();
    pages.push(Page::new(13, "Other", "nothing here"));
    let paths = build_tiny_index(dir.path(), pages);
    let session = QuerySession::load(&paths, SearchConfig::default()).unwrap();
    let hits = session.search("walrus").unwrap().results;
    assert_eq!(hits.len(), 10);
    assert_eq!(hits.iter().map(|h| h.doc_id).collect::<Vec<_>>(), (1..=10).collect::<Vec<_>>());
}

#[test]
fn repl_prints_titles_and_stops_at_quit() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path(), chain_pages());
    let session = QuerySession::load(&paths, SearchConfig::default()).unwrap();
    let out = repl(&session, "capybara\n\n:quit\nbison\n");
    assert_eq!(out, format!("search> C\nsearch> {NO_RESULTS}\nsearch> "));
}

#[test]
fn repl_ends_at_end_of_input() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path(), chain_pages());
    let session = QuerySession::load(&paths, SearchConfig::default()).unwrap();
    assert_eq!(repl(&session, "bison"), "search> B\nsearch> ");
}

#[test]
fn expired_budget_reports_timeout() {
    let dir = tempdir().unwrap();
    let paths = build_tiny_index(dir.path(), chain_pages());
    let config = SearchConfig { timeout: Some(Duration::ZERO), ..SearchConfig::default() };
    let session = QuerySession::load(&paths, config).unwrap();
    assert_eq!(session.search("bison").unwrap_err(), SearchError::Timeout(Duration::ZERO));
}

#[test]
fn missing_tables_fail_to_load() {
    let dir = tempdir().unwrap();
    let paths = TablePaths::new(dir.path().join("t"), dir.path().join("d"), dir.path().join("w"));
    assert!(QuerySession::load(&paths, SearchConfig::default()).is_err());
}
