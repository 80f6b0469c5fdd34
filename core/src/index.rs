use crate::error::IndexError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Posting {
    pub doc_id: DocId,
    pub weight: f64, // tf * idf
}

/// Sparse `term -> (document -> weight)` relevance table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermWeights {
    terms: HashMap<String, HashMap<DocId, f64>>,
}

impl TermWeights {
    pub fn new() -> Self { Self::default() }

    /// Weight of `term` in `doc`; 0 when the term does not occur there.
    pub fn weight(&self, term: &str, doc: DocId) -> f64 {
        self.terms.get(term).and_then(|docs| docs.get(&doc)).copied().unwrap_or(0.0)
    }

    pub fn postings(&self, term: &str) -> Option<&HashMap<DocId, f64>> { self.terms.get(term) }

    /// Number of documents with an entry for `term`.
    pub fn df(&self, term: &str) -> usize { self.terms.get(term).map_or(0, HashMap::len) }

    pub fn num_terms(&self) -> usize { self.terms.len() }

    pub fn insert(&mut self, term: impl Into<String>, doc: DocId, weight: f64) {
        self.terms.entry(term.into()).or_default().insert(doc, weight);
    }

    /// Terms in lexicographic order with postings sorted by doc id.
    pub fn sorted_postings(&self) -> Vec<(&str, Vec<Posting>)> {
        let mut out: Vec<(&str, Vec<Posting>)> = self
            .terms
            .iter()
            .map(|(term, docs)| {
                let mut postings: Vec<Posting> =
                    docs.iter().map(|(doc_id, weight)| Posting { doc_id: *doc_id, weight: *weight }).collect();
                postings.sort_by_key(|p| p.doc_id);
                (term.as_str(), postings)
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(b.0));
        out
    }
}

/// Accumulates term frequencies one document at a time, then applies IDF once.
#[derive(Debug, Default)]
pub struct TermWeightBuilder {
    table: TermWeights,
    seen: HashSet<DocId>,
}

impl TermWeightBuilder {
    pub fn new() -> Self { Self::default() }

    /// Count `terms` for `doc` and store each count divided by the document's
    /// highest count. Returns that highest count (0 for an empty sequence).
    pub fn add_document(&mut self, doc: DocId, terms: &[String]) -> Result<u32, IndexError> {
        if !self.seen.insert(doc) {
            return Err(IndexError::DuplicateDocument(doc));
        }
        let mut counts: HashMap<&str, u32> = HashMap::new();
        let mut max_count = 0u32;
        for term in terms {
            let count = counts.entry(term.as_str()).or_insert(0);
            *count += 1;
            max_count = max_count.max(*count);
        }
        for (term, count) in counts {
            self.table.insert(term, doc, count as f64 / max_count as f64);
        }
        Ok(max_count)
    }

    /// Term frequencies counted so far, before IDF is applied.
    pub fn frequencies(&self) -> &TermWeights { &self.table }

    /// Multiply every entry by `log10(num_docs / df(term))`.
    pub fn finish(mut self, num_docs: usize) -> TermWeights {
        let n = num_docs.max(self.seen.len()) as f64;
        for docs in self.table.terms.values_mut() {
            let idf = (n / docs.len() as f64).log10();
            for weight in docs.values_mut() {
                *weight *= idf;
            }
        }
        tracing::debug!(num_docs, num_terms = self.table.num_terms(), "applied idf");
        self.table
    }
}
