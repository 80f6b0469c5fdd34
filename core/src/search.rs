use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::index::{DocId, TermWeights};
use crate::rank::AuthorityVector;
use rayon::prelude::*;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreMode {
    /// Sum of the query terms' weights in the document.
    Lexical,
    /// Lexical score scaled by the document's authority.
    AuthorityWeighted,
}

/// A document and its score for one query.
///
/// Ordered so that the better hit compares greater: higher score first, then
/// lower id among equal scores.
#[derive(Debug, Clone, Copy)]
pub struct ScoredDocument {
    pub score: f64,
    pub id: DocId,
}

impl Ord for ScoredDocument {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score.total_cmp(&other.score).then_with(|| other.id.cmp(&self.id))
    }
}

impl PartialOrd for ScoredDocument {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl PartialEq for ScoredDocument {
    fn eq(&self, other: &Self) -> bool { self.cmp(other) == Ordering::Equal }
}

impl Eq for ScoredDocument {}

pub struct Scorer<'a> {
    weights: &'a TermWeights,
    authority: &'a AuthorityVector,
    docs: &'a [DocId],
    mode: ScoreMode,
    top_k: usize,
    timeout: Option<Duration>,
}

impl<'a> Scorer<'a> {
    pub fn new(weights: &'a TermWeights, authority: &'a AuthorityVector, docs: &'a [DocId], config: &SearchConfig) -> Self {
        let mode = if config.use_authority { ScoreMode::AuthorityWeighted } else { ScoreMode::Lexical };
        Self { weights, authority, docs, mode, top_k: config.top_k, timeout: config.timeout }
    }

    pub fn mode(&self) -> ScoreMode { self.mode }

    /// Score of one document. Terms missing from the table add nothing, and a
    /// repeated query term counts every time it appears.
    pub fn score(&self, terms: &[String], doc: DocId) -> f64 {
        let lexical: f64 = terms.iter().map(|t| self.weights.weight(t, doc)).sum();
        match self.mode {
            ScoreMode::Lexical => lexical,
            ScoreMode::AuthorityWeighted => self.authority.get(doc) * lexical,
        }
    }

    /// Every document with a non-zero score, in no particular order.
    pub fn score_all(&self, terms: &[String]) -> Result<Vec<ScoredDocument>, SearchError> {
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let deadline = self.timeout.map(|t| (Instant::now() + t, t));
        let scored = self
            .docs
            .par_iter()
            .map(|&id| {
                if let Some((deadline, budget)) = deadline {
                    if Instant::now() >= deadline {
                        return Err(SearchError::Timeout(budget));
                    }
                }
                let score = self.score(terms, id);
                Ok((score != 0.0).then_some(ScoredDocument { score, id }))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scored.into_iter().flatten().collect())
    }

    /// The best `top_k` documents for the normalized query terms, best first.
    pub fn search(&self, terms: &[String]) -> Result<Vec<ScoredDocument>, SearchError> {
        let scored = self.score_all(terms)?;
        let total_hits = scored.len();
        let hits = top_k(scored, self.top_k);
        tracing::debug!(terms = terms.len(), total_hits, returned = hits.len(), "scored query");
        Ok(hits)
    }
}

/// Keep the `k` best documents, sorted best first. Equal scores are ordered
/// by ascending id.
pub fn top_k(scored: impl IntoIterator<Item = ScoredDocument>, k: usize) -> Vec<ScoredDocument> {
    let mut heap: BinaryHeap<Reverse<ScoredDocument>> = BinaryHeap::new();
    for doc in scored {
        heap.push(Reverse(doc));
        if heap.len() > k {
            heap.pop();
        }
    }
    let mut out: Vec<ScoredDocument> = heap.into_iter().map(|Reverse(d)| d).collect();
    out.sort_by(|a, b| b.cmp(a));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sd(score: f64, id: DocId) -> ScoredDocument { ScoredDocument { score, id } }

    fn ids(hits: &[ScoredDocument]) -> Vec<DocId> { hits.iter().map(|h| h.id).collect() }

    fn tables() -> (TermWeights, AuthorityVector, Vec<DocId>) {
        let mut w = TermWeights::new();
        w.insert("cat", 1, 0.4);
        w.insert("cat", 2, 0.2);
        w.insert("dog", 2, 0.3);
        let authority: AuthorityVector = [(1, 0.1), (2, 0.6), (3, 0.3)].into_iter().collect();
        (w, authority, vec![1, 2, 3])
    }

    #[test]
    fn top_k_orders_descending_with_id_tie_break() {
        let hits = top_k(vec![sd(0.5, 4), sd(0.9, 7), sd(0.5, 2), sd(0.1, 1)], 3);
        assert_eq!(ids(&hits), vec![7, 2, 4]);
    }

    #[test]
    fn top_k_returns_all_when_fewer_qualify() {
        let scored: Vec<_> = (1..=4).map(|i| sd(i as f64, i)).collect();
        assert_eq!(ids(&top_k(scored, 10)), vec![4, 3, 2, 1]);
        assert!(top_k(Vec::new(), 10).is_empty());
        assert!(top_k(vec![sd(1.0, 1)], 0).is_empty());
    }

    #[test]
    fn huge_k_keeps_every_hit() {
        let hits = top_k(vec![sd(1.0, 1), sd(2.0, 2)], usize::MAX);
        assert_eq!(ids(&hits), vec![2, 1]);
    }

    #[test]
    fn top_k_caps_at_k() {
        let scored: Vec<_> = (0..25).map(|i| sd((i % 7) as f64 + 1.0, i)).collect();
        let hits = top_k(scored, 10);
        assert_eq!(hits.len(), 10);
        assert!(hits.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn lexical_mode_sums_term_weights() {
        let (w, a, docs) = tables();
        let s = Scorer::new(&w, &a, &docs, &SearchConfig::default());
        let q = vec!["cat".to_string(), "dog".to_string(), "unknown".to_string()];
        assert!((s.score(&q, 2) - 0.5).abs() < 1e-12);
        assert_eq!(ids(&s.search(&q).unwrap()), vec![2, 1]);
    }

    #[test]
    fn repeated_query_terms_count_twice() {
        let (w, a, docs) = tables();
        let s = Scorer::new(&w, &a, &docs, &SearchConfig::default());
        let q = vec!["cat".to_string(), "cat".to_string()];
        assert!((s.score(&q, 1) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn authority_mode_scales_and_reorders() {
        let (w, a, docs) = tables();
        let config = SearchConfig { use_authority: true, ..SearchConfig::default() };
        let s = Scorer::new(&w, &a, &docs, &config);
        assert_eq!(s.mode(), ScoreMode::AuthorityWeighted);
        let hits = s.search(&["cat".to_string()]).unwrap();
        assert_eq!(ids(&hits), vec![2, 1]);
        assert!((hits[0].score - 0.12).abs() < 1e-12);
    }

    #[test]
    fn zero_scores_are_excluded() {
        let (w, a, docs) = tables();
        let s = Scorer::new(&w, &a, &docs, &SearchConfig::default());
        assert!(s.search(&["missing".to_string()]).unwrap().is_empty());
        assert!(s.search(&[]).unwrap().is_empty());
    }

    #[test]
    fn expired_deadline_times_out() {
        let (w, a, docs) = tables();
        let config = SearchConfig { timeout: Some(Duration::ZERO), ..SearchConfig::default() };
        let s = Scorer::new(&w, &a, &docs, &config);
        assert_eq!(s.search(&["cat".to_string()]), Err(SearchError::Timeout(Duration::ZERO)));
    }
}
