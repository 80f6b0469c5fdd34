use crate::config::{RankConfig, SearchConfig};
use crate::corpus::{Corpus, Page};
use crate::error::IndexError;
use crate::index::{TermWeightBuilder, TermWeights};
use crate::links::LinkGraph;
use crate::normalize::{EnglishNormalizer, Normalizer};
use crate::rank::{AuthorityVector, RankEngine};
use crate::search::Scorer;
use crate::tokenizer::{tokenize_page, tokenize_words};

/// Everything the query side needs: titles, authority and term weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexTables {
    pub corpus: Corpus,
    pub authority: AuthorityVector,
    pub weights: TermWeights,
}

impl IndexTables {
    pub fn scorer(&self, config: &SearchConfig) -> Scorer<'_> {
        Scorer::new(&self.weights, &self.authority, self.corpus.ids(), config)
    }
}

/// Result of one indexing run.
#[derive(Debug, Clone)]
pub struct IndexBuild {
    pub tables: IndexTables,
    pub links: LinkGraph,
    pub rank_iterations: usize,
    pub rank_converged: bool,
}

/// Runs tokenizing, link extraction, term weighting and ranking over a corpus.
pub struct Indexer {
    normalizer: Box<dyn Normalizer>,
    rank: RankEngine,
}

impl Default for Indexer {
    fn default() -> Self { Self::new(RankConfig::default()) }
}

impl Indexer {
    pub fn new(rank: RankConfig) -> Self {
        Self { normalizer: Box::new(EnglishNormalizer), rank: RankEngine::new(rank) }
    }

    /// Swap the stemming and stopword policy.
    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    pub fn build(&self, pages: Vec<Page>) -> Result<IndexBuild, IndexError> {
        let (corpus, pages) = Corpus::from_pages(pages);
        let mut links = LinkGraph::new();
        let mut builder = TermWeightBuilder::new();
        for page in &pages {
            let tokens = tokenize_page(&page.title, &page.body);
            links.record(page.id, &page.title, &tokens.links, &corpus);
            let terms = self.normalizer.normalize(&tokens.words);
            builder.add_document(page.id, &terms)?;
        }
        tracing::info!(num_docs = corpus.len(), num_links = links.edge_count(), "tokenized corpus");

        let weights = builder.finish(corpus.len());
        tracing::info!(num_terms = weights.num_terms(), "computed term weights");

        let outcome = self.rank.rank(&corpus, &links);
        Ok(IndexBuild {
            tables: IndexTables { corpus, authority: outcome.authority, weights },
            links,
            rank_iterations: outcome.iterations,
            rank_converged: outcome.converged,
        })
    }
}

/// Normalized terms of a free-text query.
pub fn query_terms<N: Normalizer + ?Sized>(normalizer: &N, query: &str) -> Vec<String> {
    normalizer.normalize(&tokenize_words(query))
}
