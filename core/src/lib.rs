//! Link-aware document search: term weighting, PageRank authority and
//! top-k query ranking over a corpus of interlinked pages.

pub mod config;
pub mod corpus;
pub mod error;
pub mod index;
pub mod links;
pub mod normalize;
pub mod persist;
pub mod pipeline;
pub mod rank;
pub mod search;
pub mod tokenizer;

pub use config::{RankConfig, SearchConfig};
pub use corpus::{Corpus, Page, RawPage};
pub use error::{IndexError, MalformedRecord, SearchError, StoreError};
pub use index::{DocId, Posting, TermWeightBuilder, TermWeights};
pub use links::LinkGraph;
pub use normalize::{EnglishNormalizer, Normalizer};
pub use pipeline::{query_terms, IndexBuild, IndexTables, Indexer};
pub use rank::{AuthorityVector, RankEngine, RankOutcome, WeightMatrix};
pub use search::{ScoreMode, ScoredDocument, Scorer};
