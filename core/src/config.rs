use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Parameters of the PageRank power iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    /// Probability of following a real link; the rest teleports uniformly.
    pub damping: f64,
    /// Euclidean distance between successive vectors at which iteration stops.
    pub epsilon: f64,
    /// Ceiling on iterations in case floating point never settles.
    pub max_iterations: usize,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self { damping: 0.85, epsilon: 0.001, max_iterations: 1000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub top_k: usize,
    /// Multiply lexical scores by each document's authority.
    pub use_authority: bool,
    pub timeout: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { top_k: 10, use_authority: false, timeout: None }
    }
}
