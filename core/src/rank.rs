//! PageRank authority over the link graph.
//!
//! The transition matrix is never materialized. A step splits each row into
//! the uniform teleport share, which is the same for every target and is
//! added in closed form, and the link share, which is gathered over each
//! page's inbound links. One iteration costs O(N + E).

use crate::config::RankConfig;
use crate::corpus::Corpus;
use crate::index::DocId;
use crate::links::LinkGraph;
use rayon::prelude::*;
use std::collections::{BTreeMap, HashMap};

/// Authority score per document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorityVector {
    ranks: BTreeMap<DocId, f64>,
}

impl AuthorityVector {
    pub fn new() -> Self { Self::default() }

    /// Authority of `id`, or 0 for an unknown document.
    pub fn get(&self, id: DocId) -> f64 { self.ranks.get(&id).copied().unwrap_or(0.0) }

    pub fn insert(&mut self, id: DocId, rank: f64) { self.ranks.insert(id, rank); }

    pub fn len(&self) -> usize { self.ranks.len() }

    pub fn is_empty(&self) -> bool { self.ranks.is_empty() }

    pub fn sum(&self) -> f64 { self.ranks.values().sum() }

    /// Entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, f64)> + '_ {
        self.ranks.iter().map(|(id, rank)| (*id, *rank))
    }
}

impl FromIterator<(DocId, f64)> for AuthorityVector {
    fn from_iter<I: IntoIterator<Item = (DocId, f64)>>(iter: I) -> Self {
        Self { ranks: iter.into_iter().collect() }
    }
}

/// Sparse view of the N×N transition matrix.
#[derive(Debug, Clone)]
pub struct WeightMatrix {
    damping: f64,
    ids: Vec<DocId>,
    index: HashMap<DocId, usize>,
    outbound: Vec<Vec<usize>>,
    inbound: Vec<Vec<usize>>,
}

impl WeightMatrix {
    pub fn new(corpus: &Corpus, graph: &LinkGraph, damping: f64) -> Self {
        let ids = corpus.ids().to_vec();
        let index: HashMap<DocId, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        let mut outbound = vec![Vec::new(); ids.len()];
        let mut inbound = vec![Vec::new(); ids.len()];
        for (k, id) in ids.iter().enumerate() {
            for title in graph.targets(*id) {
                let Some(j) = corpus.id_of(title).map(|t| index[&t]) else { continue };
                if j != k && !outbound[k].contains(&j) {
                    outbound[k].push(j);
                    inbound[j].push(k);
                }
            }
        }
        Self { damping, ids, index, outbound, inbound }
    }

    pub fn size(&self) -> usize { self.ids.len() }

    /// Probability of moving from page `k` to page `j` in one step.
    pub fn weight(&self, k: DocId, j: DocId) -> f64 {
        let n = self.size() as f64;
        let teleport = (1.0 - self.damping) / n;
        match (self.index.get(&k), self.index.get(&j)) {
            (Some(&k), Some(&j)) if k != j && self.outbound[k].contains(&j) => {
                teleport + self.damping / self.outbound[k].len() as f64
            }
            _ => teleport,
        }
    }

    /// One power-iteration step. `prev` is only read; the result is a new vector.
    fn step(&self, prev: &[f64]) -> Vec<f64> {
        let n = self.size() as f64;
        let teleport = (1.0 - self.damping) / n * prev.iter().sum::<f64>();
        (0..self.size())
            .into_par_iter()
            .map(|j| {
                let link_share: f64 = self.inbound[j]
                    .iter()
                    .map(|&k| self.damping * prev[k] / self.outbound[k].len() as f64)
                    .sum();
                teleport + link_share
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankOutcome {
    pub authority: AuthorityVector,
    pub iterations: usize,
    pub converged: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RankEngine {
    config: RankConfig,
}

impl RankEngine {
    pub fn new(config: RankConfig) -> Self { Self { config } }

    pub fn config(&self) -> &RankConfig { &self.config }

    /// Iterate from the uniform vector until two successive vectors are within
    /// `epsilon` of each other. At least one step always runs.
    pub fn rank(&self, corpus: &Corpus, graph: &LinkGraph) -> RankOutcome {
        let n = corpus.len();
        if n == 0 {
            return RankOutcome { authority: AuthorityVector::new(), iterations: 0, converged: true };
        }
        let matrix = WeightMatrix::new(corpus, graph, self.config.damping);
        let mut current = vec![1.0 / n as f64; n];
        let mut iterations = 0;
        let converged = loop {
            let prev = current;
            current = matrix.step(&prev);
            iterations += 1;
            let distance = euclidean_distance(&prev, &current);
            tracing::debug!(iterations, distance, "rank iteration");
            if distance <= self.config.epsilon {
                break true;
            }
            if iterations >= self.config.max_iterations {
                tracing::warn!(iterations, distance, "rank iteration ceiling reached before convergence");
                break false;
            }
        };
        let authority = matrix.ids.iter().copied().zip(current).collect();
        tracing::info!(num_docs = n, iterations, converged, "computed authority");
        RankOutcome { authority, iterations, converged }
    }
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum::<f64>().sqrt()
}
