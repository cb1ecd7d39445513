//! Exact solver by exhaustive enumeration.
//!
//! Only practical for small instances; used as ground truth when checking
//! how close the colony gets to the optimum.

use crate::colony::config::Mode;
use crate::error::{AcoError, Result};
use crate::matrix::DistanceMatrix;
use serde::{Deserialize, Serialize};

/// Largest instance the enumeration accepts ((n - 1)! tours)
pub const MAX_EXACT_NODES: usize = 11;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactResult {
    /// Optimal closed tour, starting and ending at node 0
    pub path: Vec<usize>,
    pub score: f64,
    /// Number of complete tours enumerated
    pub tours_evaluated: u64,
}

#[derive(Debug, Clone, Default)]
pub struct BruteForceSolver {
    pub mode: Mode,
}

impl BruteForceSolver {
    pub fn new(mode: Mode) -> Self {
        BruteForceSolver { mode }
    }

    /// Enumerate every Hamiltonian cycle through node 0 and keep the best.
    /// Rotations of a cycle have the same score, so fixing the start loses nothing.
    pub fn solve(&self, distances: &DistanceMatrix) -> Result<ExactResult> {
        let n = distances.dimension();
        if n > MAX_EXACT_NODES {
            return Err(AcoError::invalid_parameter(format!(
                "exhaustive search supports at most {} nodes, got {}",
                MAX_EXACT_NODES, n
            )));
        }

        let mut search = Search {
            distances,
            mode: self.mode,
            path: Vec::with_capacity(n + 1),
            visited: vec![false; n],
            best: None,
            tours_evaluated: 0,
        };
        search.path.push(0);
        search.visited[0] = true;
        search.extend(0.0);

        let (score, path) = search.best.unwrap_or((0.0, vec![0, 0]));
        Ok(ExactResult {
            path,
            score,
            tours_evaluated: search.tours_evaluated,
        })
    }
}

struct Search<'a> {
    distances: &'a DistanceMatrix,
    mode: Mode,
    path: Vec<usize>,
    visited: Vec<bool>,
    best: Option<(f64, Vec<usize>)>,
    tours_evaluated: u64,
}

impl Search<'_> {
    fn extend(&mut self, length: f64) {
        let n = self.visited.len();
        let last = self.path[self.path.len() - 1];

        if self.path.len() == n {
            let total = length + self.distances.distance(last, 0);
            self.tours_evaluated += 1;

            let improved = self
                .best
                .as_ref()
                .map_or(true, |(best, _)| self.mode.is_better(total, *best));
            if improved {
                let mut tour = self.path.clone();
                tour.push(0);
                self.best = Some((total, tour));
            }
            return;
        }

        for next in 1..n {
            if self.visited[next] {
                continue;
            }
            self.visited[next] = true;
            self.path.push(next);
            self.extend(length + self.distances.distance(last, next));
            self.path.pop();
            self.visited[next] = false;
        }
    }
}
