//! Pheromone, heuristic and transition-weight matrices of one colony run.
//!
//! A [`ColonyState`] lives for exactly one `fit` call. It is rebuilt from the
//! distance matrix at the start of every fit, so nothing learned in a previous
//! run can leak into the next one.

use crate::colony::config::AcoParams;
use crate::error::{AcoError, Result};
use crate::matrix::DistanceMatrix;

#[derive(Debug, Clone, PartialEq)]
pub struct ColonyState {
    /// Learned desirability of each edge
    pub pheromone: Vec<Vec<f64>>,
    /// Inverse distance, decayed by `beta_decay` every iteration
    pub heuristic: Vec<Vec<f64>>,
    /// `pheromone^alpha * heuristic^beta`
    pub probability: Vec<Vec<f64>>,
    /// Nodes not yet visited by the ant under construction, ascending
    pub available_nodes: Vec<usize>,
    alpha: f64,
    beta: f64,
    evaporation_rate: f64,
    beta_decay: f64,
    intensification: f64,
}

impl ColonyState {
    /// Build the initial matrices for `distances`.
    ///
    /// Every off-diagonal distance must be finite and strictly positive: a zero
    /// distance between two distinct nodes has no inverse, so it is rejected
    /// before any matrix is allocated.
    pub fn init(distances: &DistanceMatrix, params: &AcoParams) -> Result<Self> {
        let n = distances.dimension();

        for i in 0..n {
            for j in 0..n {
                let value = distances.distance(i, j);
                if i != j && !(value.is_finite() && value > 0.0) {
                    return Err(AcoError::DegenerateDistance { from: i, to: j, value });
                }
            }
        }

        let mut pheromone = vec![vec![1.0; n]; n];
        let mut heuristic = vec![vec![0.0; n]; n];
        for i in 0..n {
            pheromone[i][i] = 0.0;
            for j in 0..n {
                if i != j {
                    heuristic[i][j] = 1.0 / distances.distance(i, j);
                }
            }
        }

        let mut state = ColonyState {
            pheromone,
            heuristic,
            probability: vec![vec![0.0; n]; n],
            available_nodes: (0..n).collect(),
            alpha: params.alpha,
            beta: params.beta,
            evaporation_rate: params.evaporation_rate,
            beta_decay: params.beta_decay,
            intensification: params.intensification,
        };
        state.update_probabilities();

        log::debug!(
            "colony state initialized for {} nodes (alpha={}, beta={})",
            n,
            params.alpha,
            params.beta
        );

        Ok(state)
    }

    /// Number of nodes
    #[inline]
    pub fn dimension(&self) -> usize {
        self.pheromone.len()
    }

    /// Recompute every transition weight from the current pheromone and heuristic
    pub fn update_probabilities(&mut self) {
        let (alpha, beta) = (self.alpha, self.beta);
        for ((prob_row, pher_row), heur_row) in self
            .probability
            .iter_mut()
            .zip(&self.pheromone)
            .zip(&self.heuristic)
        {
            for ((p, &tau), &eta) in prob_row.iter_mut().zip(pher_row).zip(heur_row) {
                *p = tau.powf(alpha) * eta.powf(beta);
            }
        }
    }

    /// Make every node available again for the next ant
    pub fn reinstate_nodes(&mut self) {
        let n = self.dimension();
        self.available_nodes.clear();
        self.available_nodes.extend(0..n);
    }

    /// Remove `node` from the available list, keeping the order of the rest
    pub fn remove_node(&mut self, node: usize) {
        if let Some(pos) = self.available_nodes.iter().position(|&n| n == node) {
            self.available_nodes.remove(pos);
        }
    }

    /// Decay pheromone by the evaporation rate and heuristic by `beta_decay`
    pub fn evaporation(&mut self) {
        let pheromone_factor = 1.0 - self.evaporation_rate;
        let heuristic_factor = 1.0 - self.beta_decay;

        for row in self.pheromone.iter_mut() {
            for tau in row.iter_mut() {
                *tau *= pheromone_factor;
            }
        }
        for row in self.heuristic.iter_mut() {
            for eta in row.iter_mut() {
                *eta *= heuristic_factor;
            }
        }
    }

    /// Multiply the pheromone on every edge `(coords_i[k], coords_j[k])` by the
    /// intensification constant. Each distinct edge is boosted once.
    ///
    /// Pheromone is capped at `f64::MAX`: an infinite entry would survive
    /// every later evaporation.
    pub fn intensify(&mut self, coords_i: &[usize], coords_j: &[usize]) {
        let n = self.dimension();
        let mut boosted = vec![false; n * n];

        for (&from, &to) in coords_i.iter().zip(coords_j) {
            let cell = from * n + to;
            if boosted[cell] {
                continue;
            }
            boosted[cell] = true;
            let tau = &mut self.pheromone[from][to];
            *tau = (*tau * self.intensification).min(f64::MAX);
        }
    }
}
