//! Tour construction for a single ant.

use crate::colony::config::{AcoParams, Exploitation};
use crate::colony::state::ColonyState;
use ordered_float::OrderedFloat;
use rand::distributions::WeightedIndex;
use rand::prelude::*;

/// Pick the next node among `state.available_nodes`.
///
/// With probability `rho` the ant exploits according to `exploitation`,
/// otherwise it samples from the transition weights of `current` restricted
/// to the available nodes. The caller removes the returned node afterwards.
///
/// # Panics
///
/// Panics if no node is available.
pub fn choose_next_node<R: Rng + ?Sized>(
    state: &ColonyState,
    current: usize,
    rho: f64,
    exploitation: Exploitation,
    rng: &mut R,
) -> usize {
    let available = &state.available_nodes;
    assert!(!available.is_empty(), "no available node to move to from {}", current);

    let row = &state.probability[current];

    if rng.gen::<f64>() < rho {
        return match exploitation {
            Exploitation::HighestNodeId => available.iter().copied().fold(available[0], usize::max),
            // reversed so that ties resolve to the first candidate
            Exploitation::HighestProbability => available
                .iter()
                .rev()
                .max_by_key(|&&node| OrderedFloat(row[node]))
                .map_or(available[0], |&node| node),
        };
    }

    let mut weights: Vec<f64> = available.iter().map(|&node| row[node]).collect();
    let mut total: f64 = weights.iter().sum();

    // saturated pheromone: rescale so sampling keeps the learned preference and
    // the sampler's range stays finite
    if total > f64::MAX / 2.0 {
        let peak = weights.iter().copied().fold(0.0, f64::max);
        for weight in weights.iter_mut() {
            *weight = match (peak.is_infinite(), weight.is_infinite()) {
                (true, true) => 1.0,
                (true, false) => 0.0,
                (false, _) => *weight / peak,
            };
        }
        total = weights.iter().sum();
    }

    if total.is_finite() && total > 0.0 {
        if let Ok(distribution) = WeightedIndex::new(&weights) {
            return available[distribution.sample(rng)];
        }
    }

    log::trace!(
        "transition weights from node {} unusable (sum {}), sampling uniformly",
        current,
        total
    );
    available[rng.gen_range(0..available.len())]
}

/// Walk one ant over every node and return the closed tour (length n + 1)
pub fn construct_tour<R: Rng + ?Sized>(
    state: &mut ColonyState,
    params: &AcoParams,
    rng: &mut R,
) -> Vec<usize> {
    state.reinstate_nodes();

    let n = state.dimension();
    let mut path = Vec::with_capacity(n + 1);

    let start = state.available_nodes[rng.gen_range(0..n)];
    let mut current = start;

    loop {
        path.push(current);
        state.remove_node(current);

        if state.available_nodes.is_empty() {
            break;
        }
        current = choose_next_node(state, current, params.rho, params.exploitation, rng);
    }

    path.push(start);
    path
}
