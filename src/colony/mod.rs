//! Ant Colony Optimization for the TSP.
//!
//! Every iteration each ant walks a closed tour guided by the transition
//! weights `pheromone^alpha * heuristic^beta`, the best tour of the iteration
//! is reinforced, and all trails evaporate.

pub mod config;
pub mod state;
pub mod ant;
pub mod evaluate;
pub mod optimizer;

pub use config::*;
pub use state::ColonyState;
pub use ant::{choose_next_node, construct_tour};
pub use evaluate::{evaluate, Evaluation};
pub use optimizer::AntColonyOptimizer;
