//! ACO TSP Solver Library
//!
//! Ant Colony Optimization for the Traveling Salesman Problem over a square
//! distance matrix.
//!
//! # Features
//!
//! - Ant colony optimizer with pheromone evaporation and best-tour intensification
//! - Minimization or maximization of the tour length
//! - Early stopping once the best score stops changing
//! - Seeded, reproducible runs
//! - Exhaustive solver for ground truth on small instances
//! - Multi-seed benchmarking with CSV export
//!
//! # Example
//!
//! ```no_run
//! use aco_tsp::{AntColonyOptimizer, DistanceMatrix, FitOptions};
//!
//! let distances = DistanceMatrix::from_rows(vec![
//!     vec![0.0, 4.0, 1.0, 3.0],
//!     vec![4.0, 0.0, 2.0, 5.0],
//!     vec![1.0, 2.0, 0.0, 5.0],
//!     vec![3.0, 1.0, 5.0, 0.0],
//! ]).unwrap();
//!
//! let mut optimizer = AntColonyOptimizer::new(10, 0.1, 2.0, 1.0, 1.0, 0.0, 0.1);
//! let best = optimizer.fit(&distances, &FitOptions::default()).unwrap();
//!
//! println!("best score: {}", best);
//! println!("best tour: {:?}", optimizer.best_path());
//! ```

pub mod error;
pub mod matrix;
pub mod solution;
pub mod colony;
pub mod exact;
pub mod benchmark;

pub use error::{AcoError, Result};
pub use matrix::DistanceMatrix;
pub use solution::FitReport;
pub use colony::{AcoParams, AntColonyOptimizer, Exploitation, FitOptions, Mode};
