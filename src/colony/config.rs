//! Hyperparameters and fit options for the ant colony.

use crate::error::{AcoError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Rule used when an ant exploits instead of exploring
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exploitation {
    /// Pick the highest node id still available, ignoring the probability matrix
    #[default]
    HighestNodeId,
    /// Follow the available edge with the largest transition weight (ACS rule)
    HighestProbability,
}

/// Optimization direction for tour scores
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Minimize,
    Maximize,
}

impl Mode {
    /// True if `candidate` beats `incumbent` under this mode
    #[inline]
    pub fn is_better(self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Mode::Minimize => candidate < incumbent,
            Mode::Maximize => candidate > incumbent,
        }
    }
}

impl TryFrom<i32> for Mode {
    type Error = AcoError;

    fn try_from(flag: i32) -> Result<Self> {
        match flag {
            0 => Ok(Mode::Minimize),
            1 => Ok(Mode::Maximize),
            other => Err(AcoError::InvalidMode(other)),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Minimize => write!(f, "minimize"),
            Mode::Maximize => write!(f, "maximize"),
        }
    }
}

/// ACO configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcoParams {
    /// Number of ants per iteration
    pub num_ants: usize,
    /// Pheromone evaporation rate
    pub evaporation_rate: f64,
    /// Multiplicative boost applied to the best tour's edges
    pub intensification: f64,
    /// Pheromone importance
    pub alpha: f64,
    /// Heuristic importance
    pub beta: f64,
    /// Decay rate of the heuristic matrix
    pub beta_decay: f64,
    /// Exploitation probability
    pub rho: f64,
    /// Exploitation rule
    pub exploitation: Exploitation,
    /// Random seed
    pub seed: u64,
}

impl Default for AcoParams {
    fn default() -> Self {
        AcoParams {
            num_ants: 10,
            evaporation_rate: 0.1,
            intensification: 2.0,
            alpha: 1.0,
            beta: 1.0,
            beta_decay: 0.0,
            rho: 0.1,
            exploitation: Exploitation::HighestNodeId,
            seed: 42,
        }
    }
}

impl AcoParams {
    /// Load parameters from a JSON file. Missing fields take their default value.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Options of a single `fit` call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    /// Maximum number of iterations
    pub iterations: usize,
    /// Whether the shortest or the longest tour is sought
    pub mode: Mode,
    /// Consecutive iterations matching the best score before stopping
    pub early_stopping: usize,
}

impl Default for FitOptions {
    fn default() -> Self {
        FitOptions {
            iterations: 100,
            mode: Mode::Minimize,
            early_stopping: 20,
        }
    }
}

impl FitOptions {
    pub(crate) fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(AcoError::invalid_parameter("iterations must be at least 1"));
        }
        if self.early_stopping == 0 {
            return Err(AcoError::invalid_parameter("early_stopping must be at least 1"));
        }
        Ok(())
    }
}
