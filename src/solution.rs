//! Result of an optimizer run.

use crate::colony::config::Mode;
use serde::{Deserialize, Serialize};

/// Outcome of one `fit` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// Best closed tour found (first node repeated at the end)
    pub best_path: Vec<usize>,
    /// Score of `best_path`
    pub best_score: f64,
    /// Iteration-best score of every completed iteration
    pub best_series: Vec<f64>,
    pub mode: Mode,
    /// Number of iterations actually run
    pub iterations: usize,
    /// Whether the run ended through early stopping before its iteration budget
    pub stopped_early: bool,
    /// Wall time of the fit in seconds
    pub fit_time: f64,
}

impl FitReport {
    /// Best score seen up to and including each iteration
    pub fn running_best(&self) -> Vec<f64> {
        let mut running = Vec::with_capacity(self.best_series.len());
        for &score in &self.best_series {
            let next = match running.last() {
                Some(&best) if !self.mode.is_better(score, best) => best,
                _ => score,
            };
            running.push(next);
        }
        running
    }
}

impl std::fmt::Display for FitReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ACO fit ({})", self.mode)?;
        writeln!(f, "  Best score: {:.4}", self.best_score)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        if self.stopped_early {
            writeln!(f, "  Stopped early: yes")?;
        }
        writeln!(f, "  Time: {:.4}s", self.fit_time)?;
        writeln!(f, "  Tour: {:?}", self.best_path)
    }
}
