//! Multi-seed benchmarking of the ant colony.
//!
//! Runs the optimizer once per seed on the same distance matrix, collects
//! per-run results, and summarizes them. For instances small enough for
//! exhaustive search, every run is compared with the exact optimum.

use crate::colony::config::{AcoParams, FitOptions};
use crate::colony::optimizer::AntColonyOptimizer;
use crate::error::Result;
use crate::exact::{BruteForceSolver, ExactResult, MAX_EXACT_NODES};
use crate::matrix::DistanceMatrix;

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use std::path::Path;

/// Result of a single optimizer run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub seed: u64,
    pub score: f64,
    /// Iterations actually run
    pub iterations: usize,
    pub stopped_early: bool,
    /// Computation time in seconds
    pub time: f64,
    /// Relative gap to the exact optimum in percent (if known)
    pub gap_to_optimum: Option<f64>,
}

/// Aggregated statistics over all runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStatistics {
    pub num_runs: usize,
    pub best_score: f64,
    pub worst_score: f64,
    pub mean_score: f64,
    pub std_score: f64,
    pub avg_time: f64,
    pub avg_iterations: f64,
    /// Runs that matched the exact optimum (if known)
    pub optimal_runs: Option<usize>,
}

/// Benchmark configuration
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Number of runs, one per seed
    pub num_runs: usize,
    /// Seed of the first run; run `k` uses `first_seed + k`
    pub first_seed: u64,
    pub params: AcoParams,
    pub options: FitOptions,
    /// Compute the exact optimum when the instance is small enough
    pub compare_exact: bool,
    pub show_progress: bool,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        BenchmarkConfig {
            num_runs: 10,
            first_seed: 0,
            params: AcoParams::default(),
            options: FitOptions::default(),
            compare_exact: true,
            show_progress: true,
        }
    }
}

/// Benchmarking engine
pub struct Benchmark {
    config: BenchmarkConfig,
    results: Vec<RunResult>,
    exact: Option<ExactResult>,
}

impl Benchmark {
    pub fn new(config: BenchmarkConfig) -> Self {
        Benchmark {
            config,
            results: Vec::new(),
            exact: None,
        }
    }

    /// Run every seed on `distances`, replacing previous results
    pub fn run(&mut self, distances: &DistanceMatrix) -> Result<()> {
        self.results.clear();
        self.exact = None;

        if self.config.compare_exact && distances.dimension() <= MAX_EXACT_NODES {
            let exact = BruteForceSolver::new(self.config.options.mode).solve(distances)?;
            log::info!(
                "exact optimum {:.4} over {} tours",
                exact.score,
                exact.tours_evaluated
            );
            self.exact = Some(exact);
        }

        let progress = if self.config.show_progress {
            let bar = ProgressBar::new(self.config.num_runs as u64);
            if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} runs {msg}") {
                bar.set_style(style);
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        for run in 0..self.config.num_runs {
            let seed = self.config.first_seed + run as u64;
            let mut params = self.config.params.clone();
            params.seed = seed;

            let mut aco = AntColonyOptimizer::with_params(params);
            let score = aco.fit(distances, &self.config.options)?;

            let (iterations, stopped_early, time) = aco
                .report()
                .map_or((0, false, 0.0), |r| (r.iterations, r.stopped_early, r.fit_time));

            let gap_to_optimum = self
                .exact
                .as_ref()
                .map(|exact| relative_gap(score, exact.score));

            progress.set_message(format!("seed {} -> {:.2}", seed, score));
            progress.inc(1);

            self.results.push(RunResult {
                seed,
                score,
                iterations,
                stopped_early,
                time,
                gap_to_optimum,
            });
        }

        progress.finish_and_clear();
        Ok(())
    }

    /// Compute statistics over the recorded runs
    pub fn compute_statistics(&self) -> Option<RunStatistics> {
        if self.results.is_empty() {
            return None;
        }

        let scores: Vec<f64> = self.results.iter().map(|r| r.score).collect();
        let mode = self.config.options.mode;

        let best_score = scores
            .iter()
            .copied()
            .fold(scores[0], |best, s| if mode.is_better(s, best) { s } else { best });
        let worst_score = scores
            .iter()
            .copied()
            .fold(scores[0], |worst, s| if mode.is_better(worst, s) { s } else { worst });

        let std_score = if scores.len() > 1 { scores.iter().std_dev() } else { 0.0 };

        let optimal_runs = self.exact.as_ref().map(|exact| {
            self.results
                .iter()
                .filter(|r| relative_gap(r.score, exact.score).abs() < 1e-9)
                .count()
        });

        Some(RunStatistics {
            num_runs: self.results.len(),
            best_score,
            worst_score,
            mean_score: scores.iter().mean(),
            std_score,
            avg_time: self.results.iter().map(|r| r.time).mean(),
            avg_iterations: self.results.iter().map(|r| r.iterations as f64).mean(),
            optimal_runs,
        })
    }

    /// Export per-run results to CSV
    pub fn export_to_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)?;

        for result in &self.results {
            writer.serialize(result)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Generate summary report
    pub fn generate_report(&self) -> String {
        let mut report = String::new();

        report.push_str("========================================\n");
        report.push_str("        ACO TSP Benchmark Report\n");
        report.push_str("========================================\n\n");

        report.push_str(&format!(
            "Mode: {}, iterations: {}, early stopping: {}, ants: {}\n",
            self.config.options.mode,
            self.config.options.iterations,
            self.config.options.early_stopping,
            self.config.params.num_ants
        ));

        if let Some(exact) = &self.exact {
            report.push_str(&format!("Exact optimum: {:.4} {:?}\n", exact.score, exact.path));
        }

        let Some(stats) = self.compute_statistics() else {
            report.push_str("No runs recorded.\n");
            return report;
        };

        report.push_str("-".repeat(60).as_str());
        report.push('\n');
        report.push_str(&format!("{:<20} {:>12}\n", "Runs", stats.num_runs));
        report.push_str(&format!("{:<20} {:>12.4}\n", "Best", stats.best_score));
        report.push_str(&format!("{:<20} {:>12.4}\n", "Worst", stats.worst_score));
        report.push_str(&format!("{:<20} {:>12.4}\n", "Mean", stats.mean_score));
        report.push_str(&format!("{:<20} {:>12.4}\n", "Std dev", stats.std_score));
        report.push_str(&format!("{:<20} {:>12.2}\n", "Avg iterations", stats.avg_iterations));
        report.push_str(&format!("{:<20} {:>11.4}s\n", "Avg time", stats.avg_time));
        if let Some(optimal) = stats.optimal_runs {
            report.push_str(&format!(
                "{:<20} {:>12}\n",
                "Optimal runs",
                format!("{}/{}", optimal, stats.num_runs)
            ));
        }
        report.push_str("-".repeat(60).as_str());
        report.push('\n');

        report
    }

    /// Get all results
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    pub fn exact(&self) -> Option<&ExactResult> {
        self.exact.as_ref()
    }
}

/// Gap of `score` relative to `optimum`, in percent
fn relative_gap(score: f64, optimum: f64) -> f64 {
    if optimum == 0.0 {
        return 0.0;
    }
    (score - optimum).abs() / optimum.abs() * 100.0
}
