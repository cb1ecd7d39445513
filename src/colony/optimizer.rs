//! The ant colony optimizer and its fit loop.

use crate::colony::ant::construct_tour;
use crate::colony::config::{AcoParams, Exploitation, FitOptions, Mode};
use crate::colony::evaluate::evaluate;
use crate::colony::state::ColonyState;
use crate::error::{AcoError, Result};
use crate::matrix::DistanceMatrix;
use crate::solution::FitReport;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use std::time::Instant;

/// Ant Colony Optimization solver for the TSP.
///
/// The optimizer owns only its hyperparameters and the outcome of the last
/// successful fit. Pheromone, heuristic and probability matrices are built
/// fresh inside every [`fit`](Self::fit) call and dropped when it returns.
#[derive(Debug, Clone)]
pub struct AntColonyOptimizer {
    params: AcoParams,
    result: Option<FitReport>,
}

impl AntColonyOptimizer {
    pub fn new(
        num_ants: usize,
        evaporation_rate: f64,
        intensification: f64,
        alpha: f64,
        beta: f64,
        beta_decay: f64,
        rho: f64,
    ) -> Self {
        Self::with_params(AcoParams {
            num_ants,
            evaporation_rate,
            intensification,
            alpha,
            beta,
            beta_decay,
            rho,
            ..Default::default()
        })
    }

    pub fn with_params(params: AcoParams) -> Self {
        AntColonyOptimizer { params, result: None }
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.params.seed = seed;
        self
    }

    pub fn with_exploitation(mut self, exploitation: Exploitation) -> Self {
        self.params.exploitation = exploitation;
        self
    }

    pub fn params(&self) -> &AcoParams {
        &self.params
    }

    pub fn is_fitted(&self) -> bool {
        self.result.is_some()
    }

    /// Best closed tour of the last fit, empty before the first one
    pub fn best_path(&self) -> &[usize] {
        self.result.as_ref().map(|r| r.best_path.as_slice()).unwrap_or(&[])
    }

    pub fn best_score(&self) -> Option<f64> {
        self.result.as_ref().map(|r| r.best_score)
    }

    /// Iteration-best score history of the last fit
    pub fn best_series(&self) -> &[f64] {
        self.result.as_ref().map(|r| r.best_series.as_slice()).unwrap_or(&[])
    }

    /// Wall time of the last fit in seconds
    pub fn fit_time(&self) -> Option<f64> {
        self.result.as_ref().map(|r| r.fit_time)
    }

    pub fn report(&self) -> Option<&FitReport> {
        self.result.as_ref()
    }

    /// Fit with the integer mode flag (0 = minimize, 1 = maximize)
    pub fn fit_tsp(
        &mut self,
        distances: &DistanceMatrix,
        iterations: usize,
        mode: i32,
        early_stopping: usize,
    ) -> Result<f64> {
        let options = FitOptions {
            iterations,
            mode: Mode::try_from(mode)?,
            early_stopping,
        };
        self.fit(distances, &options)
    }

    /// Fit raw rows, rejecting non-square input before anything is built
    pub fn fit_rows(&mut self, rows: &[Vec<f64>], options: &FitOptions) -> Result<f64> {
        let distances = DistanceMatrix::from_rows(rows.to_vec())?;
        self.fit(&distances, options)
    }

    /// Run the colony on `distances` and return the best score found.
    ///
    /// On error the results of any previous fit are left untouched.
    pub fn fit(&mut self, distances: &DistanceMatrix, options: &FitOptions) -> Result<f64> {
        options.validate()?;
        if self.params.num_ants == 0 {
            return Err(AcoError::invalid_parameter("num_ants must be at least 1"));
        }

        let start = Instant::now();
        log::info!(
            "beginning aco optimization fit with {} iterations ({} nodes, {} ants, {})",
            options.iterations,
            distances.dimension(),
            self.params.num_ants,
            options.mode
        );

        let mut state = ColonyState::init(distances, &self.params)?;
        let mut rng = ChaCha8Rng::seed_from_u64(self.params.seed);

        let mode = options.mode;
        let mut best: Option<(f64, Vec<usize>)> = None;
        let mut best_series = Vec::with_capacity(options.iterations);
        let mut num_equal = 0;
        let mut stopped_early = false;

        for iteration in 0..options.iterations {
            let iteration_start = Instant::now();

            let paths: Vec<Vec<usize>> = (0..self.params.num_ants)
                .map(|_| construct_tour(&mut state, &self.params, &mut rng))
                .collect();

            let Some(evaluation) = evaluate(distances, &paths, mode) else {
                break;
            };

            let improved = best
                .as_ref()
                .map_or(true, |(score, _)| mode.is_better(evaluation.score, *score));
            if improved {
                best = Some((evaluation.score, evaluation.path.clone()));
            }
            let best_score = best.as_ref().map_or(evaluation.score, |(score, _)| *score);
            best_series.push(evaluation.score);

            state.evaporation();
            state.intensify(&evaluation.coords_i, &evaluation.coords_j);
            state.update_probabilities();

            log::info!(
                "iteration {}: best score {:.4}, best so far {:.4}, {:.4}s",
                iteration,
                evaluation.score,
                best_score,
                iteration_start.elapsed().as_secs_f64()
            );

            if scores_equal(evaluation.score, best_score) {
                num_equal += 1;
            } else {
                num_equal = 0;
            }

            if num_equal >= options.early_stopping {
                stopped_early = iteration + 1 < options.iterations;
                log::debug!(
                    "best score {:.4} repeated for {} iterations, stopping after iteration {}",
                    best_score,
                    num_equal,
                    iteration
                );
                break;
            }
        }

        let best_score = best_series
            .iter()
            .copied()
            .reduce(|best, score| if mode.is_better(score, best) { score } else { best })
            .unwrap_or(f64::NAN);
        let best_path = best.map(|(_, path)| path).unwrap_or_default();
        let fit_time = start.elapsed().as_secs_f64();

        log::info!(
            "aco fit finished after {} iterations in {:.4}s, best score {:.4}",
            best_series.len(),
            fit_time,
            best_score
        );

        self.result = Some(FitReport {
            best_path,
            best_score,
            iterations: best_series.len(),
            best_series,
            mode,
            stopped_early,
            fit_time,
        });

        Ok(best_score)
    }
}

impl Default for AntColonyOptimizer {
    fn default() -> Self {
        Self::with_params(AcoParams::default())
    }
}

/// Score equality up to floating point noise between tours of equal length
fn scores_equal(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exact::BruteForceSolver;
    use std::collections::HashSet;

    fn create_test_matrix() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 4.0, 1.0, 3.0],
            vec![4.0, 0.0, 2.0, 5.0],
            vec![1.0, 2.0, 0.0, 5.0],
            vec![3.0, 1.0, 5.0, 0.0],
        ])
        .unwrap()
    }

    fn create_optimizer() -> AntColonyOptimizer {
        AntColonyOptimizer::new(10, 0.1, 2.0, 1.0, 1.0, 0.0, 0.1)
    }

    fn assert_valid_tour(path: &[usize], n: usize) {
        assert_eq!(path.len(), n + 1);
        assert_eq!(path.first(), path.last());
        let unique: HashSet<usize> = path[..n].iter().copied().collect();
        assert_eq!(unique.len(), n);
    }

    #[test]
    fn test_small_instance_reaches_minimum() {
        let matrix = create_test_matrix();
        let exact = BruteForceSolver::new(Mode::Minimize).solve(&matrix).unwrap();

        let mut aco = create_optimizer();
        let best = aco.fit_tsp(&matrix, 100, 0, 20).unwrap();

        assert!(aco.is_fitted());
        assert!((best - exact.score).abs() < 1e-9);
        assert_valid_tour(aco.best_path(), 4);
        assert_eq!(matrix.tour_length(aco.best_path()), best);
    }

    #[test]
    fn test_small_instance_reaches_maximum() {
        let matrix = create_test_matrix();
        let exact = BruteForceSolver::new(Mode::Maximize).solve(&matrix).unwrap();

        let mut aco = create_optimizer();
        let best = aco.fit_tsp(&matrix, 100, 1, 20).unwrap();

        assert!((best - exact.score).abs() < 1e-9);
        assert_eq!(aco.report().unwrap().mode, Mode::Maximize);
    }

    #[test]
    fn test_fit_terminates_with_valid_tours() {
        for n in [2, 3, 5, 8] {
            let matrix = DistanceMatrix::random_euclidean(n, n as u64).unwrap();
            let options = FitOptions { iterations: 30, ..Default::default() };
            let mut aco = AntColonyOptimizer::default().with_seed(n as u64);

            let best = aco.fit(&matrix, &options).unwrap();
            let report = aco.report().unwrap();

            assert!(report.iterations >= 1 && report.iterations <= 30);
            assert_eq!(report.best_series.len(), report.iterations);
            assert_valid_tour(&report.best_path, n);
            assert!((matrix.tour_length(&report.best_path) - best).abs() < 1e-9);
            assert!(aco.fit_time().unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_history_never_beats_reported_best() {
        let matrix = DistanceMatrix::random_euclidean(9, 4).unwrap();
        let mut aco = AntColonyOptimizer::default().with_seed(4);
        let best = aco.fit(&matrix, &FitOptions::default()).unwrap();

        assert!(aco.best_series().iter().all(|&score| score >= best));
        let running = aco.report().unwrap().running_best();
        assert!(running.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(running.last().copied(), Some(best));
    }

    #[test]
    fn test_history_never_beats_reported_best_when_maximizing() {
        let matrix = DistanceMatrix::random_euclidean(9, 4).unwrap();
        let options = FitOptions { mode: Mode::Maximize, ..Default::default() };
        let mut aco = AntColonyOptimizer::default().with_seed(4);
        let best = aco.fit(&matrix, &options).unwrap();

        assert!(aco.best_series().iter().all(|&score| score <= best));
        let running = aco.report().unwrap().running_best();
        assert!(running.windows(2).all(|w| w[1] >= w[0]));
        assert_eq!(running.last().copied(), Some(best));
        assert!((matrix.tour_length(aco.best_path()) - best).abs() < 1e-9);
    }

    #[test]
    fn test_early_stopping_on_constant_scores() {
        // both directed tours of a two-node graph cost 3
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]]).unwrap();
        let options = FitOptions { iterations: 100, mode: Mode::Minimize, early_stopping: 5 };
        let mut aco = AntColonyOptimizer::default();

        let best = aco.fit(&matrix, &options).unwrap();
        let report = aco.report().unwrap();

        assert_eq!(best, 3.0);
        assert_eq!(report.iterations, 5);
        assert!(report.stopped_early);
    }

    #[test]
    fn test_early_stopping_on_last_iteration_is_not_early() {
        let matrix = DistanceMatrix::from_rows(vec![vec![0.0, 1.0], vec![2.0, 0.0]]).unwrap();
        let options = FitOptions { iterations: 5, mode: Mode::Minimize, early_stopping: 5 };
        let mut aco = AntColonyOptimizer::default();

        aco.fit(&matrix, &options).unwrap();
        assert_eq!(aco.report().unwrap().iterations, 5);
        assert!(!aco.report().unwrap().stopped_early);
    }

    #[test]
    fn test_non_square_input_rejected() {
        let rows = vec![vec![0.0, 1.0, 2.0, 3.0]; 3];
        let mut aco = create_optimizer();

        let result = aco.fit_rows(&rows, &FitOptions::default());

        assert!(matches!(result, Err(AcoError::ShapeMismatch { .. })));
        assert!(!aco.is_fitted());
        assert!(aco.best_path().is_empty());
        assert!(aco.best_series().is_empty());
        assert!(aco.best_score().is_none());
    }

    #[test]
    fn test_invalid_mode_rejected() {
        let mut aco = create_optimizer();
        let result = aco.fit_tsp(&create_test_matrix(), 100, 2, 20);

        assert!(matches!(result, Err(AcoError::InvalidMode(2))));
        assert!(!aco.is_fitted());
    }

    #[test]
    fn test_degenerate_distance_rejected() {
        let matrix = DistanceMatrix::from_rows(vec![
            vec![0.0, 1.0, 0.0],
            vec![1.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0],
        ])
        .unwrap();
        let mut aco = create_optimizer();

        let result = aco.fit(&matrix, &FitOptions::default());
        assert!(matches!(result, Err(AcoError::DegenerateDistance { from: 0, to: 2, .. })));
        assert!(!aco.is_fitted());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        let matrix = create_test_matrix();

        let mut no_ants = AntColonyOptimizer::new(0, 0.1, 2.0, 1.0, 1.0, 0.0, 0.1);
        assert!(matches!(
            no_ants.fit(&matrix, &FitOptions::default()),
            Err(AcoError::InvalidParameter(_))
        ));

        let mut aco = create_optimizer();
        assert!(matches!(
            aco.fit_tsp(&matrix, 0, 0, 20),
            Err(AcoError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_failed_fit_keeps_previous_result() {
        let matrix = create_test_matrix();
        let mut aco = create_optimizer();
        let best = aco.fit(&matrix, &FitOptions::default()).unwrap();

        assert!(aco.fit_rows(&[vec![0.0, 1.0]], &FitOptions::default()).is_err());
        assert_eq!(aco.best_score(), Some(best));
        assert_eq!(aco.best_path().len(), 5);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let matrix = DistanceMatrix::random_euclidean(8, 21).unwrap();
        let options = FitOptions { iterations: 40, ..Default::default() };

        let mut first = AntColonyOptimizer::default().with_seed(99);
        let mut second = AntColonyOptimizer::default().with_seed(99);
        first.fit(&matrix, &options).unwrap();
        second.fit(&matrix, &options).unwrap();

        assert_eq!(first.best_path(), second.best_path());
        assert_eq!(first.best_series(), second.best_series());

        // refitting the same instance starts from scratch
        let series = first.best_series().to_vec();
        first.fit(&matrix, &options).unwrap();
        assert_eq!(first.best_series(), series.as_slice());
    }

    #[test]
    fn test_refit_replaces_results() {
        let mut aco = create_optimizer();
        aco.fit(&create_test_matrix(), &FitOptions::default()).unwrap();
        assert_eq!(aco.best_path().len(), 5);

        let bigger = DistanceMatrix::random_euclidean(6, 2).unwrap();
        aco.fit(&bigger, &FitOptions { iterations: 10, ..Default::default() }).unwrap();
        assert_valid_tour(aco.best_path(), 6);
        assert!(aco.best_series().len() <= 10);
    }

    #[test]
    fn test_highest_probability_exploitation() {
        let matrix = create_test_matrix();
        let mut aco = create_optimizer().with_exploitation(Exploitation::HighestProbability);

        let best = aco.fit_tsp(&matrix, 100, 0, 20).unwrap();
        assert_eq!(best, 7.0);
        assert_eq!(aco.params().exploitation, Exploitation::HighestProbability);
    }

    #[test]
    fn test_scores_equal_tolerance() {
        assert!(scores_equal(0.1 + 0.2, 0.3));
        assert!(!scores_equal(1.0, 1.001));
    }
}
