//! Scoring a batch of ant tours.

use crate::colony::config::Mode;
use crate::matrix::DistanceMatrix;

/// Winning tour of one iteration
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: f64,
    pub path: Vec<usize>,
    /// Source node of every traversed edge
    pub coords_i: Vec<usize>,
    /// Destination node of every traversed edge
    pub coords_j: Vec<usize>,
}

/// Score every path and return the best one under `mode`.
/// Ties go to the first path. Returns `None` for an empty batch.
pub fn evaluate(distances: &DistanceMatrix, paths: &[Vec<usize>], mode: Mode) -> Option<Evaluation> {
    let scores: Vec<f64> = paths.iter().map(|path| distances.tour_length(path)).collect();

    let best = scores
        .iter()
        .enumerate()
        .skip(1)
        .fold(0, |best, (i, &score)| {
            if mode.is_better(score, scores[best]) {
                i
            } else {
                best
            }
        });

    let path = paths.get(best)?.clone();
    let (coords_i, coords_j): (Vec<usize>, Vec<usize>) =
        path.windows(2).map(|w| (w[0], w[1])).unzip();

    Some(Evaluation {
        score: scores[best],
        path,
        coords_i,
        coords_j,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_matrix() -> DistanceMatrix {
        DistanceMatrix::from_rows(vec![
            vec![0.0, 4.0, 1.0, 3.0],
            vec![4.0, 0.0, 2.0, 5.0],
            vec![1.0, 2.0, 0.0, 5.0],
            vec![3.0, 1.0, 5.0, 0.0],
        ])
        .unwrap()
    }

    fn batch() -> Vec<Vec<usize>> {
        vec![
            vec![0, 1, 2, 3, 0], // 14
            vec![0, 3, 1, 2, 0], // 7
            vec![0, 1, 3, 2, 0], // 15
            vec![2, 0, 3, 1, 2], // 7
        ]
    }

    #[test]
    fn test_evaluate_minimize() {
        let result = evaluate(&create_test_matrix(), &batch(), Mode::Minimize).unwrap();
        assert_eq!(result.score, 7.0);
        assert_eq!(result.path, vec![0, 3, 1, 2, 0]);
        assert_eq!(result.coords_i, vec![0, 3, 1, 2]);
        assert_eq!(result.coords_j, vec![3, 1, 2, 0]);
    }

    #[test]
    fn test_evaluate_maximize() {
        let result = evaluate(&create_test_matrix(), &batch(), Mode::Maximize).unwrap();
        assert_eq!(result.score, 15.0);
        assert_eq!(result.path, vec![0, 1, 3, 2, 0]);
    }

    #[test]
    fn test_evaluate_ties_pick_first() {
        let paths = vec![vec![1, 2, 0, 3, 1], vec![0, 3, 1, 2, 0]];
        let result = evaluate(&create_test_matrix(), &paths, Mode::Minimize).unwrap();
        assert_eq!(result.score, 7.0);
        assert_eq!(result.path, paths[0]);
    }

    #[test]
    fn test_evaluate_empty_batch() {
        assert!(evaluate(&create_test_matrix(), &[], Mode::Minimize).is_none());
    }
}
