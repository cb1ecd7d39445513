//! Distance matrix input for the TSP.
//!
//! A [`DistanceMatrix`] is always square: every constructor validates the shape
//! and refuses ragged or non-square input with [`AcoError::ShapeMismatch`].
//! Matrices can be loaded from headerless CSV files (one row per line) or from
//! JSON arrays of arrays.

use crate::error::{AcoError, Result};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Square matrix of pairwise distances between nodes `0..n`
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    distances: Vec<Vec<f64>>,
}

impl DistanceMatrix {
    /// Build a matrix from rows, checking that it is non-empty and square
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        if rows.is_empty() {
            return Err(AcoError::EmptyMatrix);
        }

        let n = rows.len();
        if let Some((row, cols)) = rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i, r.len()))
            .find(|&(_, len)| len != n)
        {
            return Err(AcoError::ShapeMismatch { rows: n, row, cols });
        }

        Ok(DistanceMatrix { distances: rows })
    }

    /// Load a matrix, picking the format from the file extension (`.json` or CSV otherwise)
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_file(path)
        } else {
            Self::from_csv_file(path)
        }
    }

    /// Parse a headerless CSV file, one matrix row per line
    pub fn from_csv_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.deserialize::<Vec<f64>>() {
            rows.push(record?);
        }

        Self::from_rows(rows)
    }

    /// Parse a JSON array of arrays of numbers
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let rows: Vec<Vec<f64>> = serde_json::from_reader(BufReader::new(file))?;
        Self::from_rows(rows)
    }

    /// Write the matrix as a headerless CSV file
    pub fn to_csv_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)?;

        for row in &self.distances {
            writer.serialize(row)?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Random Euclidean instance with points drawn in a 100x100 square.
    /// Deterministic via seed.
    pub fn random_euclidean(n: usize, seed: u64) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let points: Vec<(f64, f64)> = (0..n)
            .map(|_| (rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
            .collect();

        let mut rows = vec![vec![0.0; n]; n];
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    let dx = points[i].0 - points[j].0;
                    let dy = points[i].1 - points[j].1;
                    rows[i][j] = (dx * dx + dy * dy).sqrt();
                }
            }
        }

        Self::from_rows(rows)
    }

    /// Number of nodes
    #[inline]
    pub fn dimension(&self) -> usize {
        self.distances.len()
    }

    /// Get the distance from node `i` to node `j`
    #[inline]
    pub fn distance(&self, i: usize, j: usize) -> f64 {
        self.distances[i][j]
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.distances
    }

    /// Total length of an explicit path, summed over consecutive pairs.
    /// Closed tours repeat their start node at the end, so no return arc is added.
    pub fn tour_length(&self, path: &[usize]) -> f64 {
        path.windows(2)
            .map(|w| self.distance(w[0], w[1]))
            .sum()
    }

    pub fn is_symmetric(&self) -> bool {
        let n = self.dimension();
        (0..n).all(|i| (i + 1..n).all(|j| self.distances[i][j] == self.distances[j][i]))
    }

    /// Get statistics about the off-diagonal entries
    pub fn statistics(&self) -> MatrixStatistics {
        let n = self.dimension();
        let mut distances: Vec<f64> = Vec::with_capacity(n * n.saturating_sub(1));
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    distances.push(self.distance(i, j));
                }
            }
        }

        let (min_distance, max_distance, avg_distance) = if distances.is_empty() {
            (0.0, 0.0, 0.0)
        } else {
            (
                distances.iter().cloned().fold(f64::INFINITY, f64::min),
                distances.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
                distances.iter().sum::<f64>() / distances.len() as f64,
            )
        };

        MatrixStatistics {
            dimension: n,
            symmetric: self.is_symmetric(),
            min_distance,
            max_distance,
            avg_distance,
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for DistanceMatrix {
    type Error = AcoError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self> {
        Self::from_rows(rows)
    }
}

/// Statistics about a distance matrix
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixStatistics {
    pub dimension: usize,
    pub symmetric: bool,
    pub min_distance: f64,
    pub max_distance: f64,
    pub avg_distance: f64,
}

impl std::fmt::Display for MatrixStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Distance matrix")?;
        writeln!(f, "  Nodes: {}", self.dimension)?;
        writeln!(f, "  Symmetric: {}", self.symmetric)?;
        writeln!(f, "  Min distance: {:.2}", self.min_distance)?;
        writeln!(f, "  Max distance: {:.2}", self.max_distance)?;
        writeln!(f, "  Avg distance: {:.2}", self.avg_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_rows() -> Vec<Vec<f64>> {
        vec![
            vec![0.0, 4.0, 1.0, 3.0],
            vec![4.0, 0.0, 2.0, 5.0],
            vec![1.0, 2.0, 0.0, 5.0],
            vec![3.0, 1.0, 5.0, 0.0],
        ]
    }

    #[test]
    fn test_square_matrix_accepted() {
        let matrix = DistanceMatrix::from_rows(sample_rows()).unwrap();
        assert_eq!(matrix.dimension(), 4);
        assert_eq!(matrix.distance(3, 1), 1.0);
        assert!(!matrix.is_symmetric());
    }

    #[test]
    fn test_non_square_rejected() {
        let rows = vec![vec![0.0, 1.0, 2.0, 3.0]; 3];
        match DistanceMatrix::from_rows(rows) {
            Err(AcoError::ShapeMismatch { rows, row, cols }) => {
                assert_eq!((rows, row, cols), (3, 0, 4));
            }
            other => panic!("expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_rejected() {
        let rows = vec![vec![0.0, 1.0], vec![1.0]];
        assert!(matches!(
            DistanceMatrix::from_rows(rows),
            Err(AcoError::ShapeMismatch { row: 1, cols: 1, .. })
        ));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(DistanceMatrix::from_rows(Vec::new()), Err(AcoError::EmptyMatrix)));
    }

    #[test]
    fn test_tour_length_closed_path() {
        let matrix = DistanceMatrix::from_rows(sample_rows()).unwrap();
        assert_eq!(matrix.tour_length(&[0, 3, 1, 2, 0]), 7.0);
        assert_eq!(matrix.tour_length(&[0]), 0.0);
    }

    #[test]
    fn test_random_euclidean_is_deterministic() {
        let a = DistanceMatrix::random_euclidean(6, 7).unwrap();
        let b = DistanceMatrix::random_euclidean(6, 7).unwrap();
        assert_eq!(a, b);
        assert!(a.is_symmetric());
        assert!(a.rows().iter().enumerate().all(|(i, r)| r[i] == 0.0));
    }

    #[test]
    fn test_csv_round_trip_through_file() {
        let matrix = DistanceMatrix::from_rows(sample_rows()).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.csv");

        matrix.to_csv_file(&path).unwrap();
        let loaded = DistanceMatrix::from_file(&path).unwrap();
        assert_eq!(loaded, matrix);
    }

    #[test]
    fn test_json_loader_and_shape_check() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.json");
        let mut file = File::create(&path).unwrap();
        write!(file, "[[0, 1, 2], [1, 0, 3]]").unwrap();
        drop(file);

        assert!(matches!(
            DistanceMatrix::from_file(&path),
            Err(AcoError::ShapeMismatch { rows: 2, row: 0, cols: 3 })
        ));
    }

    #[test]
    fn test_statistics() {
        let matrix = DistanceMatrix::from_rows(sample_rows()).unwrap();
        let stats = matrix.statistics();
        assert_eq!(stats.dimension, 4);
        assert_eq!(stats.min_distance, 1.0);
        assert_eq!(stats.max_distance, 5.0);
        assert!((stats.avg_distance - 36.0 / 12.0).abs() < 1e-12);
    }
}
