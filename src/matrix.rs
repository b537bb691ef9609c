//! Pairwise travel durations for one patrol group.

use crate::error::SolverError;
use crate::location::GroupId;

/// Square, non-negative matrix of travel durations in seconds.
///
/// `durations[i][j]` is the time from the group's `i`th location to its `j`th.
/// A group with no locations has a valid empty matrix; a failed provider call
/// has no matrix at all.
#[derive(Debug, Clone, PartialEq)]
pub struct DurationMatrix {
    group: GroupId,
    durations: Vec<Vec<f64>>,
}

impl DurationMatrix {
    pub fn new(group: GroupId, durations: Vec<Vec<f64>>) -> Result<Self, SolverError> {
        let size = durations.len();
        for (i, row) in durations.iter().enumerate() {
            if row.len() != size {
                return Err(SolverError::MalformedMatrix(format!(
                    "row {} has {} entries, expected {}",
                    i,
                    row.len(),
                    size
                )));
            }
            if let Some(j) = row.iter().position(|d| !d.is_finite() || *d < 0.0) {
                return Err(SolverError::MalformedMatrix(format!(
                    "entry ({}, {}) is {}",
                    i, j, row[j]
                )));
            }
        }

        Ok(Self { group, durations })
    }

    pub fn empty(group: GroupId) -> Self {
        Self {
            group,
            durations: Vec::new(),
        }
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    pub fn size(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Transit cost of the edge `from -> to`.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.durations[from][to]
    }

    /// Sum of transit costs along `order`, with no return leg.
    pub fn path_cost(&self, order: &[usize]) -> f64 {
        order
            .windows(2)
            .map(|pair| self.get(pair[0], pair[1]))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_ragged_rows() {
        let result = DurationMatrix::new(1, vec![vec![0.0, 1.0], vec![1.0]]);
        assert!(matches!(result, Err(SolverError::MalformedMatrix(_))));
    }

    #[test]
    fn test_rejects_negative_and_nan() {
        let negative = DurationMatrix::new(1, vec![vec![0.0, -1.0], vec![1.0, 0.0]]);
        let nan = DurationMatrix::new(1, vec![vec![0.0, f64::NAN], vec![1.0, 0.0]]);
        assert!(negative.is_err());
        assert!(nan.is_err());
    }

    #[test]
    fn test_empty_is_valid() {
        let matrix = DurationMatrix::new(2, Vec::new()).expect("empty matrix");
        assert!(matrix.is_empty());
        assert_eq!(matrix, DurationMatrix::empty(2));
    }

    #[test]
    fn test_path_cost_is_open() {
        let matrix = DurationMatrix::new(
            1,
            vec![
                vec![0.0, 10.0, 20.0],
                vec![10.0, 0.0, 15.0],
                vec![20.0, 15.0, 0.0],
            ],
        )
        .expect("valid");
        assert_eq!(matrix.path_cost(&[0, 1, 2]), 25.0);
        assert_eq!(matrix.path_cost(&[0]), 0.0);
        assert_eq!(matrix.path_cost(&[]), 0.0);
    }
}
