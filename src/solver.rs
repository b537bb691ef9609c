//! Single-patrol tour solver.
//!
//! Finds an open Hamiltonian path over a [`DurationMatrix`] that starts at a
//! fixed origin and does not return to it. A nearest-neighbour construction is
//! improved by first-improvement local search (2-opt and relocate). The result
//! is a local optimum, not a proven global one.

use tracing::debug;

use crate::error::SolverError;
use crate::location::GroupId;
use crate::matrix::DurationMatrix;

/// Minimum cost reduction for a move to count as an improvement.
const IMPROVEMENT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Matrix-local index the patrol starts from.
    pub origin: usize,
    /// Maximum passes of local search improvement.
    pub local_search_iterations: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            origin: 0,
            local_search_iterations: 100,
        }
    }
}

/// Visiting order over a group's matrix-local indices.
#[derive(Debug, Clone, PartialEq)]
pub struct Tour {
    pub group: GroupId,
    pub origin_index: usize,
    pub order: Vec<usize>,
}

impl Tour {
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn cost(&self, matrix: &DurationMatrix) -> f64 {
        matrix.path_cost(&self.order)
    }
}

/// Solver bound to exactly one group's matrix.
///
/// Every transit cost comes from the matrix the solver was built with, so
/// solvers for different groups can run side by side.
#[derive(Debug, Clone)]
pub struct TourSolver<'m> {
    matrix: &'m DurationMatrix,
    options: SolveOptions,
}

impl<'m> TourSolver<'m> {
    pub fn new(matrix: &'m DurationMatrix, options: SolveOptions) -> Self {
        Self { matrix, options }
    }

    pub fn solve(&self) -> Result<Tour, SolverError> {
        let size = self.matrix.size();
        let origin = self.options.origin;
        let group = self.matrix.group();

        if size == 0 {
            return Ok(Tour {
                group,
                origin_index: origin,
                order: Vec::new(),
            });
        }
        if origin >= size {
            return Err(SolverError::OriginOutOfRange { origin, size });
        }

        let mut order = self.nearest_neighbor(origin);
        let mut cost = self.matrix.path_cost(&order);
        let initial_cost = cost;

        for pass in 0..self.options.local_search_iterations {
            let mut improved = false;

            if let Some(better) = self.two_opt_improve(&mut order, cost) {
                cost = better;
                improved = true;
            }
            if let Some(better) = self.relocate_improve(&mut order, cost) {
                cost = better;
                improved = true;
            }

            if !improved {
                debug!(group, pass, "local search converged");
                break;
            }
        }

        debug!(group, size, initial_cost, cost, "solved tour");

        Ok(Tour {
            group,
            origin_index: origin,
            order,
        })
    }

    /// Greedy construction: always drive to the closest unvisited stop.
    /// Ties go to the lowest index so the result is deterministic.
    fn nearest_neighbor(&self, origin: usize) -> Vec<usize> {
        let size = self.matrix.size();
        let mut visited = vec![false; size];
        let mut order = Vec::with_capacity(size);

        visited[origin] = true;
        order.push(origin);
        let mut current = origin;

        while order.len() < size {
            let mut best: Option<(usize, f64)> = None;
            for (candidate, seen) in visited.iter().enumerate() {
                if *seen {
                    continue;
                }
                let transit = self.matrix.get(current, candidate);
                if best.is_none_or(|(_, best_transit)| transit < best_transit) {
                    best = Some((candidate, transit));
                }
            }

            let Some((next, _)) = best else { break };
            visited[next] = true;
            order.push(next);
            current = next;
        }

        order
    }

    /// 2-opt: Reverse a segment of the path to reduce travel time.
    ///
    /// The origin stays at position 0. Durations may be asymmetric, so each
    /// candidate is costed in full. Returns the new cost if a move was applied.
    fn two_opt_improve(&self, order: &mut [usize], current_cost: f64) -> Option<f64> {
        let n = order.len();
        if n < 3 {
            return None;
        }

        for i in 1..n - 1 {
            for j in i + 1..n {
                order[i..=j].reverse();
                let cost = self.matrix.path_cost(order);
                if cost < current_cost - IMPROVEMENT_EPSILON {
                    return Some(cost);
                }
                order[i..=j].reverse();
            }
        }

        None
    }

    /// Relocate: Move one stop to a different position in the path.
    /// Returns the new cost if a move was applied.
    fn relocate_improve(&self, order: &mut Vec<usize>, current_cost: f64) -> Option<f64> {
        let n = order.len();
        if n < 3 {
            return None;
        }

        for from in 1..n {
            for to in 1..n {
                if from == to {
                    continue;
                }

                let mut candidate = order.clone();
                let stop = candidate.remove(from);
                candidate.insert(to, stop);

                let cost = self.matrix.path_cost(&candidate);
                if cost < current_cost - IMPROVEMENT_EPSILON {
                    *order = candidate;
                    return Some(cost);
                }
            }
        }

        None
    }
}
