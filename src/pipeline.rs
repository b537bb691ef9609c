//! Per-group orchestration: matrix -> tour -> directions -> artifacts.
//!
//! Groups share nothing but the read-only [`LocationSet`] and write to
//! group-keyed paths, so they run as independent rayon tasks. A failing group
//! is reported in its own [`GroupReport`] and never stops the others.

use rayon::prelude::*;
use tracing::{error, info, info_span};

use crate::error::{ConfigError, RouteError, SolverError};
use crate::location::{Group, GroupId, LocationSet};
use crate::materializer::{MaterializedRoute, RouteMaterializer};
use crate::matrix::DurationMatrix;
use crate::retry::RetryPolicy;
use crate::solver::{SolveOptions, TourSolver};
use crate::store::RouteStore;
use crate::traits::{DirectionsProvider, DistanceMatrixProvider};

#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub groups: Vec<GroupId>,
    pub solve: SolveOptions,
    pub retry: RetryPolicy,
    /// Run groups on the rayon pool instead of one after another.
    pub concurrent: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            groups: vec![1, 2, 3],
            solve: SolveOptions::default(),
            retry: RetryPolicy::default(),
            concurrent: true,
        }
    }
}

#[derive(Debug)]
pub enum GroupOutcome {
    Success(MaterializedRoute),
    Failure(RouteError),
}

#[derive(Debug)]
pub struct GroupReport {
    pub group: GroupId,
    pub outcome: GroupOutcome,
}

impl GroupReport {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, GroupOutcome::Success(_))
    }

    pub fn route(&self) -> Option<&MaterializedRoute> {
        match &self.outcome {
            GroupOutcome::Success(route) => Some(route),
            GroupOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RouteError> {
        match &self.outcome {
            GroupOutcome::Success(_) => None,
            GroupOutcome::Failure(err) => Some(err),
        }
    }
}

/// One report per configured group, in configured order.
#[derive(Debug)]
pub struct PipelineReport {
    pub groups: Vec<GroupReport>,
}

impl PipelineReport {
    pub fn get(&self, group: GroupId) -> Option<&GroupReport> {
        self.groups.iter().find(|report| report.group == group)
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|report| report.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|report| !report.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.groups.iter().all(GroupReport::is_success)
    }
}

pub struct RoutePipeline<'a, M, D> {
    locations: &'a LocationSet,
    matrix_provider: M,
    directions: D,
    store: RouteStore,
    options: PipelineOptions,
    groups: Vec<Group>,
}

impl<'a, M, D> RoutePipeline<'a, M, D>
where
    M: DistanceMatrixProvider + Sync,
    D: DirectionsProvider + Sync,
{
    /// Resolves the configured groups up front; a group with no locations is
    /// a configuration error and nothing runs.
    pub fn new(
        locations: &'a LocationSet,
        matrix_provider: M,
        directions: D,
        store: RouteStore,
        options: PipelineOptions,
    ) -> Result<Self, ConfigError> {
        let groups = options
            .groups
            .iter()
            .map(|&id| locations.group(id).ok_or(ConfigError::UnknownGroup(id)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            locations,
            matrix_provider,
            directions,
            store,
            options,
            groups,
        })
    }

    pub fn run(&self) -> PipelineReport {
        let groups = if self.options.concurrent {
            self.groups
                .par_iter()
                .map(|group| self.report(group))
                .collect()
        } else {
            self.groups.iter().map(|group| self.report(group)).collect()
        };

        PipelineReport { groups }
    }

    fn report(&self, group: &Group) -> GroupReport {
        let _span = info_span!("group", group = group.id).entered();

        let outcome = match self.run_group(group) {
            Ok(route) => GroupOutcome::Success(route),
            Err(err) => {
                error!(error = %err, "group pipeline failed");
                GroupOutcome::Failure(err)
            }
        };

        GroupReport {
            group: group.id,
            outcome,
        }
    }

    /// Runs every stage for one group, stopping at the first failure.
    pub fn run_group(&self, group: &Group) -> Result<MaterializedRoute, RouteError> {
        let coordinates = group.coordinates();
        let durations = self
            .options
            .retry
            .run("matrix", || self.matrix_provider.matrix_for(&coordinates))?;

        let matrix = DurationMatrix::new(group.id, durations)?;
        if matrix.size() != group.len() {
            return Err(SolverError::SizeMismatch {
                expected: group.len(),
                actual: matrix.size(),
            }
            .into());
        }

        let tour = TourSolver::new(&matrix, self.options.solve.clone()).solve()?;
        info!(stops = tour.len(), cost = tour.cost(&matrix), "solved tour");

        RouteMaterializer::new(self.locations, &self.directions, &self.store)
            .with_retry(self.options.retry.clone())
            .materialize(&tour, group)
    }
}
