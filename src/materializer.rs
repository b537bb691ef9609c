//! Turns a solved tour back into a real route and persists both artifacts.

use tracing::{info, warn};

use crate::error::{MaterializeError, ProviderError, RouteError};
use crate::location::{Group, GroupId, LocationId, LocationSet, Waypoint};
use crate::polyline::Polyline;
use crate::retry::RetryPolicy;
use crate::route::{CondensedLeg, CondensedRoute, FullRoute, RouteLeg};
use crate::solver::Tour;
use crate::store::{RouteArtifacts, RouteStore};
use crate::traits::DirectionsProvider;

/// A tour grounded in real directions.
#[derive(Debug, Clone)]
pub struct MaterializedRoute {
    pub group: GroupId,
    /// Stops in driving order.
    pub stops: Vec<LocationId>,
    pub legs: Vec<RouteLeg>,
    pub condensed: CondensedRoute,
    /// Stops whose id has no entry in the location set; absent from `condensed`.
    pub unresolved: Vec<LocationId>,
    pub geometry: Option<Polyline>,
    /// `None` when the group had nothing to route.
    pub artifacts: Option<RouteArtifacts>,
}

impl MaterializedRoute {
    pub fn total_duration(&self) -> f64 {
        self.legs.iter().map(|leg| leg.duration).sum()
    }
}

pub struct RouteMaterializer<'a, D> {
    locations: &'a LocationSet,
    directions: &'a D,
    store: &'a RouteStore,
    retry: RetryPolicy,
}

impl<'a, D: DirectionsProvider> RouteMaterializer<'a, D> {
    pub fn new(locations: &'a LocationSet, directions: &'a D, store: &'a RouteStore) -> Self {
        Self {
            locations,
            directions,
            store,
            retry: RetryPolicy::none(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Requests directions for `tour` over `group` and writes the full and
    /// condensed routes.
    ///
    /// Nothing is written when the directions call fails or returns a route
    /// whose segments do not line up with the stops.
    pub fn materialize(&self, tour: &Tour, group: &Group) -> Result<MaterializedRoute, RouteError> {
        let ordered = ordered_waypoints(tour, group)?;

        if ordered.is_empty() {
            warn!(group = group.id, "group has no stops, nothing to materialize");
            return Ok(MaterializedRoute {
                group: group.id,
                stops: Vec::new(),
                legs: Vec::new(),
                condensed: CondensedRoute::new(group.id, Vec::new()),
                unresolved: Vec::new(),
                geometry: None,
                artifacts: None,
            });
        }

        let coordinates: Vec<(f64, f64)> = ordered.iter().map(Waypoint::lon_lat).collect();
        let full_route = if coordinates.len() == 1 {
            FullRoute::stationary(coordinates[0])
        } else {
            self.retry
                .run("directions", || self.directions.directions_for(&coordinates))?
        };

        let segments = full_route.segment_durations()?;
        if segments.len() + 1 != ordered.len() {
            return Err(ProviderError::MalformedResponse(format!(
                "{} segments for {} stops",
                segments.len(),
                ordered.len()
            ))
            .into());
        }

        let legs: Vec<RouteLeg> = tour
            .order
            .windows(2)
            .zip(&segments)
            .map(|(pair, &duration)| RouteLeg {
                from_index: pair[0],
                to_index: pair[1],
                duration,
            })
            .collect();

        let (condensed, unresolved) = self.condense(group.id, &ordered, &segments);

        let artifacts = self.store.write_routes(&full_route, &condensed)?;

        info!(
            group = group.id,
            stops = ordered.len(),
            condensed = condensed.len(),
            total_duration = condensed.total_duration(),
            "materialized route"
        );

        Ok(MaterializedRoute {
            group: group.id,
            stops: ordered.iter().map(|wp| wp.id).collect(),
            legs,
            condensed,
            unresolved,
            geometry: full_route.geometry(),
            artifacts: Some(artifacts),
        })
    }

    /// Pairs each resolvable stop with the duration of the segment into it.
    ///
    /// Unresolved stops are skipped without touching their neighbours'
    /// durations. The first emitted leg is always 0: reaching the start is
    /// not modeled.
    fn condense(
        &self,
        group: GroupId,
        ordered: &[Waypoint],
        segments: &[f64],
    ) -> (CondensedRoute, Vec<LocationId>) {
        let mut legs = Vec::with_capacity(ordered.len());
        let mut unresolved = Vec::new();

        for (i, waypoint) in ordered.iter().enumerate() {
            match self.locations.get(waypoint.id) {
                Some(location) => {
                    let duration = if legs.is_empty() { 0.0 } else { segments[i - 1] };
                    legs.push(CondensedLeg(location.name.clone(), duration));
                }
                None => {
                    warn!(
                        group,
                        location = waypoint.id.0,
                        longitude = waypoint.longitude,
                        latitude = waypoint.latitude,
                        "stop has no known location, omitting it from the condensed route"
                    );
                    unresolved.push(waypoint.id);
                }
            }
        }

        (CondensedRoute::new(group, legs), unresolved)
    }
}

/// Maps the tour's matrix-local indices onto the group's waypoints, 0-based.
fn ordered_waypoints(tour: &Tour, group: &Group) -> Result<Vec<Waypoint>, MaterializeError> {
    let size = group.len();
    let mismatch = |reason: String| MaterializeError::TourMismatch {
        group: group.id,
        size,
        reason,
    };

    if tour.group != group.id {
        return Err(mismatch(format!("tour was solved for group {}", tour.group)));
    }
    if tour.order.len() != size {
        return Err(mismatch(format!("tour has {} stops", tour.order.len())));
    }
    if let Some(&first) = tour.order.first() {
        if first != tour.origin_index {
            return Err(mismatch(format!(
                "tour starts at {} instead of origin {}",
                first, tour.origin_index
            )));
        }
    }

    let mut seen = vec![false; size];
    tour.order
        .iter()
        .map(|&index| match seen.get_mut(index) {
            Some(visited) if !*visited => {
                *visited = true;
                Ok(group.waypoints[index])
            }
            Some(_) => Err(mismatch(format!("index {} visited twice", index))),
            None => Err(mismatch(format!("index {} out of range", index))),
        })
        .collect()
}
