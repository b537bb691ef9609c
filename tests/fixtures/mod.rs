//! Test fixtures for patrol-router.
//!
//! Provides:
//! - Real downtown Columbia, MO enforcement locations in three groups
//! - Stub providers with controllable failures

#![allow(dead_code)]

pub mod columbia_locations;

use std::sync::atomic::{AtomicUsize, Ordering};

use patrol_router::error::ProviderError;
use patrol_router::haversine::{HaversineDirections, HaversineMatrix};
use patrol_router::route::FullRoute;
use patrol_router::traits::{DirectionsProvider, DistanceMatrixProvider};
use serde_json::json;

pub use columbia_locations::*;

fn unavailable() -> ProviderError {
    ProviderError::Api {
        status: 503,
        message: "service unavailable".to_string(),
    }
}

/// Great-circle matrix that can be told to fail.
#[derive(Default)]
pub struct StubMatrix {
    inner: HaversineMatrix,
    /// Every request containing this `(lon, lat)` fails permanently.
    fail_on: Option<(f64, f64)>,
    /// Number of leading calls that fail with a retryable error.
    transient_failures: AtomicUsize,
    pub calls: AtomicUsize,
}

impl StubMatrix {
    pub fn failing_on(coordinate: (f64, f64)) -> Self {
        Self {
            fail_on: Some(coordinate),
            ..Self::default()
        }
    }

    pub fn flaky(transient_failures: usize) -> Self {
        Self {
            transient_failures: AtomicUsize::new(transient_failures),
            ..Self::default()
        }
    }
}

impl DistanceMatrixProvider for StubMatrix {
    fn matrix_for(&self, coordinates: &[(f64, f64)]) -> Result<Vec<Vec<f64>>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_on.is_some_and(|c| coordinates.contains(&c)) {
            return Err(ProviderError::Api {
                status: 403,
                message: "quota exceeded".to_string(),
            });
        }

        let remaining = self.transient_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.transient_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(unavailable());
        }

        self.inner.matrix_for(coordinates)
    }
}

/// Returns a fixed matrix regardless of input.
pub struct FixedMatrix(pub Vec<Vec<f64>>);

impl DistanceMatrixProvider for FixedMatrix {
    fn matrix_for(&self, _coordinates: &[(f64, f64)]) -> Result<Vec<Vec<f64>>, ProviderError> {
        Ok(self.0.clone())
    }
}

/// Straight-line directions that can be told to fail for one stop.
#[derive(Default)]
pub struct StubDirections {
    inner: HaversineDirections,
    fail_on: Option<(f64, f64)>,
    pub calls: AtomicUsize,
}

impl StubDirections {
    pub fn failing_on(coordinate: (f64, f64)) -> Self {
        Self {
            fail_on: Some(coordinate),
            ..Self::default()
        }
    }
}

impl DirectionsProvider for StubDirections {
    fn directions_for(&self, coordinates: &[(f64, f64)]) -> Result<FullRoute, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.is_some_and(|c| coordinates.contains(&c)) {
            return Err(ProviderError::Api {
                status: 400,
                message: "could not find routable point".to_string(),
            });
        }
        self.inner.directions_for(coordinates)
    }
}

/// Answers with a single segment whatever the number of stops.
pub struct TruncatedDirections;

impl DirectionsProvider for TruncatedDirections {
    fn directions_for(&self, _coordinates: &[(f64, f64)]) -> Result<FullRoute, ProviderError> {
        Ok(FullRoute::new(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": []},
                "properties": {"segments": [{"distance": 10.0, "duration": 5.0}]}
            }]
        })))
    }
}
