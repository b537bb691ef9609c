//! Haversine providers (offline fallback when no routing service is reachable).
//!
//! Uses great-circle distance to estimate travel time.
//! Less accurate than a road network but always available.

use serde_json::{Value, json};

use crate::error::ProviderError;
use crate::route::FullRoute;
use crate::traits::{DirectionsProvider, DistanceMatrixProvider};

/// Average driving speed assumption for time estimation.
const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two `(longitude, latitude)` points in kilometers.
fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lng1, lat1) = from;
    let (lng2, lat2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine-based duration matrix provider.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Assumed average driving speed in km/h.
    pub speed_kmh: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineMatrix {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    /// Convert distance in km to whole seconds of travel.
    fn km_to_seconds(&self, km: f64) -> f64 {
        let hours = km / self.speed_kmh;
        (hours * 3600.0).round()
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, coordinates: &[(f64, f64)]) -> Result<Vec<Vec<f64>>, ProviderError> {
        let n = coordinates.len();
        let mut matrix = vec![vec![0.0; n]; n];

        for (i, from) in coordinates.iter().enumerate() {
            for (j, to) in coordinates.iter().enumerate() {
                if i != j {
                    matrix[i][j] = self.km_to_seconds(haversine_km(*from, *to));
                }
            }
        }

        Ok(matrix)
    }
}

/// Straight-line directions in the same GeoJSON shape a routing service returns.
#[derive(Debug, Clone, Default)]
pub struct HaversineDirections {
    matrix: HaversineMatrix,
}

impl HaversineDirections {
    pub fn new(speed_kmh: f64) -> Self {
        Self {
            matrix: HaversineMatrix::new(speed_kmh),
        }
    }
}

impl DirectionsProvider for HaversineDirections {
    fn directions_for(&self, coordinates: &[(f64, f64)]) -> Result<FullRoute, ProviderError> {
        if coordinates.len() < 2 {
            return Err(ProviderError::MalformedResponse(format!(
                "directions need at least 2 coordinates, got {}",
                coordinates.len()
            )));
        }

        let segments: Vec<Value> = coordinates
            .windows(2)
            .map(|pair| {
                let km = haversine_km(pair[0], pair[1]);
                json!({
                    "distance": (km * 1000.0).round(),
                    "duration": self.matrix.km_to_seconds(km),
                    "steps": []
                })
            })
            .collect();

        let distance: f64 = segments.iter().filter_map(|s| s["distance"].as_f64()).sum();
        let duration: f64 = segments.iter().filter_map(|s| s["duration"].as_f64()).sum();
        let line: Vec<[f64; 2]> = coordinates.iter().map(|&(lon, lat)| [lon, lat]).collect();

        Ok(FullRoute::new(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "LineString", "coordinates": line },
                "properties": {
                    "segments": segments,
                    "summary": { "distance": distance, "duration": duration },
                    "way_points": (0..coordinates.len()).collect::<Vec<_>>()
                }
            }],
            "metadata": { "engine": "haversine" }
        })))
    }
}
