//! Polyline representation for route geometries.
//!
//! Directions responses carry GeoJSON geometry in `[longitude, latitude]`
//! order. It is decoded once at the boundary into `(latitude, longitude)`
//! points and kept that way inside the crate.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<(f64, f64)>,
}

impl Polyline {
    /// Each point is a (latitude, longitude) tuple.
    pub fn new(points: Vec<(f64, f64)>) -> Self {
        Self { points }
    }

    /// Decodes a GeoJSON `LineString` or `Point` geometry object.
    ///
    /// Extra positions (elevation) are ignored. Returns `None` for any other
    /// geometry type or a position with fewer than two numbers.
    pub fn from_geojson(geometry: &Value) -> Option<Self> {
        let coordinates = geometry.get("coordinates")?;
        match geometry.get("type")?.as_str()? {
            "LineString" => coordinates
                .as_array()?
                .iter()
                .map(position)
                .collect::<Option<Vec<_>>>()
                .map(Self::new),
            "Point" => position(coordinates).map(|point| Self::new(vec![point])),
            _ => None,
        }
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub fn into_points(self) -> Vec<(f64, f64)> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn position(value: &Value) -> Option<(f64, f64)> {
    let position = value.as_array()?;
    let lng = position.first()?.as_f64()?;
    let lat = position.get(1)?.as_f64()?;
    Some((lat, lng))
}
