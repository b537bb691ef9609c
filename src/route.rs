//! Route artifacts: the provider's full directions response and the condensed
//! `(name, leg duration)` sequence derived from it.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::ProviderError;
use crate::location::GroupId;
use crate::polyline::Polyline;

/// Verbatim directions response for one ordered stop sequence.
///
/// Opaque beyond `features[0].properties.segments[i].duration` and the
/// first feature's geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FullRoute(Value);

impl FullRoute {
    pub fn new(response: Value) -> Self {
        Self(response)
    }

    /// A route that never leaves its single stop: Point geometry, no segments.
    pub fn stationary(lon_lat: (f64, f64)) -> Self {
        Self(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [lon_lat.0, lon_lat.1]
                },
                "properties": {
                    "segments": [],
                    "summary": { "distance": 0.0, "duration": 0.0 }
                }
            }]
        }))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    fn first_feature(&self) -> Option<&Value> {
        self.0.get("features")?.as_array()?.first()
    }

    /// Per-leg durations in driving order.
    pub fn segment_durations(&self) -> Result<Vec<f64>, ProviderError> {
        let segments = self
            .first_feature()
            .and_then(|feature| feature.get("properties"))
            .and_then(|properties| properties.get("segments"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                ProviderError::MalformedResponse(
                    "missing features[0].properties.segments".to_string(),
                )
            })?;

        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                segment
                    .get("duration")
                    .and_then(Value::as_f64)
                    .filter(|duration| duration.is_finite() && *duration >= 0.0)
                    .ok_or_else(|| {
                        ProviderError::MalformedResponse(format!(
                            "segment {} has no usable duration",
                            i
                        ))
                    })
            })
            .collect()
    }

    pub fn geometry(&self) -> Option<Polyline> {
        self.first_feature()
            .and_then(|feature| feature.get("geometry"))
            .and_then(Polyline::from_geojson)
    }
}

/// Travel between two consecutive stops of a materialized tour.
///
/// Indices are matrix-local, i.e. positions in the group's load order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteLeg {
    pub from_index: usize,
    pub to_index: usize,
    pub duration: f64,
}

/// One stop of a condensed route; serializes as `[name, duration]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CondensedLeg(pub String, pub f64);

impl CondensedLeg {
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Seconds spent travelling to this stop from the previous one.
    pub fn duration(&self) -> f64 {
        self.1
    }
}

/// Compact patrol route consumed by the synthetic data generator.
#[derive(Debug, Clone, PartialEq)]
pub struct CondensedRoute {
    pub group: GroupId,
    pub legs: Vec<CondensedLeg>,
}

impl CondensedRoute {
    pub fn new(group: GroupId, legs: Vec<CondensedLeg>) -> Self {
        Self { group, legs }
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    pub fn total_duration(&self) -> f64 {
        self.legs.iter().map(CondensedLeg::duration).sum()
    }

    /// Time after leaving the first stop at which each stop is reached.
    pub fn arrival_offsets(&self) -> Vec<(&str, f64)> {
        let mut elapsed = 0.0;
        self.legs
            .iter()
            .map(|leg| {
                elapsed += leg.duration();
                (leg.name(), elapsed)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directions(durations: &[f64]) -> FullRoute {
        let segments: Vec<Value> = durations
            .iter()
            .map(|d| json!({"distance": d * 10.0, "duration": d, "steps": []}))
            .collect();
        FullRoute::new(json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[-92.3, 38.9], [-92.4, 39.0]]},
                "properties": {"segments": segments}
            }]
        }))
    }

    #[test]
    fn test_segment_durations() {
        let route = directions(&[61.2, 44.0]);
        assert_eq!(route.segment_durations().expect("segments"), vec![61.2, 44.0]);
    }

    #[test]
    fn test_provider_error_object_is_malformed() {
        let route = FullRoute::new(json!({"error": {"code": 2010, "message": "not routable"}}));
        assert!(matches!(
            route.segment_durations(),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_segment_without_duration() {
        let route = FullRoute::new(json!({
            "features": [{"properties": {"segments": [{"distance": 100.0}]}}]
        }));
        assert!(route.segment_durations().is_err());
    }

    #[test]
    fn test_stationary_route() {
        let route = FullRoute::stationary((-92.3, 38.9));
        assert!(route.segment_durations().expect("segments").is_empty());
        assert_eq!(route.geometry().map(|g| g.len()), Some(1));
    }

    #[test]
    fn test_condensed_leg_serializes_as_pair() {
        let legs = vec![
            CondensedLeg("Hitt St".to_string(), 0.0),
            CondensedLeg("Turner Ave".to_string(), 61.2),
        ];
        let encoded = serde_json::to_string(&legs).expect("serialize");
        assert_eq!(encoded, r#"[["Hitt St",0.0],["Turner Ave",61.2]]"#);
    }

    #[test]
    fn test_arrival_offsets_accumulate() {
        let route = CondensedRoute::new(
            1,
            vec![
                CondensedLeg("a".to_string(), 0.0),
                CondensedLeg("b".to_string(), 30.0),
                CondensedLeg("c".to_string(), 12.5),
            ],
        );
        assert_eq!(
            route.arrival_offsets(),
            vec![("a", 0.0), ("b", 30.0), ("c", 42.5)]
        );
        assert_eq!(route.total_duration(), 42.5);
    }
}
