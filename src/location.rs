//! Static enforcement locations and their patrol-group partition.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;

/// Patrol group number as it appears in the location file.
pub type GroupId = u32;

/// Stable identifier for a location: its position in load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocationId(pub usize);

/// A single parking-enforcement location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub group: GroupId,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, group: GroupId) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            group,
        }
    }

    fn has_valid_coordinates(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Coordinates of one stop, tagged with the location they belong to.
///
/// Providers only ever see `(longitude, latitude)`; the id stays with the
/// caller so names are never recovered from echoed floats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Waypoint {
    pub id: LocationId,
    pub longitude: f64,
    pub latitude: f64,
}

impl Waypoint {
    pub fn lon_lat(&self) -> (f64, f64) {
        (self.longitude, self.latitude)
    }
}

/// Locations sharing a group id, in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub id: GroupId,
    pub waypoints: Vec<Waypoint>,
}

impl Group {
    pub fn new(id: GroupId, waypoints: Vec<Waypoint>) -> Self {
        Self { id, waypoints }
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// `(longitude, latitude)` pairs in matrix-local index order.
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        self.waypoints.iter().map(Waypoint::lon_lat).collect()
    }
}

/// All enforceable locations, read-only after load.
#[derive(Debug, Clone, Default)]
pub struct LocationSet {
    locations: Vec<Location>,
}

impl LocationSet {
    /// Validates and wraps a list of locations.
    pub fn new(locations: Vec<Location>) -> Result<Self, ConfigError> {
        if locations.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut seen: HashSet<(GroupId, &str)> = HashSet::new();
        for location in &locations {
            if !location.has_valid_coordinates() {
                return Err(ConfigError::InvalidCoordinate {
                    name: location.name.clone(),
                });
            }
            if !seen.insert((location.group, location.name.as_str())) {
                return Err(ConfigError::DuplicateName {
                    name: location.name.clone(),
                    group: location.group,
                });
            }
        }

        Ok(Self { locations })
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let set = Self::from_json_reader(BufReader::new(file))?;
        debug!(path = %path.display(), locations = set.len(), "loaded location set");
        Ok(set)
    }

    pub fn from_json_reader(reader: impl Read) -> Result<Self, ConfigError> {
        let locations: Vec<Location> = serde_json::from_reader(reader)?;
        Self::new(locations)
    }

    pub fn get(&self, id: LocationId) -> Option<&Location> {
        self.locations.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LocationId, &Location)> {
        self.locations
            .iter()
            .enumerate()
            .map(|(index, location)| (LocationId(index), location))
    }

    /// Members of `id` in load order, or `None` if no location carries that group.
    pub fn group(&self, id: GroupId) -> Option<Group> {
        let waypoints: Vec<Waypoint> = self
            .iter()
            .filter(|(_, location)| location.group == id)
            .map(|(location_id, location)| Waypoint {
                id: location_id,
                longitude: location.longitude,
                latitude: location.latitude,
            })
            .collect();

        if waypoints.is_empty() {
            None
        } else {
            Some(Group::new(id, waypoints))
        }
    }

    /// Every group present in the set, ordered by group id.
    pub fn groups(&self) -> Vec<Group> {
        let mut by_group: BTreeMap<GroupId, Vec<Waypoint>> = BTreeMap::new();
        for (location_id, location) in self.iter() {
            by_group.entry(location.group).or_default().push(Waypoint {
                id: location_id,
                longitude: location.longitude,
                latitude: location.latitude,
            });
        }

        by_group
            .into_iter()
            .map(|(id, waypoints)| Group::new(id, waypoints))
            .collect()
    }
}
