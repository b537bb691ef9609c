//! Parking-enforcement locations around downtown Columbia, MO.
//!
//! Three patrol groups, loosely split into the north, central and south
//! parts of the enforcement area.

use patrol_router::location::{Location, LocationSet};

pub const NORTH: &[(&str, f64, f64)] = &[
    ("Walnut St Garage", 38.953530, -92.328310),
    ("Fifth & Walnut Garage", 38.952840, -92.330120),
    ("Broadway & Eighth", 38.951740, -92.326870),
    ("Cherry St Lot", 38.950650, -92.329560),
];

pub const CENTRAL: &[(&str, f64, f64)] = &[
    ("Hitt St Garage", 38.946210, -92.326810),
    ("Turner Ave Garage", 38.942820, -92.326210),
    ("Conley Ave Garage", 38.944510, -92.330220),
];

pub const SOUTH: &[(&str, f64, f64)] = &[
    ("Virginia Ave Garage", 38.942130, -92.321610),
    ("Rollins St Lot", 38.940820, -92.324850),
    ("Maryland Ave Lot", 38.938920, -92.322140),
    ("Stadium Blvd Lot", 38.936440, -92.327320),
    ("Providence Rd Lot", 38.939710, -92.333580),
];

fn group(group: u32, entries: &[(&str, f64, f64)]) -> Vec<Location> {
    entries
        .iter()
        .map(|&(name, lat, lng)| Location::new(name, lat, lng, group))
        .collect()
}

/// All locations, interleaved across groups the way a location file lists them.
pub fn all_locations() -> Vec<Location> {
    let mut north = group(1, NORTH).into_iter();
    let mut central = group(2, CENTRAL).into_iter();
    let mut south = group(3, SOUTH).into_iter();

    let mut locations = Vec::new();
    loop {
        let before = locations.len();
        locations.extend(north.next());
        locations.extend(central.next());
        locations.extend(south.next());
        if locations.len() == before {
            break;
        }
    }
    locations
}

pub fn location_set() -> LocationSet {
    LocationSet::new(all_locations()).expect("fixture locations are valid")
}

/// A set with one extra single-location group 4.
pub fn location_set_with_lone_stop() -> LocationSet {
    let mut locations = all_locations();
    locations.push(Location::new("Lone Meter", 38.947700, -92.335100, 4));
    LocationSet::new(locations).expect("fixture locations are valid")
}
