//! Cities offered for quick weather lookup.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct City {
    pub name: &'static str,
    pub latitude: f64,
    pub longitude: f64,
}

const fn city(name: &'static str, latitude: f64, longitude: f64) -> City {
    City {
        name,
        latitude,
        longitude,
    }
}

pub static CITIES: [City; 10] = [
    city("Madrid", 40.4168, -3.7038),
    city("Barcelona", 41.3874, 2.1686),
    city("New York", 40.7128, -74.0060),
    city("Tokyo", 35.6762, 139.6503),
    city("Berlin", 52.5200, 13.4050),
    city("London", 51.5074, -0.1278),
    city("Paris", 48.8566, 2.3522),
    city("Rome", 41.9028, 12.4964),
    city("Sydney", -33.8688, 151.2093),
    city("Cairo", 30.0444, 31.2357),
];

/// Case-insensitive lookup by name. Surrounding whitespace is ignored.
pub fn find_city(name: &str) -> Option<&'static City> {
    let name = name.trim();
    CITIES.iter().find(|c| c.name.eq_ignore_ascii_case(name))
}
