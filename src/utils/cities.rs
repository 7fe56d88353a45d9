//! Preset cities for when no precise location is available.

use crate::errors::LocatorError;
use crate::location::GeoPoint;

/// A named point the user can pick instead of sharing their location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub name: &'static str,
    pub location: GeoPoint,
}

static PRESET_CITIES: [City; 3] = [
    City {
        name: "Bangalore",
        location: GeoPoint::new(12.9716, 77.5946),
    },
    City {
        name: "Mumbai",
        location: GeoPoint::new(19.0760, 72.8777),
    },
    City {
        name: "Delhi",
        location: GeoPoint::new(28.6139, 77.2090),
    },
];

/// All preset cities in display order.
pub fn preset_cities() -> &'static [City] {
    &PRESET_CITIES
}

/// Looks a city up by name, ignoring case and surrounding whitespace.
pub fn city_location(name: &str) -> Option<GeoPoint> {
    let name = name.trim();
    PRESET_CITIES
        .iter()
        .find(|city| city.name.eq_ignore_ascii_case(name))
        .map(|city| city.location)
}

/// Like [`city_location`], but an unknown city is an error.
pub fn require_city(name: &str) -> Result<GeoPoint, LocatorError> {
    city_location(name).ok_or_else(|| {
        warn!("unknown city {:?}", name);
        LocatorError::UnknownCity(name.trim().to_string())
    })
}
