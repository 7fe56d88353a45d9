//! Synthesizes facilities for demos and tests.

use rand::Rng;
use uuid::Uuid;

use crate::facility::Facility;
use crate::haversine::destination_point;
use crate::location::GeoPoint;

/// Builds a facility with a fresh id and placeholder contact details.
pub fn facility_at(name: &str, coordinates: GeoPoint) -> Facility {
    Facility {
        id: Uuid::new_v4(),
        name: name.to_string(),
        location: format!("near {}", coordinates),
        contact: "+00 000 000 0000".to_string(),
        email: None,
        coordinates,
        availability: None,
    }
}

/// Generates `capacity` facilities scattered around `location`.
///
/// Bearings are uniform. Distances are drawn so that facilities spread
/// evenly over the disc instead of bunching up in the middle.
///
/// # Arguments
/// * `location` - Center of the disc.
/// * `radius_km` - No facility is farther than this from `location`.
/// * `capacity` - Number of facilities to generate.
pub fn generate_facilities_near(location: &GeoPoint, radius_km: f64, capacity: usize) -> Vec<Facility> {
    debug!(
        "generating {} facilities within {} km of {}",
        capacity, radius_km, location
    );
    let mut rng = rand::thread_rng();
    (0..capacity)
        .map(|i| {
            let bearing = rng.gen_range(0.0..360.0);
            let distance_km = radius_km * rng.gen::<f64>().sqrt();
            facility_at(
                &format!("Facility {}", i + 1),
                destination_point(location, bearing, distance_km),
            )
        })
        .collect()
}
