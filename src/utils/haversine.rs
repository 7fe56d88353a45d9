//! Great-circle math on a spherical earth.
//!
//! The sphere has the mean earth radius, so results are off by up to
//! about 0.3% from the ellipsoid. That is fine for "within N km" triage
//! and not fine for navigation.

use crate::location::GeoPoint;

/// Mean earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Returns the great-circle distance between two points in kilometers,
/// using the haversine formula.
///
/// No validation is done. Out-of-range input gives a well-defined but
/// meaningless number, and NaN input gives NaN.
///
/// # Arguments
/// * `a` - The first point.
/// * `b` - The second point.
pub fn compute_distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat().to_radians();
    let lat2 = b.lat().to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = b.lon().to_radians() - a.lon().to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push near-antipodal pairs just past 1. NaN passes through.
    let h = if h > 1.0 { 1.0 } else { h };
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

/// Returns the point reached by travelling `distance_km` from `origin`
/// along the great circle that leaves it at `bearing_deg` (clockwise
/// from north).
///
/// Longitude is normalized to `[-180, 180]`.
pub fn destination_point(origin: &GeoPoint, bearing_deg: f64, distance_km: f64) -> GeoPoint {
    let lat1 = origin.lat().to_radians();
    let lon1 = origin.lon().to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lon2 = lon1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    let lon2 = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    GeoPoint::new(lat2.to_degrees(), lon2)
}
