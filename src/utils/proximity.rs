//! Ranks facilities by distance from a reference point.
//!
//! Everything here is a pure function of its inputs: no I/O, no shared
//! state, safe to call from as many tasks at once as needed.

use ordered_float::OrderedFloat;

use crate::facility::{AsLocation, Facility};
use crate::haversine::compute_distance_km;
use crate::location::GeoPoint;
use crate::ranked::{Ranked, RankedFacility};

/// Search radius used when the caller does not pick one.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 100.0;

/// Query struct for ranking facilities near a location.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NearbyQuery {
    /// Where the search starts.
    pub location: GeoPoint,
    /// Candidates farther than this are dropped.
    pub radius_km: f64,
}

impl NearbyQuery {
    /// Query with the [`DEFAULT_SEARCH_RADIUS_KM`] radius.
    pub fn new(location: GeoPoint) -> Self {
        NearbyQuery {
            location,
            radius_km: DEFAULT_SEARCH_RADIUS_KM,
        }
    }

    pub fn with_radius(mut self, radius_km: f64) -> Self {
        self.radius_km = radius_km;
        self
    }

    /// See [`rank_nearby`].
    pub fn rank(&self, facilities: Vec<Facility>) -> Vec<RankedFacility> {
        rank_nearby(&self.location, facilities, self.radius_km)
    }
}

/// Ranks facilities nearest-first and drops the ones beyond
/// `max_radius_km`.
///
/// # Arguments
/// * `reference` - The point distances are measured from.
/// * `facilities` - Candidates in any order. Duplicates are kept.
/// * `max_radius_km` - A facility exactly on the radius is kept.
///
/// # Returns
/// The surviving facilities with their distances, nearest first.
/// Facilities at the same distance keep their input order. Empty input,
/// or nothing in range, gives an empty vector.
pub fn rank_nearby(
    reference: &GeoPoint,
    facilities: Vec<Facility>,
    max_radius_km: f64,
) -> Vec<RankedFacility> {
    info!(
        "Ranking {} facilities within {} km of {}",
        facilities.len(),
        max_radius_km,
        reference
    );
    let ranked = rank_by_distance(reference, facilities, max_radius_km);
    info!("{} facilities in range", ranked.len());
    ranked
}

/// Generic form of [`rank_nearby`] for anything that has a location.
///
/// Candidates whose distance is not finite (NaN coordinates somewhere)
/// never compare as within range, so they are dropped and logged.
///
/// # Time Complexity
/// *O*(*n* log *n*) for the sort.
pub fn rank_by_distance<T, I>(reference: &GeoPoint, items: I, max_radius_km: f64) -> Vec<Ranked<T>>
where
    T: AsLocation,
    I: IntoIterator<Item = T>,
{
    let mut ranked: Vec<Ranked<T>> = items
        .into_iter()
        .filter_map(|item| {
            let distance_km = compute_distance_km(reference, item.as_location());
            debug!("{} -> {}: {} km", reference, item.as_location(), distance_km);
            if !distance_km.is_finite() {
                warn!(
                    "dropping candidate at {} with non-finite distance",
                    item.as_location()
                );
                return None;
            }
            (distance_km <= max_radius_km).then(|| Ranked {
                item,
                distance_km: OrderedFloat(distance_km),
            })
        })
        .collect();

    // `sort_by_key` is stable, so ties keep their input order.
    ranked.sort_by_key(|r| r.distance_km);
    ranked
}

/// Returns the facility nearest to `reference`, however far away it is.
/// The first of several equally near facilities wins.
pub fn nearest_facility(reference: &GeoPoint, facilities: Vec<Facility>) -> Option<RankedFacility> {
    info!("Getting nearest facility to {}", reference);
    let nearest = rank_by_distance(reference, facilities, f64::INFINITY)
        .into_iter()
        .next();
    debug!("nearest: {:?}", nearest);
    nearest
}

#[cfg(test)]
mod proximity_tests {
    use super::*;
    use crate::generator::{facility_at, generate_facilities_near};
    use crate::haversine::destination_point;

    const REFERENCE: GeoPoint = GeoPoint::new(12.9716, 77.5946);

    /// Facilities due north of the reference at the given distances.
    fn facilities_at(distances: &[f64]) -> Vec<Facility> {
        distances
            .iter()
            .map(|d| facility_at(&format!("{} km", d), destination_point(&REFERENCE, 0.0, *d)))
            .collect()
    }

    fn names(ranked: &[RankedFacility]) -> Vec<&str> {
        ranked.iter().map(|r| r.item.name.as_str()).collect()
    }

    #[test]
    fn test_radius_filter() {
        let facilities = facilities_at(&[500.0, 99.9, 5.0, 100.1, 50.0]);
        let ranked = rank_nearby(&REFERENCE, facilities, 100.0);

        assert_eq!(names(&ranked), vec!["5 km", "50 km", "99.9 km"]);
        for (r, expected) in ranked.iter().zip([5.0, 50.0, 99.9]) {
            assert!((r.distance_km() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn test_facility_on_the_radius_is_kept() {
        let on_edge = facility_at("edge", REFERENCE);
        let ranked = rank_nearby(&REFERENCE, vec![on_edge], 0.0);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].distance_km(), 0.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(rank_nearby(&REFERENCE, vec![], DEFAULT_SEARCH_RADIUS_KM).is_empty());
    }

    #[test]
    fn test_nothing_in_range() {
        let facilities = facilities_at(&[150.0, 900.0]);
        assert!(rank_nearby(&REFERENCE, facilities, 100.0).is_empty());
    }

    #[test]
    fn test_ties_keep_input_order() {
        let east = destination_point(&REFERENCE, 90.0, 20.0);
        let facilities = vec![
            facility_at("first", east),
            facility_at("closer", destination_point(&REFERENCE, 0.0, 10.0)),
            facility_at("second", east),
            facility_at("third", east),
        ];
        let ranked = rank_nearby(&REFERENCE, facilities, 100.0);
        assert_eq!(names(&ranked), vec!["closer", "first", "second", "third"]);
    }

    #[test]
    fn test_nan_coordinates_are_dropped() {
        let facilities = vec![
            facility_at("broken", GeoPoint::new(f64::NAN, 77.0)),
            facility_at("fine", destination_point(&REFERENCE, 45.0, 3.0)),
        ];
        let ranked = rank_nearby(&REFERENCE, facilities, f64::INFINITY);
        assert_eq!(names(&ranked), vec!["fine"]);
    }

    #[test]
    fn test_other_fields_pass_through() {
        let facilities = facilities_at(&[12.0]);
        let original = facilities[0].clone();
        let ranked = rank_nearby(&REFERENCE, facilities, 100.0);
        assert_eq!(ranked[0].item, original);
        assert_eq!(ranked[0].clone().into_inner(), original);
    }

    #[test]
    fn test_query_defaults() {
        let query = NearbyQuery::new(REFERENCE);
        assert_eq!(query.radius_km, DEFAULT_SEARCH_RADIUS_KM);

        let facilities = facilities_at(&[80.0, 120.0]);
        assert_eq!(query.rank(facilities.clone()).len(), 1);
        assert_eq!(query.with_radius(200.0).rank(facilities).len(), 2);
    }

    #[test]
    fn test_nearest_facility_ignores_radius() {
        let facilities = facilities_at(&[900.0, 400.0, 1200.0]);
        let nearest = nearest_facility(&REFERENCE, facilities).unwrap();
        assert_eq!(nearest.item.name, "400 km");
        assert!(nearest_facility(&REFERENCE, vec![]).is_none());
    }

    #[test]
    fn test_rank_bare_points() {
        let points = vec![
            destination_point(&REFERENCE, 180.0, 30.0),
            destination_point(&REFERENCE, 270.0, 3.0),
        ];
        let ranked = rank_by_distance(&REFERENCE, points.clone(), 100.0);
        assert_eq!(ranked[0].item, points[1]);
        assert_eq!(ranked[1].item, points[0]);
    }

    #[test]
    fn test_generated_facilities_sorted_and_in_range() {
        let facilities = generate_facilities_near(&REFERENCE, 150.0, 200);
        let ranked = rank_nearby(&REFERENCE, facilities, 100.0);

        assert!(!ranked.is_empty(), "Expected some facilities within 100 km");
        assert!(ranked.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
        assert!(ranked.iter().all(|r| r.distance_km() <= 100.0));
    }
}
