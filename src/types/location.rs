//! Struct definitions and implementations for [`GeoPoint`].
//!
//! A `GeoPoint` can come from a preset city, from a `"lat,lon"` string
//! typed on the command line or carried in a query string, or from the
//! `latitude` / `longitude` fields of a backend facility record.

use std::fmt;
use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::errors::LocatorError;

/// A [`GeoPoint`] is a latitude / longitude pair in degrees.
///
/// Values are not range checked by [`GeoPoint::new`]. Anything that
/// comes from a user should go through [`GeoPoint::try_new`] or
/// [`FromStr`] instead.
///
/// [`OrderedFloat`] gives the type `Eq` and `Hash`, so facilities that
/// carry a point can be used as map keys.
#[derive(Debug, PartialEq, Hash, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Degrees north of the equator, in `[-90, 90]`.
    pub latitude: OrderedFloat<f64>,

    /// Degrees east of Greenwich, in `[-180, 180]`.
    pub longitude: OrderedFloat<f64>,
}

impl GeoPoint {
    /// Builds a point without validation.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            latitude: OrderedFloat(latitude),
            longitude: OrderedFloat(longitude),
        }
    }

    /// Builds a point, rejecting non-finite or out-of-range values.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, LocatorError> {
        let point = GeoPoint::new(latitude, longitude);
        if point.is_valid() {
            Ok(point)
        } else {
            warn!("rejecting coordinate ({}, {})", latitude, longitude);
            Err(LocatorError::InvalidCoordinate {
                latitude,
                longitude,
            })
        }
    }

    pub fn lat(&self) -> f64 {
        self.latitude.into_inner()
    }

    pub fn lon(&self) -> f64 {
        self.longitude.into_inner()
    }

    /// True when both values are finite and inside their ranges.
    pub fn is_valid(&self) -> bool {
        let (lat, lon) = (self.lat(), self.lon());
        lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon)
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from(pair: (f64, f64)) -> Self {
        GeoPoint::new(pair.0, pair.1)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat(), self.lon())
    }
}

/// Parses `"lat,lon"`. Whitespace around either value is ignored.
impl FromStr for GeoPoint {
    type Err = LocatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| LocatorError::Parse(format!("expected \"lat,lon\", got {:?}", s)))?;

        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| LocatorError::Parse(format!("{:?}: {}", part.trim(), e)))
        };

        GeoPoint::try_new(parse(lat)?, parse(lon)?)
    }
}
