//! Definition of the [`Ranked`] type.
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::facility::Facility;

/// An item paired with its distance from the point a search started at.
/// Built fresh by every search and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ranked<T> {
    /// The ranked item, passed through untouched.
    #[serde(flatten)]
    pub item: T,

    /// Great-circle distance in kilometers. Never negative.
    pub distance_km: OrderedFloat<f64>,
}

/// A facility with its distance from the search point.
pub type RankedFacility = Ranked<Facility>;

impl<T> Ranked<T> {
    pub fn distance_km(&self) -> f64 {
        self.distance_km.into_inner()
    }

    /// Drops the distance and hands back the item.
    pub fn into_inner(self) -> T {
        self.item
    }
}
