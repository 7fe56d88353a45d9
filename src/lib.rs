//! Medical Facility Locator Library.
//! Finds hospitals and blood banks near a point and ranks them by
//! great-circle distance.

#[macro_use]
extern crate log;

pub mod types {
    pub mod facility;
    pub mod location;
    pub mod ranked;
    pub mod session;
}

pub mod utils {
    pub mod cities;
    pub mod generator;
    pub mod haversine;
    pub mod proximity;
}

pub mod client;
pub mod config;
pub mod errors;

pub use types::{facility, location, ranked, session};
pub use utils::{cities, generator, haversine, proximity};

pub use errors::LocatorError;
pub use facility::{Animal, Availability, Facility, HospitalRegistration};
pub use location::GeoPoint;
pub use proximity::{rank_nearby, NearbyQuery, DEFAULT_SEARCH_RADIUS_KM};
pub use ranked::{Ranked, RankedFacility};
