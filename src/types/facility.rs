//! Struct definitions and implementations for objects that sit at a
//! point on the map.
//!
//! The most common one is a [`Facility`]: a hospital or blood bank as
//! returned by the backend. Ranking code does not care about any of the
//! facility's fields except its position, so it is written against the
//! [`AsLocation`] trait. Functions that take an `AsLocation` parameter
//! call [`as_location`](`AsLocation::as_location`) to get the
//! [`GeoPoint`] and leave everything else alone.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::GeoPoint;

/// Anything with a position that proximity search can rank.
pub trait AsLocation {
    /// Returns the point the object sits at.
    fn as_location(&self) -> &GeoPoint;
}

impl AsLocation for GeoPoint {
    fn as_location(&self) -> &GeoPoint {
        self
    }
}

//------------------------------------------------------------------
// Structs and Implementations
//------------------------------------------------------------------

/// A hospital or blood bank record.
///
/// The JSON shape matches the backend's hospital objects: `id`, `name`,
/// `location`, `contact`, `latitude`, `longitude` and an optional
/// `email`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Facility {
    /// Opaque identifier assigned by the backend.
    pub id: Uuid,

    /// Display name.
    pub name: String,

    /// Free text address or area label, e.g. `"Indiranagar, Bangalore"`.
    pub location: String,

    /// Phone number or other contact string.
    pub contact: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Where the facility is. Serialized as top level `latitude` and
    /// `longitude` fields.
    #[serde(flatten)]
    pub coordinates: GeoPoint,

    /// What the facility was found to stock. Filled in by the backend
    /// or by the client that fetched the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
}

impl AsLocation for Facility {
    fn as_location(&self) -> &GeoPoint {
        &self.coordinates
    }
}

/// Stock a facility holds that made it show up in a search.
///
/// Quantities are supplied by the backend, never computed locally, and
/// are not always reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Availability {
    /// Antivenom for bites or stings of the named animal.
    Antivenom {
        animal: String,
        #[serde(default)]
        quantity: Option<u32>,
    },
    /// Units of the given blood group, e.g. `"O+"`.
    Blood {
        blood_group: String,
        #[serde(default)]
        quantity: Option<u32>,
    },
}

/// A venomous animal the backend keeps antivenom records for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// What a hospital sends to sign itself and its first admin up.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalRegistration {
    pub name: String,
    pub location: String,
    pub contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub coordinates: GeoPoint,
    pub username: String,
    pub admin_password: String,
}

impl fmt::Debug for HospitalRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HospitalRegistration")
            .field("name", &self.name)
            .field("location", &self.location)
            .field("contact", &self.contact)
            .field("email", &self.email)
            .field("coordinates", &self.coordinates)
            .field("username", &self.username)
            .field("admin_password", &"<redacted>")
            .finish()
    }
}

impl AsLocation for HospitalRegistration {
    fn as_location(&self) -> &GeoPoint {
        &self.coordinates
    }
}

//------------------------------------------------------------------
// Unit Tests
//------------------------------------------------------------------

#[cfg(test)]
mod facility_type_tests {
    use super::*;

    const HOSPITAL_JSON: &str = r#"{
        "id": "6f1c2f4e-8a52-4bb7-9a66-0f0c3a1f7d10",
        "name": "City General",
        "location": "MG Road, Bangalore",
        "contact": "+91 80 1234 5678",
        "latitude": 12.9756,
        "longitude": 77.6050,
        "email": "desk@citygeneral.example",
        "departments": ["emergency"]
    }"#;

    #[test]
    fn test_decode_backend_hospital() {
        let facility: Facility = serde_json::from_str(HOSPITAL_JSON).unwrap();
        assert_eq!(facility.name, "City General");
        assert_eq!(facility.coordinates, GeoPoint::new(12.9756, 77.6050));
        assert_eq!(
            facility.email.as_deref(),
            Some("desk@citygeneral.example")
        );
        assert!(facility.availability.is_none());
    }

    #[test]
    fn test_missing_coordinates_is_an_error() {
        let json = r#"{
            "id": "6f1c2f4e-8a52-4bb7-9a66-0f0c3a1f7d10",
            "name": "No Coordinates",
            "location": "Somewhere",
            "contact": "n/a"
        }"#;
        assert!(serde_json::from_str::<Facility>(json).is_err());
    }

    #[test]
    fn test_availability_round_trips_through_json() {
        let mut facility: Facility = serde_json::from_str(HOSPITAL_JSON).unwrap();
        facility.availability = Some(Availability::Blood {
            blood_group: "AB-".to_string(),
            quantity: Some(4),
        });

        let json = serde_json::to_value(&facility).unwrap();
        assert_eq!(json["availability"]["kind"], "blood");
        assert_eq!(json["latitude"], 12.9756);

        let back: Facility = serde_json::from_value(json).unwrap();
        assert_eq!(back, facility);
    }

    #[test]
    fn test_as_location() {
        let facility: Facility = serde_json::from_str(HOSPITAL_JSON).unwrap();
        assert_eq!(facility.as_location(), &facility.coordinates);

        let point = GeoPoint::new(1.0, 2.0);
        assert_eq!(point.as_location(), &point);
    }

    #[test]
    fn test_decode_animal() {
        let animal: Animal = serde_json::from_str(
            r#"{"id": "1b4e28ba-2fa1-11d2-883f-0016d3cca427", "name": "Cobra", "photoUrl": null}"#,
        )
        .unwrap();
        assert_eq!(animal.name, "Cobra");
        assert!(animal.photo_url.is_none());
    }

    #[test]
    fn test_registration_wire_format() {
        let registration = HospitalRegistration {
            name: "City Hospital".to_string(),
            location: "MG Road".to_string(),
            contact: "080-1234".to_string(),
            email: None,
            coordinates: GeoPoint::new(12.97, 77.59),
            username: "cityadmin".to_string(),
            admin_password: "hunter2".to_string(),
        };
        let json = serde_json::to_value(&registration).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "City Hospital",
                "location": "MG Road",
                "contact": "080-1234",
                "latitude": 12.97,
                "longitude": 77.59,
                "username": "cityadmin",
                "adminPassword": "hunter2"
            })
        );
        assert!(!format!("{:?}", registration).contains("hunter2"));
    }
}
