//! Async client for the hospital registry REST API.
//!
//! Each call returns the decoded records or a [`LocatorError`]. Callers
//! derive whatever they display from that result; nothing here holds
//! on to state between calls.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::LocatorError;
use crate::facility::{Animal, Availability, Facility, HospitalRegistration};
use crate::location::GeoPoint;
use crate::proximity::rank_nearby;
use crate::ranked::RankedFacility;
use crate::session::{default_session_lifetime, Role, Session};

const ANIMALS_PATH: &str = "api/antivenom/animals";
const ANTIVENOM_HOSPITALS_PATH: &str = "api/antivenom/hospitals";
const BLOOD_BANK_HOSPITALS_PATH: &str = "api/bloodbanks/hospitals";
const ADMIN_REGISTER_PATH: &str = "api/admin/register";
const ADMIN_LOGIN_PATH: &str = "api/admin/login";
const ADMIN_ANTIVENOM_UPDATE_PATH: &str = "api/admin/antivenom/update";
const ADMIN_BLOOD_UPDATE_PATH: &str = "api/admin/blood/update";

/// Talks to the backend. Cheap to clone; clones share one connection
/// pool.
#[derive(Debug, Clone)]
pub struct FacilityClient {
    http: reqwest::Client,
    base_url: Url,
    /// How long sessions from [`FacilityClient::admin_login`] last.
    session_lifetime: chrono::Duration,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
}

impl FacilityClient {
    /// Creates a client for the backend at `base_url`.
    pub fn new(mut base_url: Url, timeout: Duration) -> Result<Self, LocatorError> {
        // Relative joins replace the last path segment unless the base
        // ends in a slash.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        info!("Facility client ready for {}", base_url);
        Ok(FacilityClient {
            http,
            base_url,
            session_lifetime: default_session_lifetime(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LocatorError> {
        Ok(Self::new(config.backend_url.clone(), config.http_timeout)?
            .with_session_lifetime(config.session_lifetime))
    }

    pub fn with_session_lifetime(mut self, lifetime: chrono::Duration) -> Self {
        self.session_lifetime = lifetime;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds the URL for `path` below the base URL with the given query
    /// parameters, percent-encoded.
    pub fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url, LocatorError> {
        let mut url = self.base_url.join(path)?;
        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }

    /// Sends `request` and returns the body of a 2xx response.
    async fn send_text(
        &self,
        method: &str,
        url: &Url,
        request: reqwest::RequestBuilder,
    ) -> Result<String, LocatorError> {
        debug!("{} {}", method, url);
        let response = request.send().await?;
        let response = response.error_for_status().map_err(|e| {
            error!("backend rejected {} {}: {}", method, url, e);
            e
        })?;
        Ok(response.text().await?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, LocatorError> {
        let body = self.send_text("GET", &url, self.http.get(url.clone())).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Lists the venomous animals the backend keeps antivenom records for.
    pub async fn venomous_animals(&self) -> Result<Vec<Animal>, LocatorError> {
        info!("Fetching venomous animals");
        let url = self.endpoint(ANIMALS_PATH, &[])?;
        self.get_json(url).await
    }

    /// Hospitals stocking antivenom for `animal`. The backend is told the
    /// reference point but the result is not assumed to be filtered.
    pub async fn antivenom_hospitals(
        &self,
        animal: &str,
        reference: &GeoPoint,
    ) -> Result<Vec<Facility>, LocatorError> {
        info!("Fetching hospitals with antivenom for {}", animal);
        let url = self.endpoint(
            ANTIVENOM_HOSPITALS_PATH,
            &search_params("animal", animal, reference),
        )?;
        let facilities: Vec<Facility> = self.get_json(url).await?;
        Ok(tag_availability(facilities, || Availability::Antivenom {
            animal: animal.to_string(),
            quantity: None,
        }))
    }

    /// Hospitals and blood banks holding blood of `group`.
    pub async fn blood_banks(
        &self,
        group: &str,
        reference: &GeoPoint,
    ) -> Result<Vec<Facility>, LocatorError> {
        info!("Fetching blood banks with group {}", group);
        let url = self.endpoint(
            BLOOD_BANK_HOSPITALS_PATH,
            &search_params("group", group, reference),
        )?;
        let facilities: Vec<Facility> = self.get_json(url).await?;
        Ok(tag_availability(facilities, || Availability::Blood {
            blood_group: group.to_string(),
            quantity: None,
        }))
    }

    /// Fetches antivenom hospitals and ranks them around `reference`.
    pub async fn search_antivenom(
        &self,
        animal: &str,
        reference: &GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<RankedFacility>, LocatorError> {
        let facilities = self.antivenom_hospitals(animal, reference).await?;
        Ok(rank_nearby(reference, facilities, radius_km))
    }

    /// Fetches blood banks and ranks them around `reference`.
    pub async fn search_blood(
        &self,
        group: &str,
        reference: &GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<RankedFacility>, LocatorError> {
        let facilities = self.blood_banks(group, reference).await?;
        Ok(rank_nearby(reference, facilities, radius_km))
    }

    /// Registers a hospital together with its first admin account and
    /// returns the id the backend assigned to the hospital.
    ///
    /// Coordinates are checked before anything is sent.
    pub async fn register_hospital(
        &self,
        registration: &HospitalRegistration,
    ) -> Result<Uuid, LocatorError> {
        let coordinates = &registration.coordinates;
        GeoPoint::try_new(coordinates.lat(), coordinates.lon())?;

        info!("Registering hospital {} at {}", registration.name, coordinates);
        let url = self.endpoint(ADMIN_REGISTER_PATH, &[])?;
        let body = self
            .send_text("POST", &url, self.http.post(url.clone()).json(registration))
            .await?;
        let id = registered_hospital_id(&body)?;
        info!("Hospital {} registered as {}", registration.name, id);
        Ok(id)
    }

    /// Logs a hospital admin in. The session expires after the client's
    /// session lifetime, counted from `now`.
    pub async fn admin_login(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<Session, LocatorError> {
        info!("Logging in admin {}", username);
        let url = self.endpoint(ADMIN_LOGIN_PATH, &[])?;
        let request = self
            .http
            .post(url.clone())
            .json(&LoginRequest { username, password });
        let body = self.send_text("POST", &url, request).await?;
        let response: LoginResponse = serde_json::from_str(&body)?;
        if response.token.is_empty() {
            return Err(LocatorError::Parse(
                "login response carried an empty token".to_string(),
            ));
        }
        Ok(Session::issue(
            response.token,
            Role::HospitalAdmin,
            now,
            self.session_lifetime,
        ))
    }

    /// Sets a hospital's antivenom stock for `animal`.
    pub async fn update_antivenom(
        &self,
        hospital_id: Uuid,
        animal: &str,
        quantity: u32,
    ) -> Result<String, LocatorError> {
        info!("Setting {} antivenom at {} to {}", animal, hospital_id, quantity);
        let url = self.endpoint(
            ADMIN_ANTIVENOM_UPDATE_PATH,
            &inventory_params(hospital_id, "animalName", animal, quantity),
        )?;
        self.send_text("POST", &url, self.http.post(url.clone())).await
    }

    /// Sets a hospital's stock of blood `group`.
    pub async fn update_blood(
        &self,
        hospital_id: Uuid,
        group: &str,
        quantity: u32,
    ) -> Result<String, LocatorError> {
        info!("Setting {} blood at {} to {}", group, hospital_id, quantity);
        let url = self.endpoint(
            ADMIN_BLOOD_UPDATE_PATH,
            &inventory_params(hospital_id, "bloodGroup", group, quantity),
        )?;
        self.send_text("POST", &url, self.http.post(url.clone())).await
    }
}

fn search_params(key: &'static str, value: &str, reference: &GeoPoint) -> Vec<(&'static str, String)> {
    vec![
        (key, value.to_string()),
        ("lat", reference.lat().to_string()),
        ("lon", reference.lon().to_string()),
    ]
}

fn inventory_params(
    hospital_id: Uuid,
    key: &'static str,
    value: &str,
    quantity: u32,
) -> Vec<(&'static str, String)> {
    vec![
        ("hospitalId", hospital_id.to_string()),
        (key, value.to_string()),
        ("quantity", quantity.to_string()),
    ]
}

/// Pulls the hospital id out of the registration reply, which is prose of
/// the form "... registered with hospital ID: <uuid>\n...".
fn registered_hospital_id(body: &str) -> Result<Uuid, LocatorError> {
    let raw = body
        .split("hospital ID:")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or_else(|| LocatorError::Parse(format!("no hospital id in {:?}", body)))?;
    raw.parse::<Uuid>()
        .map_err(|e| LocatorError::Parse(format!("hospital id {:?}: {}", raw, e)))
}

/// Fills in `availability` on records the backend left it off.
fn tag_availability<F>(mut facilities: Vec<Facility>, make: F) -> Vec<Facility>
where
    F: Fn() -> Availability,
{
    for facility in &mut facilities {
        facility.availability.get_or_insert_with(&make);
    }
    facilities
}
