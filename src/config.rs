//! Settings read from the environment.
//!
//! Every setting has a default, so an empty environment is a valid
//! configuration. The binary loads a `.env` file first when one exists.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

use crate::errors::LocatorError;
use crate::proximity::DEFAULT_SEARCH_RADIUS_KM;
use crate::session::{Role, Session, DEFAULT_SESSION_LIFETIME_HOURS};

pub const BACKEND_URL_VAR: &str = "MEDLOCATE_BACKEND_URL";
pub const SEARCH_RADIUS_VAR: &str = "MEDLOCATE_SEARCH_RADIUS_KM";
pub const HTTP_TIMEOUT_VAR: &str = "MEDLOCATE_HTTP_TIMEOUT_SECS";
pub const SESSION_LIFETIME_VAR: &str = "MEDLOCATE_SESSION_LIFETIME_HOURS";

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the hospital registry service.
    pub backend_url: Url,
    /// Radius applied to searches that do not name one.
    pub search_radius_km: f64,
    pub http_timeout: Duration,
    pub session_lifetime: chrono::Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default backend URL is valid"),
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            session_lifetime: chrono::Duration::hours(DEFAULT_SESSION_LIFETIME_HOURS),
        }
    }
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, LocatorError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Missing or blank keys fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LocatorError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let backend_url = match get(BACKEND_URL_VAR) {
            Some(raw) => Url::parse(raw.trim()).map_err(|e| LocatorError::Config {
                key: BACKEND_URL_VAR,
                reason: e.to_string(),
            })?,
            None => defaults.backend_url,
        };

        let search_radius_km = match get(SEARCH_RADIUS_VAR) {
            Some(raw) => parse_radius_km(&raw).map_err(|e| LocatorError::Config {
                key: SEARCH_RADIUS_VAR,
                reason: e.to_string(),
            })?,
            None => defaults.search_radius_km,
        };

        let http_timeout = match get(HTTP_TIMEOUT_VAR) {
            Some(raw) => Duration::from_secs(parse_value(HTTP_TIMEOUT_VAR, &raw)?),
            None => defaults.http_timeout,
        };

        let session_lifetime = match get(SESSION_LIFETIME_VAR) {
            Some(raw) => chrono::Duration::hours(parse_value::<u32>(SESSION_LIFETIME_VAR, &raw)?.into()),
            None => defaults.session_lifetime,
        };

        let config = Config {
            backend_url,
            search_radius_km,
            http_timeout,
            session_lifetime,
        };
        debug!("config: {:?}", config);
        Ok(config)
    }

    /// Starts a session that lasts the configured lifetime.
    pub fn issue_session(
        &self,
        token: impl Into<String>,
        role: Role,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Session {
        Session::issue(token, role, now, self.session_lifetime)
    }
}

/// Parses a search radius in kilometers. The radius must be finite and not
/// negative.
pub fn parse_radius_km(raw: &str) -> Result<f64, LocatorError> {
    let radius = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| LocatorError::Parse(format!("{:?}: {}", raw, e)))?;
    if !radius.is_finite() || radius < 0.0 {
        return Err(LocatorError::Parse(format!(
            "{} is not a usable radius",
            radius
        )));
    }
    Ok(radius)
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, LocatorError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| LocatorError::Config {
        key,
        reason: format!("{:?}: {}", raw, e),
    })
}

#[cfg(test)]
mod config_tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_empty_environment_gives_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search_radius_km, 100.0);
        assert_eq!(config.backend_url.as_str(), "http://localhost:8080/");
        assert_eq!(config.session_lifetime, chrono::Duration::days(7));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            (BACKEND_URL_VAR, "https://api.example.org/locator/"),
            (SEARCH_RADIUS_VAR, " 25.5 "),
            (HTTP_TIMEOUT_VAR, "3"),
            (SESSION_LIFETIME_VAR, "12"),
        ]))
        .unwrap();

        assert_eq!(config.backend_url.as_str(), "https://api.example.org/locator/");
        assert_eq!(config.search_radius_km, 25.5);
        assert_eq!(config.http_timeout, Duration::from_secs(3));
        assert_eq!(config.session_lifetime, chrono::Duration::hours(12));
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = Config::from_lookup(lookup(&[(SEARCH_RADIUS_VAR, "  ")])).unwrap();
        assert_eq!(config.search_radius_km, DEFAULT_SEARCH_RADIUS_KM);
    }

    #[test]
    fn test_issue_session_uses_configured_lifetime() {
        let config = Config::from_lookup(lookup(&[(SESSION_LIFETIME_VAR, "2")])).unwrap();
        let now = chrono::Utc::now();
        let session = config.issue_session("tok", Role::Patient, now);
        assert!(session.is_valid(now + chrono::Duration::minutes(119)));
        assert!(!session.is_valid(now + chrono::Duration::hours(2)));
    }

    #[test]
    fn test_parse_radius_km() {
        assert_eq!(parse_radius_km("0").unwrap(), 0.0);
        assert_eq!(parse_radius_km(" 12.5 ").unwrap(), 12.5);
        for raw in ["-1", "-0.5", "NaN", "inf", "-inf", "far", ""] {
            assert!(
                matches!(parse_radius_km(raw), Err(LocatorError::Parse(_))),
                "{:?} was accepted",
                raw
            );
        }
    }

    #[test]
    fn test_bad_values_are_rejected() {
        for (key, value) in [
            (SEARCH_RADIUS_VAR, "far"),
            (SEARCH_RADIUS_VAR, "-1"),
            (SEARCH_RADIUS_VAR, "NaN"),
            (HTTP_TIMEOUT_VAR, "-3"),
            (BACKEND_URL_VAR, "not a url"),
        ] {
            let err = Config::from_lookup(lookup(&[(key, value)])).unwrap_err();
            assert!(
                matches!(err, LocatorError::Config { key: k, .. } if k == key),
                "{}={} gave {:?}",
                key,
                value,
                err
            );
        }
    }
}
