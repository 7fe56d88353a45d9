//! Login sessions.
//!
//! A [`Session`] is an explicit value handed to whatever needs to know
//! who is logged in. Whether it is still good is a pure function of the
//! session and the current time, see [`is_valid`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// How long a freshly issued session lasts unless configured otherwise.
pub const DEFAULT_SESSION_LIFETIME_HOURS: i64 = 7 * 24;

/// Who the session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Patient,
    HospitalAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token issued by the backend.
    pub token: String,
    pub role: Role,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// The session is no longer valid at or after this instant.
    pub expires_at: DateTime<Utc>,
}

/// Default session lifetime as a [`Duration`].
pub fn default_session_lifetime() -> Duration {
    Duration::hours(DEFAULT_SESSION_LIFETIME_HOURS)
}

impl Session {
    /// Starts a session at `issued_at` that expires `lifetime` later.
    pub fn issue(
        token: impl Into<String>,
        role: Role,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Session {
            token: token.into(),
            role,
            phone: None,
            email: None,
            expires_at: issued_at + lifetime,
        }
    }

    pub fn with_contact(mut self, phone: Option<String>, email: Option<String>) -> Self {
        self.phone = phone;
        self.email = email;
        self
    }

    /// True while the token is non-empty and `now` is before expiry.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        !self.token.is_empty() && now < self.expires_at
    }

    /// Time left before expiry, zero once expired.
    pub fn remaining(&self, now: DateTime<Utc>) -> Duration {
        std::cmp::max(self.expires_at - now, Duration::zero())
    }
}

/// True when there is a session and it has not expired at `now`.
pub fn is_valid(session: Option<&Session>, now: DateTime<Utc>) -> bool {
    session.map_or(false, |s| s.is_valid(now))
}
