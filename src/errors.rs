//! Error type shared by the library and the command line front end.

/// Everything that can go wrong outside of the (total) distance math.
#[derive(Debug, thiserror::Error)]
pub enum LocatorError {
    /// A coordinate was not finite or fell outside the valid range.
    #[error("invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// The city is not in the preset table.
    #[error("unknown city: {0}")]
    UnknownCity(String),

    /// Free text that could not be turned into a value.
    #[error("parse error: {0}")]
    Parse(String),

    /// An environment setting that could not be used.
    #[error("bad configuration value for {key}: {reason}")]
    Config { key: &'static str, reason: String },

    /// Transport failure or non-success status from the backend.
    #[error("HTTP error talking to the backend: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
