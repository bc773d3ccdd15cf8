//! Weather source error types.

/// Errors from fetching METAR/TAF data.
///
/// An unknown station is never an error: sources answer it with a synthetic
/// METAR and no TAF.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// HTTP request failed (connection refused, DNS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Backend returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be decoded
    #[error("malformed response: {message}{}", body_suffix(.body))]
    Malformed {
        message: String,
        body: Option<String>,
    },

    /// Client configuration cannot be used
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

fn body_suffix(body: &Option<String>) -> String {
    body.as_deref()
        .map(|b| format!(" (body: {b})"))
        .unwrap_or_default()
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WeatherError::Timeout
        } else {
            WeatherError::Http(err)
        }
    }
}
