/// Failures of the location collaborator.
///
/// A denied permission is not an error; it is reported as
/// [`PermissionStatus::Denied`](crate::location::PermissionStatus).
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location service unavailable: {0}")]
    Unavailable(String),
    #[error("Location request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("Failed to parse location response: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Failures of a single fetch-chain stage.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("Failed to send request to OpenWeather ({call}): {source}")]
    Request {
        call: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to parse OpenWeather {call} JSON: {source}")]
    Decode {
        call: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Location(#[from] LocationError),
}
