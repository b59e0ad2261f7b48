//! Foreground location: a permission check followed by a single
//! position reading. No tracking, no accuracy settings.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::{fmt::Debug, time::Duration};

use crate::{Config, error::LocationError, model::Coordinates};

pub const IP_LOCATION_URL: &str = "http://ip-api.com/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

#[async_trait]
pub trait LocationProvider: Send + Sync + Debug {
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError>;

    /// Only meaningful after permission was granted.
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Position known up front (config file or command line). Without one,
/// permission is denied.
#[derive(Debug, Clone, Default)]
pub struct StaticLocation {
    coords: Option<Coordinates>,
}

impl StaticLocation {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl LocationProvider for StaticLocation {
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
        Ok(match self.coords {
            Some(_) => PermissionStatus::Granted,
            None => PermissionStatus::Denied,
        })
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        self.coords
            .ok_or_else(|| LocationError::Unavailable("no position configured".to_string()))
    }
}

/// Approximate position derived from the public IP address.
#[derive(Debug, Clone)]
pub struct IpLocation {
    endpoint: String,
    http: Client,
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

impl IpLocation {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, LocationError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            endpoint: endpoint.to_string(),
            http: builder.build().map_err(LocationError::Request)?,
        })
    }
}

#[async_trait]
impl LocationProvider for IpLocation {
    async fn request_permission(&self) -> Result<PermissionStatus, LocationError> {
        Ok(PermissionStatus::Granted)
    }

    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        let parsed: IpApiResponse = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(LocationError::Request)?
            .json()
            .await
            .map_err(LocationError::Decode)?;

        if parsed.status != "success" {
            return Err(LocationError::Unavailable(
                parsed.message.unwrap_or_else(|| parsed.status.clone()),
            ));
        }

        match (parsed.lat, parsed.lon) {
            (Some(lat), Some(lon)) => {
                tracing::debug!(city = parsed.city.as_deref().unwrap_or(""), lat, lon, "IP location");
                Ok(Coordinates::new(lat, lon))
            }
            _ => Err(LocationError::Unavailable("response carried no coordinates".to_string())),
        }
    }
}

/// Pick the location source: explicit coordinates, then the configured
/// position, then IP lookup when enabled. Otherwise location is denied.
pub fn location_from_config(
    config: &Config,
    explicit: Option<Coordinates>,
) -> Result<Box<dyn LocationProvider>, LocationError> {
    if let Some(coords) = explicit.or_else(|| config.coordinates()) {
        return Ok(Box::new(StaticLocation::new(Some(coords))));
    }

    if config.use_ip_location {
        return Ok(Box::new(IpLocation::new(IP_LOCATION_URL, config.request_timeout())?));
    }

    Ok(Box::new(StaticLocation::new(None)))
}
