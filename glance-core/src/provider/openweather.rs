use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    error::WeatherError,
    model::{Condition, ConditionCategory, Coordinates, CurrentConditions, ForecastEntry},
};

use super::WeatherService;

pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org";

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";

/// Client for the free OpenWeather 2.5 endpoints.
///
/// Responses are not validated against the HTTP status: an error body such
/// as `{"cod":"404","message":"city not found"}` is decoded like any other
/// payload and yields empty fields.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(
        api_key: String,
        base_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, WeatherError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(WeatherError::Client)?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        call: &'static str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| WeatherError::Request { call, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| WeatherError::Request { call, source })?;

        tracing::debug!(call, %status, body = %truncate_body(&body), "OpenWeather response");

        if !status.is_success() {
            warn_error_body(call, status, &body);
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Decode { call, source })
    }
}

fn coords_query(coords: Coordinates) -> [(&'static str, String); 2] {
    [("lat", coords.latitude.to_string()), ("lon", coords.longitude.to_string())]
}

fn warn_error_body(call: &'static str, status: StatusCode, body: &str) {
    let message = serde_json::from_str::<OwError>(body).ok().and_then(|e| e.message);

    tracing::warn!(
        call,
        %status,
        message = message.as_deref().unwrap_or(""),
        "OpenWeather returned a non-success status; using the body as data",
    );
}

#[derive(Debug, Deserialize)]
struct OwError {
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: Option<String>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Option<Vec<OwForecastEntry>>,
}

fn temperature(main: Option<OwMain>) -> f64 {
    main.and_then(|m| m.temp).unwrap_or(f64::NAN)
}

fn current_temperature(main: Option<OwMain>) -> Option<f64> {
    main.map(|m| m.temp.unwrap_or(f64::NAN))
}

fn first_condition(weather: Option<Vec<OwWeather>>) -> Option<Condition> {
    let first = weather?.into_iter().next()?;

    Some(Condition {
        category: ConditionCategory::from_main(first.main.as_deref().unwrap_or_default()),
        description: first.description.unwrap_or_default(),
    })
}

impl From<OwCurrentResponse> for CurrentConditions {
    fn from(value: OwCurrentResponse) -> Self {
        CurrentConditions {
            city: value.name,
            temperature_k: current_temperature(value.main),
            condition: first_condition(value.weather),
        }
    }
}

impl From<OwForecastEntry> for ForecastEntry {
    fn from(value: OwForecastEntry) -> Self {
        ForecastEntry {
            timestamp: value.dt_txt.unwrap_or_default(),
            temperature_k: temperature(value.main),
            condition: first_condition(value.weather),
        }
    }
}

#[async_trait]
impl WeatherService for OpenWeatherClient {
    async fn current_by_coords(
        &self,
        coords: Coordinates,
    ) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse =
            self.get_json("current weather", CURRENT_PATH, &coords_query(coords)).await?;

        Ok(parsed.into())
    }

    async fn current_by_city(&self, city: &str) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse = self
            .get_json("city weather", CURRENT_PATH, &[("q", city.to_string())])
            .await?;

        Ok(parsed.into())
    }

    async fn forecast_by_coords(
        &self,
        coords: Coordinates,
    ) -> Result<Vec<ForecastEntry>, WeatherError> {
        let parsed: OwForecastResponse =
            self.get_json("forecast", FORECAST_PATH, &coords_query(coords)).await?;

        Ok(parsed.list.unwrap_or_default().into_iter().map(ForecastEntry::from).collect())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
