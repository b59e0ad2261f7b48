use crate::{
    Config,
    error::WeatherError,
    model::{Coordinates, CurrentConditions, ForecastEntry},
    provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The three remote calls a fetch chain is built from.
#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    async fn current_by_coords(
        &self,
        coords: Coordinates,
    ) -> Result<CurrentConditions, WeatherError>;

    async fn current_by_city(&self, city: &str) -> Result<CurrentConditions, WeatherError>;

    async fn forecast_by_coords(
        &self,
        coords: Coordinates,
    ) -> Result<Vec<ForecastEntry>, WeatherError>;
}

/// Construct the OpenWeather client from config.
pub fn service_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherService>> {
    let api_key = config.api_key()?;
    let client = OpenWeatherClient::new(
        api_key.to_owned(),
        config.base_url(),
        config.request_timeout(),
    )?;

    Ok(Box::new(client))
}
