//! Core library for the `glance` weather screen.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Location resolution and the OpenWeather client
//! - View state, its reducer and the fetch chains that drive it
//! - Display mapping and the screen model
//!
//! It is used by `glance-cli`, but any front-end can drive a [`WeatherApp`]
//! and draw its [`Screen`].

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod state;
pub mod view;

pub use app::{ChainOutcome, WeatherApp};
pub use config::{Config, LocationConfig};
pub use display::Locale;
pub use error::{LocationError, WeatherError};
pub use location::{LocationProvider, PermissionStatus};
pub use model::{Condition, ConditionCategory, Coordinates, CurrentConditions, ForecastEntry};
pub use provider::WeatherService;
pub use state::{Action, ChainId, Phase, ViewState};
pub use view::Screen;

/// Build an app from config. `explicit` coordinates take precedence over
/// the configured location source.
pub fn app_from_config(config: &Config, explicit: Option<Coordinates>) -> anyhow::Result<WeatherApp> {
    let service = provider::service_from_config(config)?;
    let location = location::location_from_config(config, explicit)?;

    Ok(WeatherApp::new(service, location, config.locale()?))
}
