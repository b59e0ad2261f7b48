use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use glance_core::{ChainOutcome, Config, Coordinates, Locale, WeatherApp};
use std::convert::TryFrom;

use crate::{configure, interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "glance", version, about = "Current weather and forecast at a glance")]
pub struct Cli {
    /// Display locale ("ko" or "en"); overrides the config file.
    #[arg(long, global = true)]
    pub locale: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Position given on the command line instead of the configured source.
#[derive(Debug, Args)]
pub struct PositionArgs {
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    pub lat: Option<f64>,

    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    pub lon: Option<f64>,
}

impl PositionArgs {
    fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, locale and location source.
    Configure,

    /// Resolve the location and show current weather and forecast.
    Show {
        #[command(flatten)]
        position: PositionArgs,
    },

    /// Show the screen after searching for a city.
    Search {
        /// City name, e.g. "Seoul".
        city: String,

        #[command(flatten)]
        position: PositionArgs,
    },

    /// Keep the screen open and search, select or reload from prompts.
    Interactive {
        #[command(flatten)]
        position: PositionArgs,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;
        if let Some(locale) = self.locale.as_deref() {
            config.set_locale(Locale::try_from(locale)?);
        }

        tracing::debug!(command = ?self.command, locale = %config.locale()?, "starting");

        match self.command {
            Command::Configure => configure::run(config),
            Command::Show { position } => {
                let app = build_app(&config, &position)?;
                mount(&app).await;
                render::print(&app.screen());
                Ok(())
            }
            Command::Search { city, position } => {
                let app = build_app(&config, &position)?;
                mount(&app).await;
                if let Err(err) = app.search(&city).await {
                    tracing::debug!(%err, "search failed; shown on screen");
                }
                render::print(&app.screen());
                Ok(())
            }
            Command::Interactive { position } => {
                let app = build_app(&config, &position)?;
                interactive::run(&app).await
            }
        }
    }
}

fn build_app(config: &Config, position: &PositionArgs) -> anyhow::Result<WeatherApp> {
    glance_core::app_from_config(config, position.coordinates())
        .context("Failed to set up the weather screen")
}

/// Initial mount. A denied location leaves the screen loading; say why.
pub async fn mount(app: &WeatherApp) {
    if let Ok(ChainOutcome::Stalled) = app.reload().await {
        eprintln!(
            "Location unavailable: pass --lat/--lon, configure a location, or enable \
             use_ip_location (see `glance configure`)."
        );
    }
}
