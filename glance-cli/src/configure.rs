use anyhow::Context;
use glance_core::{Config, Coordinates, Locale};
use inquire::{Confirm, CustomType, Password, PasswordDisplayMode, Select};

/// Interactive `glance configure`.
pub fn run(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let current = config.locale()?;
    let start = Locale::all().iter().position(|l| *l == current).unwrap_or(0);
    let locale = Select::new("Display locale:", Locale::all().to_vec())
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read locale")?;
    config.set_locale(locale);

    let fixed = Confirm::new("Use a fixed location?")
        .with_default(config.location.is_some())
        .prompt()
        .context("Failed to read location choice")?;

    if fixed {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a decimal number")
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a decimal number")
            .prompt()
            .context("Failed to read longitude")?;
        config.set_location(Some(Coordinates::new(latitude, longitude)));
    } else {
        config.set_location(None);
        config.use_ip_location = Confirm::new("Estimate location from your IP address?")
            .with_default(config.use_ip_location)
            .prompt()
            .context("Failed to read IP location choice")?;
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
