use anyhow::Context;
use forecast_core::{BackendConfig, Config, SourceId};
use inquire::{Confirm, Password, Select, Text};

/// Prompt for every setting, starting from the current values, and save.
pub fn run(mut config: Config) -> anyhow::Result<()> {
    let current = config.backend.clone().unwrap_or_else(|| BackendConfig::new(""));

    let base_url = Text::new("Backend base URL:")
        .with_default(&current.base_url)
        .with_help_message("e.g. https://my-functions.azurewebsites.net/api")
        .prompt()?;

    let route_prefix = Text::new("Route prefix:")
        .with_default(&current.route_prefix)
        .with_help_message("leave empty for /weather and /save, or /weather for /weather/weather")
        .prompt()?;

    if base_url.trim().is_empty() {
        config.backend = None;
    } else {
        config.backend = Some(BackendConfig {
            base_url: base_url.trim().to_string(),
            route_prefix: route_prefix.trim().to_string(),
            timeout_secs: current.timeout_secs,
        });
    }

    let sources: Vec<&str> = SourceId::all().iter().map(SourceId::as_str).collect();
    let cursor = config
        .default_source_id()
        .ok()
        .and_then(|id| SourceId::all().iter().position(|s| *s == id))
        .unwrap_or(0);
    let chosen = Select::new("Default forecast source:", sources).with_starting_cursor(cursor).prompt()?;
    config.set_default_source(SourceId::try_from(chosen)?);

    let api_key = Password::new("OpenWeather API key (leave empty to keep the current one):")
        .without_confirmation()
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.upsert_provider_api_key(SourceId::OpenWeather, api_key.trim().to_string());
    }

    config.debug = Confirm::new("Enable debug logging?").with_default(config.debug).prompt()?;

    config.save().context("Failed to save configuration")?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}
