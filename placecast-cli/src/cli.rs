use clap::{Parser, Subcommand};
use placecast_core::{Config, GeocoderId, Pipeline};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "placecast", version, about = "Place-name weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a provider.
    Configure {
        /// Geocoder short name ("mapquest", "opencage") or "forecast".
        provider: String,
    },

    /// Show current and hourly weather for a place name.
    Show {
        /// Place name, e.g. "Seattle, WA".
        place: String,

        /// Geocoder to use; defaults to the configured one.
        #[arg(long)]
        geocoder: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Show { place, geocoder } => show(&place, geocoder.as_deref()).await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let mut config = Config::load()?;

    if provider.eq_ignore_ascii_case("forecast") {
        let key = inquire::Text::new("Forecast API key:").prompt()?;
        config.set_forecast_api_key(key.trim().to_string());
    } else {
        let id = GeocoderId::try_from(provider)?;
        let key = inquire::Text::new(&format!("API key for {id}:")).prompt()?;
        config.upsert_geocoder_api_key(id, key.trim().to_string());
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(place: &str, geocoder: Option<&str>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    config.apply_env();

    let id = match geocoder {
        Some(name) => GeocoderId::try_from(name)?,
        None => config.default_geocoder_id()?,
    };

    // Missing API keys fail here, before any request goes out.
    let pipeline = Pipeline::from_config(id, &config)?;

    pipeline.submit(place).await;

    let state = pipeline.snapshot();
    print!("{}", render::view(&state));
    Ok(())
}
