use crate::{
    Config,
    error::LookupError,
    forecast::darksky::DarkSkyForecaster,
    model::{Coordinates, ForecastBundle},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod darksky;

/// Fetch a normalized forecast bundle for already-resolved coordinates.
///
/// Only invoked after a reliable geocoding result exists; the pipeline
/// enforces that sequencing. One GET per call, no retry, no caching.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch(&self, coords: Coordinates) -> Result<ForecastBundle, LookupError>;
}

/// Construct the forecast provider from config.
///
/// Fails fast with [`LookupError::ConfigMissing`] when no API key is
/// configured.
pub fn forecaster_from_config(config: &Config) -> Result<Box<dyn ForecastProvider>, LookupError> {
    let api_key = config.forecast_api_key().ok_or_else(|| {
        LookupError::config_missing(
            "forecast API key. Hint: run `placecast configure forecast`.".to_string(),
        )
    })?;

    Ok(Box::new(DarkSkyForecaster::new(api_key.to_owned())))
}
