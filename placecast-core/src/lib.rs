//! Core library for the `placecast` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Geocoding providers and their quality policies
//! - The forecast provider
//! - The geocode-then-forecast pipeline and its view state
//!
//! It is used by `placecast-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod model;
pub mod pipeline;

pub use config::{Config, ProviderConfig};
pub use error::LookupError;
pub use forecast::ForecastProvider;
pub use geocode::{Geocoder, GeocoderId, QualityPolicy};
pub use model::{Coordinates, ForecastBundle, GeoResult, Quality, WeatherIcon};
pub use pipeline::{Phase, Pipeline, SubmitOutcome, ViewState};
