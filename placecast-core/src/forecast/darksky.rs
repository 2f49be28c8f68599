use chrono::DateTime;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{LookupError, truncate_body},
    model::{
        Coordinates, CurrentConditions, DailyHighLow, ForecastBundle, HourlySample, WeatherIcon,
    },
};

use super::ForecastProvider;
use async_trait::async_trait;

const DEFAULT_BASE_URL: &str = "https://api.darksky.net";

/// Dark Sky-style forecast API, keyed by `latitude,longitude` path segment.
/// Pirate Weather serves the same schema at a different host.
#[derive(Debug, Clone)]
pub struct DarkSkyForecaster {
    api_key: String,
    http: Client,
    base_url: String,
}

impl DarkSkyForecaster {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the forecaster at an alternate host (tests use a mock server).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, http: Client::new(), base_url }
    }
}

#[derive(Debug, Deserialize)]
struct DsCurrently {
    summary: String,
    #[serde(default)]
    icon: WeatherIcon,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct DsDay {
    #[serde(rename = "temperatureHigh")]
    temperature_high: f64,
    #[serde(rename = "temperatureLow")]
    temperature_low: f64,
}

#[derive(Debug, Deserialize)]
struct DsDaily {
    data: Vec<DsDay>,
}

#[derive(Debug, Deserialize)]
struct DsHour {
    time: i64,
    #[serde(default)]
    icon: WeatherIcon,
    temperature: f64,
}

#[derive(Debug, Deserialize)]
struct DsHourly {
    data: Vec<DsHour>,
}

/// Required sections are `Option` here so their absence surfaces as a
/// provider error with a useful message instead of a serde failure.
#[derive(Debug, Deserialize)]
struct DsResponse {
    timezone: Option<String>,
    currently: Option<DsCurrently>,
    daily: Option<DsDaily>,
    hourly: Option<DsHourly>,
}

#[async_trait]
impl ForecastProvider for DarkSkyForecaster {
    async fn fetch(&self, coords: Coordinates) -> Result<ForecastBundle, LookupError> {
        let url = format!(
            "{}/forecast/{}/{},{}",
            self.base_url, self.api_key, coords.latitude, coords.longitude
        );

        let res = self.http.get(&url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::provider(format!(
                "Forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: DsResponse = serde_json::from_str(&body)
            .map_err(|e| LookupError::provider(format!("Failed to parse forecast JSON: {e}")))?;

        // Schema validation up front: a payload without these sections is an
        // error, never a silently empty view.
        let currently = parsed
            .currently
            .ok_or_else(|| LookupError::provider("forecast payload missing 'currently'"))?;

        let today = parsed
            .daily
            .and_then(|d| d.data.into_iter().next())
            .ok_or_else(|| LookupError::provider("forecast payload missing 'daily.data[0]'"))?;

        let hours = parsed
            .hourly
            .ok_or_else(|| LookupError::provider("forecast payload missing 'hourly'"))?;

        let mut hourly = Vec::with_capacity(hours.data.len());
        for hour in hours.data {
            let timestamp = DateTime::from_timestamp(hour.time, 0).ok_or_else(|| {
                LookupError::provider(format!("hourly entry has invalid timestamp {}", hour.time))
            })?;
            hourly.push(HourlySample {
                timestamp,
                icon: hour.icon,
                temperature: hour.temperature,
            });
        }

        let timezone = parsed.timezone.as_deref().and_then(|name| {
            let tz = name.parse::<Tz>();
            if tz.is_err() {
                tracing::warn!("unrecognized forecast timezone '{name}'");
            }
            tz.ok()
        });

        tracing::debug!(
            hours = hourly.len(),
            summary = %currently.summary,
            "forecast fetched"
        );

        Ok(ForecastBundle {
            summary: currently.summary,
            current: CurrentConditions {
                icon: currently.icon,
                temperature: currently.temperature,
            },
            daily: DailyHighLow { high: today.temperature_high, low: today.temperature_low },
            hourly,
            timezone,
        })
    }
}
