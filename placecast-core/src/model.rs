use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Geographic point, as returned by a geocoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Provider-specific reliability signal attached to a geocoding match.
///
/// MapQuest hands back a categorical quality code ("P1AAA"), OpenCage a
/// numeric 0-10 confidence. A [`QualityPolicy`](crate::geocode::QualityPolicy)
/// decides what counts as reliable; nothing else inspects the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quality {
    Code(String),
    Confidence(u8),
}

/// First candidate of a geocoding response.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoResult {
    pub coordinates: Coordinates,
    pub quality: Quality,
    /// Display name for the match, when the provider gives one.
    pub label: Option<String>,
}

/// Icon vocabulary of the forecast provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherIcon {
    ClearDay,
    ClearNight,
    Rain,
    Snow,
    Sleet,
    Wind,
    Fog,
    Cloudy,
    PartlyCloudyDay,
    PartlyCloudyNight,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub icon: WeatherIcon,
    pub temperature: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyHighLow {
    pub high: f64,
    pub low: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlySample {
    pub timestamp: DateTime<Utc>,
    pub icon: WeatherIcon,
    pub temperature: f64,
}

/// Normalized forecast for one location: current conditions, today's
/// high/low, and the provider-ordered hourly series (ascending timestamps).
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastBundle {
    pub summary: String,
    pub current: CurrentConditions,
    pub daily: DailyHighLow,
    pub hourly: Vec<HourlySample>,
    /// IANA timezone of the location, when the provider reports one.
    pub timezone: Option<Tz>,
}

/// One cell of the hourly display strip: local hour label, icon, and the
/// temperature rounded for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourCell {
    pub label: String,
    pub icon: WeatherIcon,
    pub temperature: i64,
}

/// Round a temperature to the nearest whole degree for display.
pub fn round_temp(temperature: f64) -> i64 {
    temperature.round() as i64
}

/// Format an hour label like `3PM` in the given timezone.
///
/// The timezone is always an explicit argument; callers pick it from the
/// forecast bundle (or fall back to UTC), never from process-global state.
pub fn format_hour(timestamp: DateTime<Utc>, tz: Tz) -> String {
    timestamp.with_timezone(&tz).format("%-I%p").to_string()
}

/// Sample the hourly series for display: every other entry, at most six
/// samples. A 2-hour cadence over a 12-hour horizon.
pub fn display_hours(hourly: &[HourlySample]) -> Vec<HourlySample> {
    hourly.iter().step_by(2).take(6).cloned().collect()
}

/// Derived hourly strip: sampled, hour-labelled in `tz`, temperatures rounded.
pub fn display_cells(hourly: &[HourlySample], tz: Tz) -> Vec<HourCell> {
    display_hours(hourly)
        .into_iter()
        .map(|sample| HourCell {
            label: format_hour(sample.timestamp, tz),
            icon: sample.icon,
            temperature: round_temp(sample.temperature),
        })
        .collect()
}
