use crate::{
    Config,
    error::LookupError,
    geocode::{mapquest::MapQuestGeocoder, opencage::OpenCageGeocoder},
    model::{GeoResult, Quality},
};
use async_trait::async_trait;
use std::{convert::TryFrom, fmt::Debug};

pub mod mapquest;
pub mod opencage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeocoderId {
    MapQuest,
    OpenCage,
}

impl GeocoderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeocoderId::MapQuest => "mapquest",
            GeocoderId::OpenCage => "opencage",
        }
    }

    pub const fn all() -> &'static [GeocoderId] {
        &[GeocoderId::MapQuest, GeocoderId::OpenCage]
    }
}

impl std::fmt::Display for GeocoderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for GeocoderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "mapquest" => Ok(GeocoderId::MapQuest),
            "opencage" => Ok(GeocoderId::OpenCage),
            _ => Err(anyhow::anyhow!(
                "Unknown geocoder '{value}'. Supported geocoders: mapquest, opencage."
            )),
        }
    }
}

/// Resolve a free-text place name to coordinates plus a quality signal.
///
/// Implementations reject empty queries locally and issue exactly one GET;
/// zero candidates map to [`LookupError::NotFound`].
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, query: &str) -> Result<GeoResult, LookupError>;
}

/// Decides whether a geocoding match is trustworthy enough to forecast for.
///
/// One implementation per geocoder, selected together with it at
/// configuration time; callers only ever see `is_reliable`.
pub trait QualityPolicy: Send + Sync + Debug {
    fn is_reliable(&self, quality: &Quality) -> bool;
}

/// MapQuest-style categorical codes: everything after the two-character
/// granularity prefix reading `XXX` marks a low-confidence match.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeSuffixPolicy;

impl QualityPolicy for CodeSuffixPolicy {
    fn is_reliable(&self, quality: &Quality) -> bool {
        match quality {
            Quality::Code(code) => code.get(2..) != Some("XXX"),
            // a numeric confidence from a code-based provider is a bug;
            // treat it as unreliable rather than guessing
            Quality::Confidence(_) => false,
        }
    }
}

/// OpenCage-style numeric confidence: zero means the provider could not
/// judge the match, anything else is accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NonzeroConfidencePolicy;

impl QualityPolicy for NonzeroConfidencePolicy {
    fn is_reliable(&self, quality: &Quality) -> bool {
        match quality {
            Quality::Confidence(confidence) => *confidence != 0,
            Quality::Code(_) => false,
        }
    }
}

/// The quality policy paired with a geocoder.
pub fn quality_policy_for(id: GeocoderId) -> Box<dyn QualityPolicy> {
    match id {
        GeocoderId::MapQuest => Box::new(CodeSuffixPolicy),
        GeocoderId::OpenCage => Box::new(NonzeroConfidencePolicy),
    }
}

/// Construct a geocoder and its quality policy from config.
///
/// Fails fast with [`LookupError::ConfigMissing`] when no API key is
/// configured, before any request could go out.
pub fn geocoder_from_config(
    id: GeocoderId,
    config: &Config,
) -> Result<(Box<dyn Geocoder>, Box<dyn QualityPolicy>), LookupError> {
    let api_key = config.geocoder_api_key(id).ok_or_else(|| {
        LookupError::config_missing(format!(
            "API key for geocoder '{id}'. Hint: run `placecast configure {id}`."
        ))
    })?;

    let boxed: Box<dyn Geocoder> = match id {
        GeocoderId::MapQuest => Box::new(MapQuestGeocoder::new(api_key.to_owned())),
        GeocoderId::OpenCage => Box::new(OpenCageGeocoder::new(api_key.to_owned())),
    };

    Ok((boxed, quality_policy_for(id)))
}

/// Local guard shared by geocoder implementations: whitespace-only input
/// never reaches the network.
pub(crate) fn ensure_query(query: &str) -> Result<&str, LookupError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(LookupError::EmptyQuery);
    }
    Ok(trimmed)
}
