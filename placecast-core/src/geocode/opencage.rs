use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{LookupError, truncate_body},
    model::{Coordinates, GeoResult, Quality},
};

use super::{Geocoder, ensure_query};
use async_trait::async_trait;

const DEFAULT_BASE_URL: &str = "https://api.opencagedata.com";

/// OpenCage forward geocoding. Quality arrives as an integer 0-10
/// confidence; see [`NonzeroConfidencePolicy`](super::NonzeroConfidencePolicy).
#[derive(Debug, Clone)]
pub struct OpenCageGeocoder {
    api_key: String,
    http: Client,
    base_url: String,
}

impl OpenCageGeocoder {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the geocoder at an alternate host (tests use a mock server).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, http: Client::new(), base_url }
    }
}

#[derive(Debug, Deserialize)]
struct OcGeometry {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct OcResult {
    geometry: OcGeometry,
    confidence: u8,
    formatted: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OcResponse {
    results: Vec<OcResult>,
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    async fn resolve(&self, query: &str) -> Result<GeoResult, LookupError> {
        let query = ensure_query(query)?;

        let url = format!("{}/geocode/v1/json", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", query), ("limit", "1")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::provider(format!(
                "OpenCage geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: OcResponse = serde_json::from_str(&body).map_err(|e| {
            LookupError::provider(format!("Failed to parse OpenCage geocoding JSON: {e}"))
        })?;

        let candidate = parsed.results.first().ok_or(LookupError::NotFound)?;

        tracing::debug!(
            confidence = candidate.confidence,
            "opencage resolved '{query}'"
        );

        Ok(GeoResult {
            coordinates: Coordinates {
                latitude: candidate.geometry.lat,
                longitude: candidate.geometry.lng,
            },
            quality: Quality::Confidence(candidate.confidence),
            label: candidate.formatted.clone(),
        })
    }
}
