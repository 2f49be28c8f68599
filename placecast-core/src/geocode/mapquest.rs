use reqwest::Client;
use serde::Deserialize;

use crate::{
    error::{LookupError, truncate_body},
    model::{Coordinates, GeoResult, Quality},
};

use super::{Geocoder, ensure_query};
use async_trait::async_trait;

const DEFAULT_BASE_URL: &str = "https://open.mapquestapi.com";

/// MapQuest geocoding v1. Quality arrives as a categorical code such as
/// "P1AAA"; see [`CodeSuffixPolicy`](super::CodeSuffixPolicy).
#[derive(Debug, Clone)]
pub struct MapQuestGeocoder {
    api_key: String,
    http: Client,
    base_url: String,
}

impl MapQuestGeocoder {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Point the geocoder at an alternate host (tests use a mock server).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self { api_key, http: Client::new(), base_url }
    }
}

#[derive(Debug, Deserialize)]
struct MqLatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct MqLocation {
    #[serde(rename = "latLng")]
    lat_lng: MqLatLng,
    #[serde(rename = "geocodeQualityCode")]
    quality_code: String,
    /// City, per MapQuest's admin-area numbering.
    #[serde(rename = "adminArea5")]
    city: Option<String>,
    /// State.
    #[serde(rename = "adminArea3")]
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MqResult {
    locations: Vec<MqLocation>,
}

#[derive(Debug, Deserialize)]
struct MqResponse {
    results: Vec<MqResult>,
}

#[async_trait]
impl Geocoder for MapQuestGeocoder {
    async fn resolve(&self, query: &str) -> Result<GeoResult, LookupError> {
        let query = ensure_query(query)?;

        let url = format!("{}/geocoding/v1/address", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("location", query)])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(LookupError::provider(format!(
                "MapQuest geocoding request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        let parsed: MqResponse = serde_json::from_str(&body).map_err(|e| {
            LookupError::provider(format!("Failed to parse MapQuest geocoding JSON: {e}"))
        })?;

        let location = parsed
            .results
            .first()
            .and_then(|r| r.locations.first())
            .ok_or(LookupError::NotFound)?;

        let label = match (&location.city, &location.state) {
            (Some(city), Some(state)) if !city.is_empty() && !state.is_empty() => {
                Some(format!("{city}, {state}"))
            }
            (Some(city), _) if !city.is_empty() => Some(city.clone()),
            _ => None,
        };

        tracing::debug!(
            quality = %location.quality_code,
            "mapquest resolved '{query}'"
        );

        Ok(GeoResult {
            coordinates: Coordinates {
                latitude: location.lat_lng.lat,
                longitude: location.lat_lng.lng,
            },
            quality: Quality::Code(location.quality_code.clone()),
            label,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn candidate_body(lat: f64, lng: f64, quality: &str) -> serde_json::Value {
        serde_json::json!({
            "results": [{
                "locations": [{
                    "latLng": {"lat": lat, "lng": lng},
                    "geocodeQualityCode": quality,
                    "adminArea5": "Seattle",
                    "adminArea3": "WA"
                }]
            }]
        })
    }

    #[tokio::test]
    async fn resolves_first_candidate() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocoding/v1/address"))
            .and(query_param("key", "KEY"))
            .and(query_param("location", "Seattle, WA"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(candidate_body(47.6, -122.3, "A5AAA")),
            )
            .mount(&server)
            .await;

        let geocoder = MapQuestGeocoder::with_base_url("KEY".into(), server.uri());
        let geo = geocoder.resolve("Seattle, WA").await.unwrap();

        assert_eq!(geo.coordinates.latitude, 47.6);
        assert_eq!(geo.coordinates.longitude, -122.3);
        assert_eq!(geo.quality, Quality::Code("A5AAA".into()));
        assert_eq!(geo.label.as_deref(), Some("Seattle, WA"));
    }

    #[tokio::test]
    async fn zero_candidates_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/geocoding/v1/address"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"results": [{"locations": []}]})),
            )
            .mount(&server)
            .await;

        let geocoder = MapQuestGeocoder::with_base_url("KEY".into(), server.uri());
        let err = geocoder.resolve("asdkfjasdf").await.unwrap_err();

        assert_eq!(err, LookupError::NotFound);
    }

    #[tokio::test]
    async fn server_error_is_provider_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let geocoder = MapQuestGeocoder::with_base_url("KEY".into(), server.uri());
        let err = geocoder.resolve("Seattle").await.unwrap_err();

        assert!(matches!(err, LookupError::Provider { .. }));
    }

    #[tokio::test]
    async fn multibyte_error_body_still_yields_provider_error() {
        let server = MockServer::start().await;

        // non-ASCII char straddling the 200-byte truncation cap, as an HTML
        // error page easily produces
        let body = format!("{}é{}", "x".repeat(199), "rest of the error page");
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string(body))
            .mount(&server)
            .await;

        let geocoder = MapQuestGeocoder::with_base_url("KEY".into(), server.uri());
        let err = geocoder.resolve("Seattle").await.unwrap_err();

        match err {
            LookupError::Provider { message } => assert!(message.contains("status 500")),
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_query_never_hits_the_network() {
        // unroutable base url: any request would error differently
        let geocoder =
            MapQuestGeocoder::with_base_url("KEY".into(), "http://127.0.0.1:9".into());

        let err = geocoder.resolve("   ").await.unwrap_err();
        assert_eq!(err, LookupError::EmptyQuery);
    }
}
