//! End-to-end lookup scenarios against mock HTTP providers.

use placecast_core::geocode::mapquest::MapQuestGeocoder;
use placecast_core::geocode::quality_policy_for;
use placecast_core::forecast::darksky::DarkSkyForecaster;
use placecast_core::model::{display_cells, round_temp};
use placecast_core::{GeocoderId, Phase, Pipeline, SubmitOutcome, WeatherIcon};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn pipeline_against(server: &MockServer) -> Pipeline {
    Pipeline::new(
        Box::new(MapQuestGeocoder::with_base_url("GEO_KEY".into(), server.uri())),
        quality_policy_for(GeocoderId::MapQuest),
        Box::new(DarkSkyForecaster::with_base_url("WX_KEY".into(), server.uri())),
    )
}

fn seattle_geocode_body(quality: &str) -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "locations": [{
                "latLng": {"lat": 47.6, "lng": -122.3},
                "geocodeQualityCode": quality,
                "adminArea5": "Seattle",
                "adminArea3": "WA"
            }]
        }]
    })
}

fn seattle_forecast_body() -> serde_json::Value {
    let hourly: Vec<serde_json::Value> = (0..24)
        .map(|i| {
            serde_json::json!({
                "time": 1_700_000_400 + i as i64 * 3600,
                "icon": if i % 2 == 0 { "rain" } else { "cloudy" },
                "temperature": 50.0 + i as f64 * 0.5
            })
        })
        .collect();

    serde_json::json!({
        "timezone": "America/Los_Angeles",
        "currently": {"icon": "rain", "temperature": 52.4, "summary": "Light rain"},
        "daily": {"data": [{"temperatureHigh": 55.1, "temperatureLow": 48.9}]},
        "hourly": {"data": hourly}
    })
}

#[tokio::test]
async fn seattle_query_renders_full_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v1/address"))
        .and(query_param("location", "Seattle, WA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seattle_geocode_body("A5AAA")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast/WX_KEY/47.6,-122.3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seattle_forecast_body()))
        .mount(&server)
        .await;

    let pipeline = pipeline_against(&server);
    let outcome = pipeline.submit("Seattle, WA").await;
    assert_eq!(outcome, SubmitOutcome::Done(Phase::ResolvedOk));

    let state = pipeline.snapshot();
    let bundle = state.forecast.expect("bundle must be present");

    assert_eq!(bundle.summary, "Light rain");
    assert_eq!(round_temp(bundle.current.temperature), 52);
    assert_eq!(round_temp(bundle.daily.high), 55);
    assert_eq!(round_temp(bundle.daily.low), 49);

    let tz = bundle.timezone.expect("timezone must parse");
    let cells = display_cells(&bundle.hourly, tz);
    assert_eq!(cells.len(), 6);
    // cells start at the series' first timestamp, then every second entry
    assert_eq!(cells[0].label, "2PM");
    assert!(cells.iter().all(|c| c.icon == WeatherIcon::Rain));
    let temps: Vec<i64> = cells.iter().map(|c| c.temperature).collect();
    assert_eq!(temps, vec![50, 51, 52, 53, 54, 55]);
}

#[tokio::test]
async fn garbage_query_shows_not_found_and_never_fetches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v1/address"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"results": [{"locations": []}]})),
        )
        .mount(&server)
        .await;

    // any forecast request would be a sequencing bug
    Mock::given(method("GET"))
        .and(path("/forecast/WX_KEY/47.6,-122.3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = pipeline_against(&server);
    let outcome = pipeline.submit("asdkfjasdf").await;
    assert_eq!(outcome, SubmitOutcome::Done(Phase::ResolvedError));

    let state = pipeline.snapshot();
    assert_eq!(state.phase, Phase::ResolvedError);
    assert!(state.forecast.is_none());
}

#[tokio::test]
async fn low_quality_match_shows_not_found_and_never_fetches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/geocoding/v1/address"))
        .respond_with(ResponseTemplate::new(200).set_body_json(seattle_geocode_body("A5XXX")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/forecast/WX_KEY/47.6,-122.3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = pipeline_against(&server);
    let outcome = pipeline.submit("somewhere vague").await;
    assert_eq!(outcome, SubmitOutcome::Done(Phase::ResolvedError));
}
