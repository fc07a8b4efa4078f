//! OpenWeather client behavior against a mock provider.

mod common;

use std::time::Duration;

use common::{API_KEY, city_not_found, client_for, five_day_forecast, paris_current};
use serde_json::json;
use weather_core::{FailureKind, LocationQuery, OpenWeatherClient, WeatherClient};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn paris() -> LocationQuery {
    LocationQuery::ByName("Paris".into())
}

#[tokio::test]
async fn current_sends_city_key_and_metric_units() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", API_KEY))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_current()))
        .expect(1)
        .mount(&server)
        .await;

    let current = client_for(&server).fetch_current(&paris()).await.unwrap();

    assert_eq!(current.location_name, "Paris");
    assert_eq!(current.country_code, "FR");
    assert_eq!(current.observed_temperature_c, 15);
}

#[tokio::test]
async fn coordinates_are_sent_as_lat_lon() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(five_day_forecast()))
        .expect(1)
        .mount(&server)
        .await;

    let query = LocationQuery::ByCoordinates { lat: 48.85, lon: 2.35 };
    let series = client_for(&server).fetch_forecast_series(&query).await.unwrap();

    assert_eq!(series.len(), 40);
}

#[tokio::test]
async fn not_found_is_read_from_body_cod() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(city_not_found()))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_current(&paris()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[tokio::test]
async fn body_cod_wins_over_http_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(city_not_found()))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_current(&paris()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotFound);
}

#[tokio::test]
async fn invalid_key_is_provider_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "cod": 401,
            "message": "Invalid API key. Please see https://openweathermap.org/faq#error401 for more info."
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_forecast_series(&paris()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::ProviderRejected);
}

#[tokio::test]
async fn html_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_current(&paris()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::MalformedResponse);
    assert!(err.to_string().contains("Bad Gateway"));
}

#[tokio::test]
async fn missing_fields_are_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "cod": 200, "name": "Paris" })))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch_current(&paris()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::MalformedResponse);
}

#[tokio::test]
async fn missing_credential_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_current()))
        .expect(0)
        .mount(&server)
        .await;

    let client = OpenWeatherClient::new(None).with_base_url(&server.uri());

    let err = client.fetch_current(&paris()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::MissingCredential);

    let err = client.fetch_forecast_series(&paris()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::MissingCredential);
}

#[tokio::test]
async fn blank_city_name_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "cod": "400",
            "message": "Nothing to geocode"
        })))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    for name in ["", "   "] {
        let query = LocationQuery::ByName(name.into());

        let err = client.fetch_current(&query).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);

        let err = client.fetch_forecast_series(&query).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::InvalidInput);
    }
}

#[tokio::test]
async fn slow_provider_is_network_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(five_day_forecast())
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).with_timeout(Duration::from_millis(100));

    let err = client.fetch_forecast_series(&paris()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NetworkError);
}

#[tokio::test]
async fn unreachable_provider_is_network_error() {
    let client = OpenWeatherClient::new(Some(API_KEY.into())).with_base_url("http://127.0.0.1:1");

    let err = client.fetch_current(&paris()).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NetworkError);
}
