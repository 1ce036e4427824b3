//! Source implementations against mock HTTP servers.

use forecast_core::{
    ForecastRequest, ForecastSource, ForecastStore, RequestError, SaveRequest,
    source::{backend::BackendClient, openweather::OpenWeatherSource},
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn request(city: &str) -> ForecastRequest {
    ForecastRequest::new(city).expect("valid city")
}

// ============================================================================
// Backend
// ============================================================================

#[tokio::test]
async fn backend_honors_route_prefix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather/weather"))
        .and(query_param("city", "Be'er Sheva"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "city": "Be'er Sheva",
            "country": "IL",
            "forecast": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = BackendClient::new(&server.uri(), "/weather");
    let forecast = backend.fetch_forecast(&request("Be'er Sheva")).await.expect("fetch succeeds");

    assert_eq!(forecast.country.as_deref(), Some("IL"));
    assert!(forecast.forecast.is_empty());
}

#[tokio::test]
async fn backend_rejects_malformed_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "city": "Haifa" })))
        .mount(&server)
        .await;

    let backend = BackendClient::new(&server.uri(), "");
    let err = backend.fetch_forecast(&request("Haifa")).await.unwrap_err();

    assert!(matches!(err, RequestError::Decode(_)));
}

#[tokio::test]
async fn backend_save_accepts_non_json_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/save"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&server)
        .await;

    let backend = BackendClient::new(&server.uri(), "");
    let save = SaveRequest::new("dana", "Haifa").expect("valid input");
    let receipt = backend.save_forecast(&save).await.expect("2xx is a success");

    assert_eq!(receipt.id(), None);
}

// ============================================================================
// OpenWeather
// ============================================================================

fn openweather_body() -> serde_json::Value {
    json!({
        "cod": "200",
        "city": { "name": "Tel Aviv", "country": "IL" },
        "list": [
            {
                "dt": 1_704_067_200,
                "dt_txt": "2024-01-01 00:00:00",
                "main": { "temp": 14.6, "feels_like": 13.9, "humidity": 71 },
                "weather": [{ "description": "clear sky" }]
            },
            {
                "dt": 1_704_078_000,
                "dt_txt": "2024-01-01 03:00:00",
                "main": { "temp": 13.1, "feels_like": 12.2, "humidity": 75 },
                "weather": [{ "description": "few clouds" }]
            },
            {
                "dt": 1_704_153_600,
                "dt_txt": "2024-01-02 00:00:00",
                "main": { "temp": 16.0, "feels_like": 15.5, "humidity": 60 },
                "weather": [{ "description": "light rain" }]
            }
        ]
    })
}

#[tokio::test]
async fn openweather_condenses_to_daily_entries() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("q", "Tel Aviv"))
        .and(query_param("appid", "KEY"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openweather_body()))
        .expect(1)
        .mount(&server)
        .await;

    let source = OpenWeatherSource::with_base_url("KEY".into(), &server.uri());
    let forecast = source.fetch_forecast(&request("Tel Aviv")).await.expect("fetch succeeds");

    assert_eq!(forecast.city, "Tel Aviv");
    assert_eq!(forecast.country.as_deref(), Some("IL"));
    assert_eq!(forecast.forecast.len(), 2);
    assert_eq!(forecast.forecast[0].date, "2024-01-01");
    assert_eq!(forecast.forecast[0].description.as_deref(), Some("clear sky"));
    assert_eq!(forecast.forecast[1].date, "2024-01-02");
    assert_eq!(forecast.forecast[1].humidity, 60.0);
}

#[tokio::test]
async fn openweather_error_uses_message_field() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "cod": "404", "message": "city not found" })),
        )
        .mount(&server)
        .await;

    let source = OpenWeatherSource::with_base_url("KEY".into(), &server.uri());
    let err = source.fetch_forecast(&request("Atlantis")).await.unwrap_err();

    assert_eq!(err.to_string(), "city not found");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn openweather_unauthorized_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let source = OpenWeatherSource::with_base_url("BAD".into(), &server.uri());
    let err = source.fetch_forecast(&request("Haifa")).await.unwrap_err();

    assert_eq!(err.to_string(), "Request failed with 401");
}
