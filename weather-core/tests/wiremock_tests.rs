//! Integration tests for the OpenWeather client and the search flow using wiremock
//!
//! These tests run the real HTTP client against a mock server and check both
//! the outgoing queries and what ends up on the display surface.

use weather_core::{
    ClockStyle, Config, DisplayState, Endpoints, LocationQuery, MemorySurface, OpenWeatherProvider,
    Orchestrator, SearchOutcome, Units, ValidationError, WeatherError, WeatherProvider,
    orchestrator::FAILURE_MESSAGE,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{any, method, path, query_param},
};

const CURRENT_PATH: &str = "/data/2.5/weather";
const FORECAST_PATH: &str = "/data/2.5/forecast";

fn sample_current() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": -74.0, "lat": 40.7 },
        "weather": [
            { "id": 803, "main": "Clouds", "description": "broken clouds", "icon": "04d" }
        ],
        "main": {
            "temp": 41.36,
            "feels_like": 35.2,
            "temp_min": 38.1,
            "temp_max": 44.5,
            "pressure": 1016,
            "humidity": 62
        },
        "sys": { "country": "US", "sunrise": 1767700000, "sunset": 1767735000 },
        "name": "New York",
        "cod": 200
    })
}

fn sample_forecast(entries: usize) -> serde_json::Value {
    let list: Vec<_> = (0..entries)
        .map(|i| {
            let day = 6 + (i * 3) / 24;
            let hour = (i * 3) % 24;
            serde_json::json!({
                "dt": 1767700800 + (i as i64) * 10800,
                "main": { "temp": 40.0 + i as f64, "humidity": 60 },
                "weather": [{ "main": "Clear", "description": "clear sky", "icon": "01n" }],
                "dt_txt": format!("2026-01-{day:02} {hour:02}:00:00")
            })
        })
        .collect();

    serde_json::json!({ "cod": "200", "cnt": entries, "list": list })
}

fn test_config(server: &MockServer) -> Config {
    let mut cfg = Config {
        units: Units::Imperial,
        clock: ClockStyle::TwelveHour,
        endpoints: Endpoints::with_base(&server.uri()),
        ..Default::default()
    };
    cfg.set_api_key("TEST_KEY".into());
    cfg
}

fn orchestrator(cfg: &Config) -> Orchestrator<OpenWeatherProvider, MemorySurface> {
    Orchestrator::new(
        OpenWeatherProvider::new(cfg),
        MemorySurface::default(),
        cfg.formatting(),
    )
}

async fn mount_current(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(CURRENT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_forecast(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Weather client
// ============================================================================

#[tokio::test]
async fn place_name_uses_q_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CURRENT_PATH))
        .and(query_param("q", "New York"))
        .and(query_param("appid", "TEST_KEY"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new(&test_config(&server));
    let query = LocationQuery::parse(" New York ").unwrap();

    let current = provider.fetch_current(&query).await.expect("request must succeed");
    assert_eq!(current.name, "New York");
    assert_eq!(current.country.as_deref(), Some("US"));
    assert_eq!(current.humidity, Some(62.0));
}

#[tokio::test]
async fn postal_code_uses_zip_parameter_with_country() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CURRENT_PATH))
        .and(query_param("zip", "10001,us"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_current()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new(&test_config(&server));
    let query = LocationQuery::parse("10001").unwrap();

    assert!(provider.fetch_current(&query).await.is_ok());
}

#[tokio::test]
async fn configured_units_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast(2)))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = Config {
        units: Units::Metric,
        ..test_config(&server)
    };
    let forecast = OpenWeatherProvider::new(&cfg)
        .fetch_forecast(51.5, -0.12)
        .await
        .expect("request must succeed");

    assert_eq!(forecast.len(), 2);
}

#[tokio::test]
async fn non_success_status_is_request_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CURRENT_PATH))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_string(r#"{"cod":401,"message":"Invalid API key."}"#),
        )
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new(&test_config(&server));
    let err = provider
        .fetch_current(&LocationQuery::parse("London").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Request { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(401));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let provider = OpenWeatherProvider::new(&test_config(&server));
    let err = provider.fetch_forecast(1.0, 2.0).await.unwrap_err();

    assert!(matches!(err, WeatherError::Parse { .. }));
}

#[tokio::test]
async fn missing_coordinates_is_parse_error() {
    let server = MockServer::start().await;
    mount_current(&server, serde_json::json!({ "name": "Nowhere", "cod": 200 })).await;

    let provider = OpenWeatherProvider::new(&test_config(&server));
    let err = provider
        .fetch_current(&LocationQuery::parse("Nowhere").unwrap())
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Parse { .. }));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let server = MockServer::start().await;
    let cfg = Config {
        endpoints: Endpoints::with_base("http://127.0.0.1:1"),
        ..test_config(&server)
    };

    let err = OpenWeatherProvider::new(&cfg)
        .fetch_forecast(1.0, 2.0)
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Transport { .. }));
}

// ============================================================================
// Full search flow
// ============================================================================

#[tokio::test]
async fn forecast_uses_coordinates_from_current_response() {
    let server = MockServer::start().await;
    mount_current(&server, sample_current()).await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .and(query_param("lat", "40.7"))
        .and(query_param("lon", "-74"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast(3)))
        .expect(1)
        .mount(&server)
        .await;

    let orch = orchestrator(&test_config(&server));
    assert_eq!(orch.submit("New York").await, SearchOutcome::Shown);
}

#[tokio::test]
async fn long_forecast_renders_first_eight_in_order() {
    let server = MockServer::start().await;
    mount_current(&server, sample_current()).await;
    mount_forecast(&server, sample_forecast(20)).await;

    let orch = orchestrator(&test_config(&server));
    assert_eq!(orch.submit("New York").await, SearchOutcome::Shown);
    assert_eq!(orch.state().await, DisplayState::Shown);

    let surface = orch.into_surface();
    assert_eq!(surface.status, "");
    assert_eq!(surface.forecast.len(), 8);

    let times: Vec<_> = surface.forecast.iter().map(|b| b.time.as_str()).collect();
    assert_eq!(
        times,
        ["12:00 AM", "3:00 AM", "6:00 AM", "9:00 AM", "12:00 PM", "3:00 PM", "6:00 PM", "9:00 PM"]
    );
    assert_eq!(surface.forecast[0].temp, "40°F");
    assert_eq!(surface.forecast[7].temp, "47°F");
    assert_eq!(surface.forecast[0].label, "Clear");
    assert_eq!(
        surface.forecast[0].icon_url,
        Some(format!("{}/img/wn/01n@2x.png", server.uri()))
    );

    let summary = surface.summary.expect("summary must be rendered");
    assert_eq!(summary.place, "New York, US");
    assert_eq!(summary.description, "broken clouds");
    assert_eq!(summary.current, "41°F");
    assert_eq!(summary.high, "45°F");
    assert_eq!(summary.low, "38°F");
    assert_eq!(summary.humidity, "62%");
}

#[tokio::test]
async fn missing_country_renders_name_only() {
    let server = MockServer::start().await;

    let mut body = sample_current();
    body.as_object_mut().unwrap().remove("sys");
    mount_current(&server, body).await;
    mount_forecast(&server, sample_forecast(1)).await;

    let orch = orchestrator(&test_config(&server));
    assert_eq!(orch.submit("New York").await, SearchOutcome::Shown);

    let surface = orch.into_surface();
    assert_eq!(surface.summary.unwrap().place, "New York");
}

#[tokio::test]
async fn odd_optional_fields_still_show_results() {
    let server = MockServer::start().await;

    let mut body = sample_current();
    body["main"]["humidity"] = serde_json::json!(62.5);
    body["weather"] = serde_json::Value::Null;
    mount_current(&server, body).await;
    mount_forecast(&server, sample_forecast(2)).await;

    let orch = orchestrator(&test_config(&server));
    assert_eq!(orch.submit("New York").await, SearchOutcome::Shown);

    let summary = orch.into_surface().summary.expect("summary must be rendered");
    assert_eq!(summary.humidity, "62.5%");
    assert_eq!(summary.description, "—");
    assert_eq!(summary.icon_url, None);
}

#[tokio::test]
async fn current_failure_hides_panel_and_skips_forecast() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CURRENT_PATH))
        .respond_with(ResponseTemplate::new(404).set_body_string(r#"{"cod":"404"}"#))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(FORECAST_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_forecast(8)))
        .expect(0)
        .mount(&server)
        .await;

    let orch = orchestrator(&test_config(&server));
    assert_eq!(orch.submit("Atlantis").await, SearchOutcome::Failed);
    assert_eq!(orch.state().await, DisplayState::Error);

    let surface = orch.into_surface();
    assert!(!surface.panel_visible);
    assert_eq!(surface.status, FAILURE_MESSAGE);
}

#[tokio::test]
async fn blank_input_never_hits_the_network() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let orch = orchestrator(&test_config(&server));
    assert_eq!(
        orch.submit(" \t ").await,
        SearchOutcome::Rejected(ValidationError::EmptyLocation)
    );
    assert_eq!(orch.state().await, DisplayState::Error);
}

#[tokio::test]
async fn placeholder_key_never_hits_the_network() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut cfg = test_config(&server);
    cfg.set_api_key("PASTE_YOUR_API_KEY_HERE".into());

    let orch = orchestrator(&cfg);
    assert_eq!(
        orch.submit("London").await,
        SearchOutcome::Rejected(ValidationError::MissingApiKey)
    );
}
