//! Integration tests for WeatherApiClient using wiremock.
//!
//! These tests run the client, typeahead, editor and lookup pipeline against
//! a mock backend.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::time::Duration;

use chrono::NaiveDate;
use skycast_services::{
    lookup, ApiError, DateRange, LookupError, LookupInput, RecordEditor, RecordList, RetryConfig,
    TypeaheadResolver, WeatherApiClient, WeatherView,
};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Client with fast retries
fn client(server: &MockServer) -> WeatherApiClient {
    WeatherApiClient::new(&server.uri(), Duration::from_secs(5))
        .unwrap()
        .with_retry_config(RetryConfig::new(2, 1, 5))
}

fn range() -> DateRange {
    DateRange::new(
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap(),
        NaiveDate::from_ymd_opt(2025, 5, 15).unwrap(),
    )
}

fn range_json() -> serde_json::Value {
    serde_json::json!({"start": "2025-05-10", "end": "2025-05-15"})
}

fn weather_body(name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "rec-1",
        "location": name,
        "date_range": range_json(),
        "weather_data": {
            "name": name,
            "main": {"temp": 50.0, "humidity": 81},
            "wind": {"speed": 12.2},
            "weather": [{"id": 300, "main": "Drizzle", "description": "light drizzle", "icon": "09d"}]
        },
        "forecast_data": {
            "city": {"name": name, "timezone": 0},
            "list": [
                {"dt": 1746878400, "main": {"temp": 52.0}, "weather": [{"id": 803, "description": "broken clouds", "icon": "04d"}]},
                {"dt": 1746889200, "main": {"temp": 55.0}, "weather": [{"id": 800, "description": "clear sky", "icon": "01d"}]}
            ]
        },
        "youtube_videos": [],
        "google_map_url": format!("https://www.google.com/maps/search/?api=1&query={}", name)
    })
}

fn record_body(id: &str, location: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "location": location,
        "date_range": range_json(),
        "weather_data": {"name": location, "main": {"temp": 60.0, "humidity": 50}},
        "forecast_data": {},
        "youtube_videos": [],
        "google_map_url": null
    })
}

#[tokio::test]
async fn test_fetch_weather_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .and(body_json(serde_json::json!({
            "location": "Seattle",
            "date_range": range_json()
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Seattle")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = client(&mock_server)
        .fetch_weather("Seattle", range())
        .await
        .unwrap();

    assert_eq!(response.weather_data.name.as_deref(), Some("Seattle"));
    assert_eq!(response.weather_data.temperature_f(), Some(50.0));
    assert_eq!(response.daily_forecast().len(), 1);
    assert!(response.map_url().unwrap().contains("Seattle"));
}

#[tokio::test]
async fn test_fetch_weather_surfaces_detail_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "city not found"})),
        )
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .fetch_weather("Atlantis", range())
        .await
        .unwrap_err();

    match err {
        ApiError::Remote { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "city not found");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_weather_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client(&mock_server)
        .fetch_weather("Seattle", range())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert_eq!(err.user_message(), "Request failed with status 503");
}

#[tokio::test]
async fn test_inverted_range_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Seattle")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let inverted = DateRange::new(range().end, range().start);
    let err = client(&mock_server)
        .fetch_weather("Seattle", inverted)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_search_encodes_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("query", "San José"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"label": "San José, CR", "location": "9.93,-84.08"},
            {"label": "San Jose, CA", "location": "37.34,-121.89"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let candidates = client(&mock_server).search("San José").await.unwrap();

    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0].location, "9.93,-84.08");
}

#[tokio::test]
async fn test_typeahead_short_input_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut resolver = TypeaheadResolver::default();

    assert!(resolver.resolve(&client, "S").await.is_empty());
}

#[tokio::test]
async fn test_typeahead_swallows_search_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({"error": "bad query"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut resolver = TypeaheadResolver::default();

    assert!(resolver.resolve(&client, "Sea").await.is_empty());
    assert!(resolver.candidates().is_empty());
}

#[tokio::test]
async fn test_list_records_retries_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            record_body("a1", "Austin"),
            record_body("b2", "Boston")
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let records = client(&mock_server).list_records().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[1].location, "Boston");
    assert_eq!(records[0].display().temp_f, Some(60));
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/weather"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({"message": "nope"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client(&mock_server).list_records().await.unwrap_err();
    assert_eq!(err.user_message(), "nope");
}

#[tokio::test]
async fn test_update_record_keeps_date_range() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/weather/a1"))
        .and(body_json(serde_json::json!({
            "location": "Round Rock",
            "date_range": range_json()
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(record_body("a1", "Round Rock")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut list = RecordList::new(vec![serde_json::from_value(record_body("a1", "Austin")).unwrap()]);
    let mut editor = RecordEditor::new();

    editor.begin_edit(list.get("a1").unwrap());
    let updated = editor.apply_edit(&client, "Round Rock").await.unwrap();
    assert!(list.replace(updated));

    assert!(!editor.is_editing());
    assert_eq!(list.get("a1").unwrap().location, "Round Rock");
}

#[tokio::test]
async fn test_rejected_update_keeps_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/weather/a1"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Record not found"})),
        )
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let record = serde_json::from_value(record_body("a1", "Austin")).unwrap();
    let mut editor = RecordEditor::new();

    editor.begin_edit(&record);
    assert!(editor.apply_edit(&client, "Round Rock").await.is_err());

    assert!(editor.is_editing());
    assert_eq!(
        editor.last_error(),
        Some("Failed to update record: Record not found")
    );
}

#[tokio::test]
async fn test_delete_record() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/weather/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"message": "Record deleted"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/weather/zz"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "Record not found"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut list = RecordList::new(vec![serde_json::from_value(record_body("a1", "Austin")).unwrap()]);

    let err = list.delete(&client, "zz").await.unwrap_err();
    assert_eq!(err.user_message(), "Record not found");
    assert_eq!(list.len(), 1);

    list.delete(&client, "a1").await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_export_csv_returns_bytes() {
    let mock_server = MockServer::start().await;
    let csv = "id,location,start_date,end_date\na1,Austin,2025-05-10,2025-05-15\n";

    Mock::given(method("GET"))
        .and(path("/export/csv"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/csv")
                .set_body_string(csv),
        )
        .mount(&mock_server)
        .await;

    let bytes = client(&mock_server).export_csv().await.unwrap();
    assert_eq!(bytes, csv.as_bytes());
}

#[tokio::test]
async fn test_export_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/export/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            record_body("a1", "Austin")
        ])))
        .mount(&mock_server)
        .await;

    let records = client(&mock_server).export_json().await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "a1");
}

#[tokio::test]
async fn test_lookup_fills_view() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .and(body_json(serde_json::json!({
            "location": "47.6,-122.3",
            "date_range": range_json()
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Seattle")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut view = WeatherView::new();

    lookup(&client, &mut view, &LookupInput::Typed("47.6, -122.3".into()), range())
        .await
        .unwrap();

    let current = view.current().unwrap();
    assert_eq!(current.temp_f, Some(50));
    assert_eq!(current.temp_c, Some(10));
    assert_eq!(current.wind_mph, Some(12));
    assert_eq!(current.wind_kmh, Some(19));
    assert_eq!(
        current.icon_url.as_deref(),
        Some("https://openweathermap.org/img/wn/09d@2x.png")
    );
    assert_eq!(view.forecast_days().len(), 1);
}

#[tokio::test]
async fn test_lookup_error_clears_view() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .and(body_json(serde_json::json!({
            "location": "Seattle",
            "date_range": range_json()
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Seattle")))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/weather"))
        .and(body_json(serde_json::json!({
            "location": "Atlantis",
            "date_range": range_json()
        })))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(serde_json::json!({"detail": "city not found"})),
        )
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut view = WeatherView::new();

    lookup(&client, &mut view, &LookupInput::Typed("Seattle".into()), range())
        .await
        .unwrap();
    assert!(view.has_data());

    let err = lookup(&client, &mut view, &LookupInput::Selected("Atlantis".into()), range())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Remote(_)));
    assert_eq!(view.error(), Some("city not found"));
    assert!(!view.has_data());
    assert!(view.map_url().is_none());
    assert!(view.forecast().is_empty());
}

#[tokio::test]
async fn test_lookup_bad_coordinates_never_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(weather_body("Seattle")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server);
    let mut view = WeatherView::new();

    let err = lookup(&client, &mut view, &LookupInput::Typed("47.6,".into()), range())
        .await
        .unwrap_err();

    assert!(matches!(err, LookupError::Input(_)));
    assert_eq!(view.error(), Some("Invalid coordinate format. Use 'lat,lon'."));
}
