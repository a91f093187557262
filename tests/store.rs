//! Integration tests for `WeatherStore` against a mocked forecast API.

use reqwest::{Client, Url};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use weather_dash::client::{Credentials, ForecastClient};
use weather_dash::state::{Notifier, WeatherStore, FETCH_FAILED_MESSAGE};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_owned());
    }
}

fn store_for(uri: &str) -> (WeatherStore, Arc<RecordingNotifier>) {
    let client = ForecastClient::new(
        Client::new(),
        Url::parse(uri).unwrap(),
        Credentials::new("test-key", Credentials::DEFAULT_HOST),
    )
    .unwrap();
    let notifier = Arc::new(RecordingNotifier::default());
    (WeatherStore::new(client, notifier.clone()), notifier)
}

fn forecast(address: &str, conditions: &[&str]) -> serde_json::Value {
    let values: Vec<serde_json::Value> = conditions
        .iter()
        .enumerate()
        .map(|(i, c)| {
            serde_json::json!({
                "datetimeStr": format!("2026-10-{:02}T00:00:00+05:30", 16 + i),
                "conditions": c,
                "temp": 30.0 - i as f64,
                "humidity": 40.0,
                "wspd": 11.2
            })
        })
        .collect();

    serde_json::json!({
        "columns": {},
        "remainingCost": 0,
        "locations": {
            address: {
                "address": address,
                "tz": "Asia/Kolkata",
                "values": values
            }
        }
    })
}

async fn mount_place(server: &MockServer, place: &str, address: &str, conditions: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", place))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast(address, conditions)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_store_defaults_to_jaipur_without_weather() {
    let server = MockServer::start().await;
    let (store, notifier) = store_for(&server.uri());

    let state = store.snapshot();
    assert_eq!("Jaipur", store.place());
    assert_eq!("Jaipur", state.place);
    assert_eq!("", state.this_location);
    assert!(state.values.is_empty());
    assert!(state.weather().is_none());
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_set_place_success_updates_location_and_series() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", "Jaipur"))
        .and(query_param("aggregateHours", "24"))
        .and(query_param("unitGroup", "metric"))
        .and(header("X-RapidAPI-Key", "test-key"))
        .and(header("X-RapidAPI-Host", Credentials::DEFAULT_HOST))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(forecast("Jaipur, Rajasthan, India", &["Clear", "Partially cloudy", "Rain"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (store, notifier) = store_for(&server.uri());
    store.set_place("Jaipur").await.unwrap();

    let state = store.snapshot();
    assert_eq!("Jaipur, Rajasthan, India", state.this_location);
    assert_eq!(3, state.values.len());
    assert_eq!(Some("Clear"), state.weather().and_then(|w| w.conditions.as_deref()));
    assert_eq!(Some(&state.values[0]), state.weather());
    assert!(notifier.messages().is_empty());
}

#[tokio::test]
async fn test_refresh_fetches_current_place() {
    let server = MockServer::start().await;
    mount_place(&server, "Jaipur", "Jaipur, Rajasthan, India", &["Sunny"]).await;

    let (store, _) = store_for(&server.uri());
    store.refresh().await;

    assert_eq!("Jaipur, Rajasthan, India", store.snapshot().this_location);
}

#[tokio::test]
async fn test_subscribers_see_location_and_series_together() {
    let server = MockServer::start().await;
    mount_place(&server, "Reykjavik", "Reykjavík, Iceland", &["Snow", "Overcast"]).await;

    let (store, _) = store_for(&server.uri());
    let mut rx = store.subscribe();
    store.set_place("Reykjavik").await.unwrap();

    assert!(rx.has_changed().unwrap());
    let state = rx.borrow_and_update().clone();
    assert_eq!("Reykjavik", state.place);
    assert_eq!("Reykjavík, Iceland", state.this_location);
    assert_eq!(2, state.values.len());
}

#[tokio::test]
async fn test_server_error_keeps_previous_weather_and_alerts_once() {
    let server = MockServer::start().await;
    mount_place(&server, "Jaipur", "Jaipur, Rajasthan, India", &["Clear", "Cloudy"]).await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", "Atlantis"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let (store, notifier) = store_for(&server.uri());
    store.set_place("Jaipur").await.unwrap();
    let before = store.snapshot();

    store.set_place("Atlantis").await.unwrap();
    let after = store.snapshot();

    assert_eq!("Atlantis", after.place);
    assert_eq!(before.this_location, after.this_location);
    assert_eq!(before.values, after.values);
    assert_eq!(vec![FETCH_FAILED_MESSAGE.to_owned()], notifier.messages());
}

#[tokio::test]
async fn test_unknown_place_alerts_with_same_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let (store, notifier) = store_for(&server.uri());
    store.set_place("Nowhere").await.unwrap();
    store.set_place("Nowhere Else").await.unwrap();

    assert!(store.snapshot().weather().is_none());
    assert_eq!(
        vec![FETCH_FAILED_MESSAGE.to_owned(), FETCH_FAILED_MESSAGE.to_owned()],
        notifier.messages()
    );
}

#[tokio::test]
async fn test_network_error_keeps_state_and_alerts_once() {
    // Nothing is listening once the listener is dropped.
    let uri = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };

    let (store, notifier) = store_for(&uri);
    store.set_place("Jaipur").await.unwrap();

    let state = store.snapshot();
    assert_eq!("", state.this_location);
    assert!(state.values.is_empty());
    assert_eq!(1, notifier.messages().len());
}

#[tokio::test]
async fn test_same_place_twice_fetches_twice() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", "Lisbon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast("Lisbon, Portugal", &["Clear"])))
        .expect(2)
        .mount(&server)
        .await;

    let (store, _) = store_for(&server.uri());
    store.set_place("Lisbon").await.unwrap();
    store.set_place("Lisbon").await.unwrap();

    assert_eq!(2, server.received_requests().await.unwrap().len());
}

#[tokio::test]
async fn test_overlapping_fetches_last_to_complete_wins() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", "Slowtown"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(forecast("Slowtown", &["Fog"]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    mount_place(&server, "Quickville", "Quickville", &["Sunny"]).await;

    let (store, _) = store_for(&server.uri());
    let slow = store.set_place("Slowtown");
    let quick = store.set_place("Quickville");

    quick.await.unwrap();
    assert_eq!("Quickville", store.snapshot().this_location);

    slow.await.unwrap();
    let state = store.snapshot();
    assert_eq!("Quickville", state.place);
    assert_eq!("Slowtown", state.this_location);
    assert_eq!(Some("Fog"), state.weather().and_then(|w| w.conditions.as_deref()));
}

#[tokio::test]
async fn test_malformed_body_keeps_previous_weather_and_alerts_once() {
    let server = MockServer::start().await;
    mount_place(&server, "Jaipur", "Jaipur, Rajasthan, India", &["Clear"]).await;

    Mock::given(method("GET"))
        .and(path("/forecast"))
        .and(query_param("location", "Garbled"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>upstream error</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let (store, notifier) = store_for(&server.uri());
    store.set_place("Jaipur").await.unwrap();
    let before = store.snapshot();

    store.set_place("Garbled").await.unwrap();
    let after = store.snapshot();

    assert_eq!("Garbled", after.place);
    assert_eq!(before.this_location, after.this_location);
    assert_eq!(before.values, after.values);
    assert_eq!(vec![FETCH_FAILED_MESSAGE.to_owned()], notifier.messages());
}
