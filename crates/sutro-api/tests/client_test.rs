#![allow(clippy::unwrap_used)]
// Integration tests for `LoginClient` and `SutroClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sutro_api::{LoginClient, Snapshot, SutroClient, Transport};

// ── Helpers ─────────────────────────────────────────────────────────

fn transport() -> Transport {
    Transport::with_client(reqwest::Client::new(), Duration::from_secs(10))
}

fn endpoint(server: &MockServer) -> Url {
    Url::parse(&format!("{}/graphql", server.uri())).unwrap()
}

async fn setup_data() -> (MockServer, SutroClient) {
    let server = MockServer::start().await;
    let client = SutroClient::with_transport(
        transport(),
        endpoint(&server),
        SecretString::from("tok-123".to_owned()),
    );
    (server, client)
}

async fn setup_login() -> (MockServer, LoginClient) {
    let server = MockServer::start().await;
    let client = LoginClient::with_transport(transport(), endpoint(&server));
    (server, client)
}

fn full_snapshot() -> Value {
    json!({
        "me": {
            "id": "user-1",
            "firstName": "Ana",
            "device": {
                "serialNumber": "SUTRO-0042",
                "batteryLevel": 87,
                "temperature": 81.5,
                "online": true,
                "currentFirmwareVersion": "2.4.1",
                "lidOpen": false,
                "coreStatus": true,
                "shouldTakeReadings": true,
                "chlorineCharges": 12,
                "bromineCharges": null,
                "health": "GOOD"
            },
            "hub": {
                "online": true,
                "chargerStatus": "CHARGING",
                "ssid": "backyard"
            },
            "pool": {
                "type": "pool",
                "latestReading": {
                    "ph": 7.6,
                    "alkalinity": 95.5,
                    "chlorine": 2.25,
                    "bromine": null,
                    "readingTime": "2024-06-01T12:00:00.000Z"
                },
                "latestRecommendations": {
                    "recommendations": [
                        {
                            "id": "rec-1",
                            "treatment": "Add 1.5 lbs of baking soda",
                            "explanation": "Alkalinity is below target",
                            "decision": "ADD",
                            "completedAt": null,
                            "expiredAt": "2024-06-08T12:00:00.000Z"
                        }
                    ]
                }
            }
        }
    })
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup_login().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_partial_json(json!({
            "variables": { "email": "ana@example.com", "password": "hunter2" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "login": {
                    "token": "jwt-abc",
                    "user": { "id": "user-1", "firstName": "Ana", "pool": { "type": "HOT TUB" } }
                }
            }
        })))
        .mount(&server)
        .await;

    let password = SecretString::from("hunter2".to_owned());
    let result = client.login("ana@example.com", &password).await.unwrap();

    assert_eq!(result.token.expose_secret(), "jwt-abc");
    assert_eq!(result.first_name, "Ana");
    assert_eq!(result.account_title(), "Ana's Hot Tub");
}

#[tokio::test]
async fn test_login_sends_no_authorization() {
    let (server, client) = setup_login().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "login": null } })))
        .mount(&server)
        .await;

    let password = SecretString::from("pw".to_owned());
    let _ = client.login("ana@example.com", &password).await;

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("authorization"));
}

#[tokio::test]
async fn test_login_null_is_none() {
    let (server, client) = setup_login().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "login": null } })))
        .mount(&server)
        .await;

    let password = SecretString::from("wrong".to_owned());
    assert!(client.login("ana@example.com", &password).await.is_none());
}

#[tokio::test]
async fn test_login_transport_failure_is_none() {
    let (server, client) = setup_login().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let password = SecretString::from("pw".to_owned());
    assert!(client.login("ana@example.com", &password).await.is_none());
}

// ── Fetch ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_fetch_round_trips_snapshot() {
    let (server, client) = setup_data().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": full_snapshot() })))
        .mount(&server)
        .await;

    let snapshot: Snapshot = client.fetch().await.unwrap();

    assert_eq!(snapshot.serial_number(), "SUTRO-0042");
    assert_eq!(snapshot.latest_reading().unwrap().bromine, None);
    assert_eq!(snapshot.recommendations().len(), 1);
    assert_eq!(serde_json::to_value(&snapshot).unwrap(), full_snapshot());
}

#[tokio::test]
async fn test_fetch_round_trips_integral_values_and_omitted_keys() {
    let (server, client) = setup_data().await;
    let data = json!({
        "me": {
            "id": "user-1",
            "device": { "serialNumber": "SUTRO-0042", "batteryLevel": 100, "temperature": 80 },
            "pool": {
                "latestReading": { "ph": 7, "alkalinity": 80, "chlorine": 3 }
            }
        }
    });

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(&server)
        .await;

    let snapshot = client.fetch().await.unwrap();

    assert_eq!(snapshot.latest_reading().unwrap().chlorine(), Some(3.0));
    assert_eq!(serde_json::to_value(&snapshot).unwrap(), data);
}

#[tokio::test]
async fn test_fetch_tolerates_mistyped_scalars() {
    let (server, client) = setup_data().await;
    let mut data = full_snapshot();
    data["me"]["device"]["batteryLevel"] = json!(87.5);
    data["me"]["device"]["chlorineCharges"] = json!(-1);
    data["me"]["device"]["bromineCharges"] = json!("n/a");

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(&server)
        .await;

    let snapshot = client.fetch().await.unwrap();

    assert_eq!(snapshot.serial_number(), "SUTRO-0042");
    assert_eq!(snapshot.device().bromine_charges, None);
    assert_eq!(serde_json::to_value(&snapshot).unwrap(), data);
}

#[tokio::test]
async fn test_fetch_sends_query_without_variables() {
    let (server, client) = setup_data().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": full_snapshot() })))
        .mount(&server)
        .await;

    client.fetch().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert!(body["query"].as_str().unwrap().contains("latestRecommendations"));
    assert!(body.get("variables").is_none());
}

#[tokio::test]
async fn test_fetch_without_data_is_none() {
    let (server, client) = setup_data().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "not authorized" }]
        })))
        .mount(&server)
        .await;

    assert!(client.fetch().await.is_none());
}

#[tokio::test]
async fn test_fetch_wrong_shape_is_none() {
    let (server, client) = setup_data().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "me": 5 } })))
        .mount(&server)
        .await;

    assert!(client.fetch().await.is_none());
}

// ── Recommendation mutations ────────────────────────────────────────

#[tokio::test]
async fn test_complete_sends_timestamp() {
    let (server, client) = setup_data().await;

    Mock::given(method("POST"))
        .and(header("authorization", "Bearer tok-123"))
        .and(body_partial_json(json!({ "variables": { "recommendationId": "rec-1" } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "completeRecommendation": { "id": "rec-1", "completedAt": "2024-06-02T08:00:00.000Z" } }
        })))
        .mount(&server)
        .await;

    let result = client.complete_recommendation("rec-1").await.unwrap();
    assert_eq!(result["completeRecommendation"]["id"], "rec-1");

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    let completed_at = body["variables"]["completedAt"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(completed_at).is_ok());
}

#[tokio::test]
async fn test_uncomplete_sends_null_timestamp() {
    let (server, client) = setup_data().await;

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "variables": { "recommendationId": "rec-1", "completedAt": null }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "completeRecommendation": { "id": "rec-1", "completedAt": null } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    assert!(client.uncomplete_recommendation("rec-1").await.is_some());
}

#[tokio::test]
async fn test_mutations_share_one_document() {
    let (server, client) = setup_data().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
        .mount(&server)
        .await;

    client.complete_recommendation("rec-1").await;
    client.uncomplete_recommendation("rec-1").await;

    let requests = server.received_requests().await.unwrap();
    let first: Value = requests[0].body_json().unwrap();
    let second: Value = requests[1].body_json().unwrap();
    assert_eq!(first["query"], second["query"]);
}

#[tokio::test]
async fn test_mutation_failure_is_none() {
    let (server, client) = setup_data().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(client.complete_recommendation("rec-1").await.is_none());
}
