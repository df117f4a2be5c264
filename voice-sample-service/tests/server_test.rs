mod common;

use common::{test_config, ADMIN_SECRET, USER_SECRET};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use voice_sample_service::startup::Application;

/// Runs the real listener so the peer address is available.
async fn spawn_app() -> String {
    let app = Application::build(test_config())
        .await
        .expect("Failed to build application");
    let address = format!("http://127.0.0.1:{}", app.port());

    tokio::spawn(app.run_until_stopped());

    address
}

#[tokio::test]
async fn peer_address_is_recorded_as_ip() {
    let address = spawn_app().await;
    let client = Client::new();

    let saved: Value = client
        .post(format!("{}/voice-sample/save", address))
        .header("x-api-secret", USER_SECRET)
        .json(&json!({ "audio": [[1, 2], [3, 4]] }))
        .send()
        .await
        .expect("Failed to execute request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(saved["status"], true);

    let listed = client
        .get(format!("{}/voice-samples", address))
        .header("x-api-secret", ADMIN_SECRET)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(listed.status(), StatusCode::OK);

    let body: Value = listed.json().await.expect("Failed to parse JSON");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["id"], saved["id"]);
    assert_eq!(results[0]["ip"], "127.0.0.1");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let address = spawn_app().await;

    let response = Client::new()
        .get(format!("{}/does-not-exist", address))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
