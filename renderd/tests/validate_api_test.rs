//! Validation API integration tests
//!
//! A validator that rejects its input exits non-zero; that is an expected,
//! recoverable outcome reported as a client error, never a server error.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use renderd::api;
use renderd::config::Config;
use renderd::state::AppState;

fn fake_engine(script: &str) -> Vec<String> {
    vec![
        "sh".to_string(),
        "-c".to_string(),
        script.to_string(),
        "engine".to_string(),
    ]
}

fn test_app(temp: &tempfile::TempDir, validator_script: &str) -> axum::Router {
    let config = Config {
        port: 0,
        staging_dir: temp.path().join("staging"),
        outputs_dir: temp.path().join("output"),
        image_url: "/outputs/main.png".to_string(),
        engine_command: fake_engine("true"),
        validator_command: fake_engine(validator_script),
        validator_workdir: None,
    };
    api::router().with_state(Arc::new(AppState { config }))
}

async fn post_json(app: &axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(req).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();
    let value: Value = serde_json::from_slice(&bytes).expect("Invalid JSON response");
    (status, value)
}

#[tokio::test]
async fn valid_network_report_is_scraped() {
    let temp = tempfile::tempdir().unwrap();
    let app = test_app(
        &temp,
        "printf '✅ JSON is valid!\\nLayers: 4\\nName: MyNet\\n'",
    );

    let (status, body) = post_json(&app, "/generate/validate", json!({"layers": []})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert_eq!(body["layer_count"], 4);
    assert_eq!(body["network_name"], "MyNet");
    assert_eq!(body["validation_backend"], true);
    assert!(body["details"].as_str().unwrap().contains("JSON is valid"));
}

#[tokio::test]
async fn missing_confirmation_marker_means_invalid_even_on_success_exit() {
    let temp = tempfile::tempdir().unwrap();
    let app = test_app(&temp, "printf 'Layers: 4\\nName: MyNet\\n'");

    let (status, body) = post_json(&app, "/generate/validate", json!({"layers": []})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], false);
}

#[tokio::test]
async fn confirmation_without_detail_lines_is_still_valid() {
    let temp = tempfile::tempdir().unwrap();
    let app = test_app(&temp, "echo '✅ JSON is valid!'");

    let (status, body) = post_json(&app, "/generate/validate", json!({"layers": []})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert!(body["layer_count"].is_null());
    assert!(body["network_name"].is_null());
}

#[tokio::test]
async fn rejected_input_is_a_client_error_with_the_engine_reason() {
    let temp = tempfile::tempdir().unwrap();
    let app = test_app(
        &temp,
        "echo '❌ JSON validation failed: missing field `layers`' >&2; exit 1",
    );

    let (status, body) = post_json(&app, "/generate/validate", json!({"nope": true})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["valid"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("missing field `layers`"));
}

#[tokio::test]
async fn silent_failure_falls_back_to_stdout_for_the_reason() {
    let temp = tempfile::tempdir().unwrap();
    let app = test_app(&temp, "echo 'rejected on stdout'; exit 1");

    let (status, body) = post_json(&app, "/generate/validate", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("rejected on stdout"));
}

#[tokio::test]
async fn missing_validator_binary_is_a_client_error() {
    let temp = tempfile::tempdir().unwrap();
    let config = Config {
        port: 0,
        staging_dir: temp.path().join("staging"),
        outputs_dir: temp.path().join("output"),
        image_url: "/outputs/main.png".to_string(),
        engine_command: fake_engine("true"),
        validator_command: vec!["/nonexistent/neuron-cli".to_string()],
        validator_workdir: None,
    };
    let app = api::router().with_state(Arc::new(AppState { config }));

    let (status, body) = post_json(&app, "/generate/validate", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["valid"], false);
    assert!(body["error"].as_str().unwrap().contains("/nonexistent/neuron-cli"));
}

#[tokio::test]
async fn validator_runs_in_its_configured_workdir() {
    let temp = tempfile::tempdir().unwrap();
    let workdir = temp.path().join("validator-home");
    std::fs::create_dir_all(&workdir).unwrap();
    let config = Config {
        port: 0,
        staging_dir: temp.path().join("staging"),
        outputs_dir: temp.path().join("output"),
        image_url: "/outputs/main.png".to_string(),
        engine_command: fake_engine("true"),
        validator_command: fake_engine("pwd > cwd.txt; echo '✅ JSON is valid!'"),
        validator_workdir: Some(workdir.clone()),
    };
    let app = api::router().with_state(Arc::new(AppState { config }));

    let (status, body) = post_json(&app, "/generate/validate", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    let reported = std::fs::read_to_string(workdir.join("cwd.txt")).unwrap();
    assert_eq!(
        std::path::PathBuf::from(reported.trim()).canonicalize().unwrap(),
        workdir.canonicalize().unwrap()
    );
}
