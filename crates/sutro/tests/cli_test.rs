//! Integration tests for the `sutro` CLI binary.
//!
//! Argument parsing, help output, completions, and error exit codes, plus a
//! few end-to-end runs against a wiremock GraphQL endpoint.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `sutro` binary with env isolation.
///
/// Clears all `SUTRO_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn sutro_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("sutro");
    cmd.env("HOME", "/tmp/sutro-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/sutro-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("SUTRO_PROFILE")
        .env_remove("SUTRO_ENDPOINT")
        .env_remove("SUTRO_TOKEN")
        .env_remove("SUTRO_OUTPUT")
        .env_remove("SUTRO_TIMEOUT")
        .env_remove("SUTRO_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn snapshot_body() -> Value {
    json!({
        "data": {
            "me": {
                "id": "user-1",
                "firstName": "Ana",
                "device": {
                    "serialNumber": "SUTRO-0042",
                    "batteryLevel": 87,
                    "temperature": 81.5,
                    "online": true,
                    "lidOpen": false,
                    "coreStatus": true,
                    "shouldTakeReadings": true
                },
                "hub": { "online": true, "ssid": "backyard" },
                "pool": {
                    "type": "pool",
                    "latestReading": {
                        "ph": 7.6,
                        "alkalinity": 95.5,
                        "chlorine": 2.25,
                        "readingTime": "2024-06-01T12:00:00.000Z"
                    },
                    "latestRecommendations": {
                        "recommendations": [
                            { "id": "rec-1", "treatment": "Add baking soda", "completedAt": null }
                        ]
                    }
                }
            }
        }
    })
}

async fn api_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("latestReading"))
        .respond_with(ResponseTemplate::new(200).set_body_json(snapshot_body()))
        .mount(&server)
        .await;
    server
}

fn endpoint(server: &MockServer) -> String {
    format!("{}/graphql", server.uri())
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = sutro_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    sutro_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("water chemistry")
            .and(predicate::str::contains("login"))
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("recommendations")),
    );
}

#[test]
fn test_version_flag() {
    sutro_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sutro"));
}

#[test]
fn test_recommendations_subcommands_exist() {
    sutro_cmd()
        .args(["recommendations", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("complete"))
                .and(predicate::str::contains("uncomplete")),
        );
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    sutro_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    sutro_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_show_no_config() {
    sutro_cmd()
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default_profile"));
}

#[test]
fn test_config_use_unknown_profile() {
    let output = sutro_cmd().args(["config", "use", "nowhere"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("nowhere"));
}

#[test]
fn test_config_init_then_profiles() {
    let home = tempfile::tempdir().unwrap();
    sutro_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("config.toml"));

    sutro_cmd()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .args(["config", "profiles"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No profiles configured"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = sutro_cmd().arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_output_format() {
    let output = sutro_cmd()
        .args(["--output", "invalid", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("possible values"),
        "Expected error about valid output formats:\n{text}"
    );
}

#[test]
fn test_bad_endpoint_is_usage_error() {
    let output = sutro_cmd()
        .args(["--token", "t", "--endpoint", "not a url", "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("endpoint"));
}

// ── Against a mock API ──────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_status_json_lists_entities() {
    let server = api_server().await;
    let output = sutro_cmd()
        .args(["--token", "tok", "--endpoint", &endpoint(&server), "-o", "json", "status"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let states: Value = serde_json::from_slice(&output.stdout).unwrap();
    let battery = states
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["unique_id"] == "SUTRO-0042-battery")
        .unwrap();
    assert_eq!(battery["value"], 87);
    assert_eq!(battery["available"], true);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_readings_plain_prints_timestamp() {
    let server = api_server().await;
    sutro_cmd()
        .args(["--token", "tok", "--endpoint", &endpoint(&server), "-o", "plain", "readings"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-06-01T12:00:00.000Z"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_failure_is_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let output = sutro_cmd()
        .args(["--token", "tok", "--endpoint", &endpoint(&server), "status"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("Could not fetch data"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_complete_unknown_recommendation_is_not_found() {
    let server = api_server().await;
    let output = sutro_cmd()
        .args([
            "--token",
            "tok",
            "--endpoint",
            &endpoint(&server),
            "recommendations",
            "complete",
            "rec-missing",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_prints_account_title() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "login": {
                    "token": "fresh",
                    "user": { "id": "u", "firstName": "Ana", "pool": { "type": "hot tub" } }
                }
            }
        })))
        .mount(&server)
        .await;

    sutro_cmd()
        .env("SUTRO_PASSWORD", "pw")
        .args(["--endpoint", &endpoint(&server), "login", "--email", "ana@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ana's Hot Tub"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_failure_is_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": { "login": null } })))
        .mount(&server)
        .await;

    let output = sutro_cmd()
        .env("SUTRO_PASSWORD", "wrong")
        .args(["--endpoint", &endpoint(&server), "login", "--email", "ana@example.com"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("Login failed, check credentials"));
}
