//! Integration tests for the `refdesk` binary.
//!
//! Parsing, help, completions and error exits run without a backend; the
//! rest talk to a wiremock server through `--base-url` and `--token`.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// The `refdesk` binary with its config isolated from the user's own.
fn refdesk_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("refdesk");
    cmd.env("HOME", "/tmp/refdesk-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/refdesk-cli-test-nonexistent")
        .env_remove("REFDESK_PROFILE")
        .env_remove("REFDESK_BASE_URL")
        .env_remove("REFDESK_TOKEN")
        .env_remove("REFDESK_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = refdesk_cmd();
    cmd.args(["--base-url", &server.uri(), "--token", "tok", "--color", "never"]);
    cmd
}

/// Run a command off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> std::process::Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_usage() {
    let output = refdesk_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_lists_entities() {
    refdesk_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("branches")
            .and(predicate::str::contains("clients"))
            .and(predicate::str::contains("employees"))
            .and(predicate::str::contains("browse")),
    );
}

#[test]
fn test_version_flag() {
    refdesk_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("refdesk"));
}

#[test]
fn test_invalid_subcommand() {
    refdesk_cmd()
        .arg("warehouses")
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_invalid_verification_filter_is_rejected_by_parser() {
    refdesk_cmd()
        .args(["clients", "list", "--verified", "sometimes"])
        .assert()
        .failure()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    refdesk_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    refdesk_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn test_completions_fish() {
    refdesk_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("refdesk"));
}

// ── Configuration errors ────────────────────────────────────────────

#[test]
fn test_no_config_points_at_init() {
    let output = refdesk_cmd().args(["categories", "list"]).output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("No backend configured") || text.contains("config init"),
        "Expected a config hint:\n{text}"
    );
}

#[test]
fn test_unknown_profile_is_reported() {
    let output = refdesk_cmd()
        .args(["--profile", "prod", "categories", "list"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(combined_output(&output).contains("prod"));
}

#[test]
fn test_delete_without_tty_requires_yes() {
    // Confirmation is checked before any request goes out.
    refdesk_cmd()
        .args(["--base-url", "http://127.0.0.1:9", "--token", "tok"])
        .args(["categories", "delete", "3"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--yes"));
}

// ── Against a backend ───────────────────────────────────────────────

#[tokio::test]
async fn test_list_sends_query_and_prints_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .and(header("authorization", "Bearer tok"))
        .and(query_param("page", "2"))
        .and(query_param("sort", "name"))
        .and(query_param("orderby", "desc"))
        .and(query_param("search", "fru"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": [{ "id": 5, "name": "Fruit" }],
            "pagination": { "per_page": 10, "current_page": 2, "last_page": 2, "total": 11 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["-o", "json-compact", "categories", "list"])
        .args(["--page", "2", "--sort", "name", "--desc", "--search", "fru"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), r#"[{"id":5,"name":"Fruit"}]"#);
}

#[tokio::test]
async fn test_list_table_has_footer() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": true,
            "data": [{ "id": 1, "name": "Dairy" }, { "id": 2, "name": "Bakery" }],
            "pagination": { "per_page": 10, "current_page": 1, "last_page": 1, "total": 2 }
        })))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["categories", "list"]);
    let output = run(cmd).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("Dairy") && stdout.contains("Bakery"));
    assert!(stderr.contains("Page 1 of 1"), "{stderr}");
}

#[tokio::test]
async fn test_expired_session_exits_with_auth_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/branches"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthenticated." })),
        )
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["branches", "list"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(3));
    assert!(combined_output(&output).contains("refdesk login"));
}

#[tokio::test]
async fn test_create_field_errors_are_listed_per_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/categories"))
        .and(body_partial_json(json!({ "name": "X" })))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "status": false,
            "errors": [
                { "input": "name", "message": "too short" },
                { "input": "name", "message": "already taken" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["categories", "create", "--name", "X"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("name:"), "{stderr}");
    assert!(stderr.contains("  too short"), "{stderr}");
    assert!(stderr.contains("  already taken"), "{stderr}");
}

#[tokio::test]
async fn test_delete_with_yes_prints_backend_message() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/categories/3"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": true, "message": "Deleted" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["--yes", "categories", "delete", "3"]);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Deleted"));
}

#[tokio::test]
async fn test_get_missing_record_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories/404/edit"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["categories", "get", "404"]);
    let output = run(cmd).await;

    assert_eq!(output.status.code(), Some(4));
    assert!(combined_output(&output).contains("categories list"));
}

#[tokio::test]
async fn test_create_from_file_lets_flags_override() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/branches"))
        .and(body_partial_json(json!({ "name": "North-B", "parent_id": 1, "warehouse": true })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "status": true, "message": "Created" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let form = dir.path().join("branch.json");
    std::fs::write(&form, r#"{ "name": "draft", "parent_id": 1, "warehouse": true }"#).unwrap();

    let mut cmd = against(&server);
    cmd.args(["branches", "create", "--name", "North-B", "-f"])
        .arg(&form);
    let output = run(cmd).await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Created"));
}
