//! CLI Integration Tests
//!
//! End-to-end tests for CLI commands using assert_cmd, with wiremock
//! standing in for the scheduler.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get the gpumon binary with a clean environment and no config file
fn gpumon_cmd(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gpumon").unwrap();
    cmd.env_remove("GPUMON_URL")
        .env_remove("GPUMON_LOG_LEVEL")
        .env_remove("GPUMON_LOG_FORMAT")
        .env_remove("RUST_LOG")
        .env("GPUMON_STATE_PATH", dir.path().join("state.json"))
        .env("NO_COLOR", "1")
        .arg("-c")
        .arg(dir.path().join("gpumon.toml"));
    cmd
}

async fn mount_get(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{}", endpoint)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn runner_log(days: usize) -> Value {
    json!({
        "availableDates": (1..=days).map(|d| format!("2024-03-{:02}", d)).collect::<Vec<_>>(),
        "content": (1..=days).map(|d| format!("day {} output", d)).collect::<Vec<_>>(),
        "log_files": (1..=days).map(|d| format!("JR_2024-03-{:02}.log", d)).collect::<Vec<_>>(),
    })
}

#[test]
fn test_version_output() {
    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gpumon"));
}

#[test]
fn test_help_shows_all_commands() {
    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("jobs"))
        .stdout(predicate::str::contains("gpu"))
        .stdout(predicate::str::contains("logs"))
        .stdout(predicate::str::contains("clean-logs"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_jobs_help() {
    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .args(["jobs", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--status"))
        .stdout(predicate::str::contains("--start"))
        .stdout(predicate::str::contains("--end"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_config_init_creates_file() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("new.toml");

    gpumon_cmd(&dir)
        .args(["config", "init", "-o"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file created"));

    let content = std::fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("[server]"));
    assert!(content.contains("[polling]"));
}

#[test]
fn test_config_init_refuses_overwrite() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("existing.toml");
    std::fs::write(&config_path, "existing").unwrap();

    gpumon_cmd(&dir)
        .args(["config", "init", "-o"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    assert_eq!(std::fs::read_to_string(&config_path).unwrap(), "existing");
}

#[test]
fn test_invalid_url_fails() {
    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .args(["--url", "gpu-box:8000", "gpu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("server.base_url"));
}

#[test]
fn test_completions_bash() {
    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gpumon"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_jobs_json_filters_by_status() {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "jobs",
        json!([
            {"id": "00001", "status": "pending", "created": "2024-01-01T00:00:00"},
            {"id": "00002", "status": "failed", "created": "2024-01-02T00:00:00"}
        ]),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let output = gpumon_cmd(&dir)
        .args(["--url", &server.uri(), "jobs", "--status", "failed", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["jobs"].as_array().unwrap().len(), 1);
    assert_eq!(parsed["jobs"][0]["id"], "00002");
    assert_eq!(parsed["statuses"], json!(["pending", "failed"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_gpu_shows_current_job() {
    let server = MockServer::start().await;
    mount_get(&server, "gpu-status", json!({"status": "in_use", "user": "bob"})).await;
    mount_get(&server, "current-job", json!({"type": "cli"})).await;

    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .args(["--url", &server.uri(), "gpu"])
        .assert()
        .success()
        .stdout(predicate::str::contains("In Use"))
        .stdout(predicate::str::contains("bob"))
        .stdout(predicate::str::contains("Cannot display output"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logs_index_is_remembered() {
    let server = MockServer::start().await;
    mount_get(&server, "job-runner-log", runner_log(3)).await;
    let dir = TempDir::new().unwrap();

    gpumon_cmd(&dir)
        .args(["--url", &server.uri(), "logs", "--index", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("day 2 output"));

    let state = std::fs::read_to_string(dir.path().join("state.json")).unwrap();
    let state: Value = serde_json::from_str(&state).unwrap();
    assert_eq!(state["selectedLogIndex"], "1");

    gpumon_cmd(&dir)
        .args(["--url", &server.uri(), "logs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("day 2 output"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clean_logs_within_retention_does_nothing() {
    let server = MockServer::start().await;
    mount_get(&server, "job-runner-log", runner_log(7)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/remove_job_logs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .args(["--url", &server.uri(), "clean-logs", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--force"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clean_logs_reports_server_message() {
    let server = MockServer::start().await;
    mount_get(&server, "job-runner-log", runner_log(8)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/remove_job_logs"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"message": "Removed 1 old log file"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .args(["--url", &server.uri(), "clean-logs", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 old log file"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clean_logs_failure_uses_fixed_message() {
    let server = MockServer::start().await;
    mount_get(&server, "job-runner-log", runner_log(8)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/remove_job_logs"))
        .respond_with(ResponseTemplate::new(500).set_body_string("disk on fire"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .args(["--url", &server.uri(), "clean-logs", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to remove old logs"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_clean_logs_declined_at_prompt() {
    let server = MockServer::start().await;
    mount_get(&server, "job-runner-log", runner_log(8)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/remove_job_logs"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .args(["--url", &server.uri(), "clean-logs"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Remove logs older than 7 days? [y/N]"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_config_is_logged_at_debug() {
    let server = MockServer::start().await;
    mount_get(&server, "gpu-status", json!({"status": "available"})).await;
    mount_get(&server, "current-job", Value::Null).await;

    let dir = TempDir::new().unwrap();
    gpumon_cmd(&dir)
        .env("GPUMON_LOG_FORMAT", "json")
        .args(["--url", &server.uri(), "-l", "debug", "gpu"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Config file not found, using defaults"));
}
