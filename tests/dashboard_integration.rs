//! Dashboard and retention against a mock scheduler.

use gpumon::client::ApiClient;
use gpumon::config::{PollingConfig, ServerConfig};
use gpumon::dashboard::Dashboard;
use gpumon::model::{CurrentJob, GpuStatus};
use gpumon::resource::ResourceKind;
use gpumon::retention::{NotificationSeverity, RetentionMutation, REMOVE_LOGS_FAILED};
use gpumon::view::{filter_jobs, should_offer_cleanup};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn runner_log(days: usize) -> Value {
    json!({
        "availableDates": (1..=days).map(|d| format!("2024-03-{:02}", d)).collect::<Vec<_>>(),
        "content": (1..=days).map(|d| format!("day {} output", d)).collect::<Vec<_>>(),
        "log_files": (1..=days).map(|d| format!("JR_2024-03-{:02}.log", d)).collect::<Vec<_>>(),
    })
}

async fn mount_get(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/api/{}", endpoint)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn scheduler() -> MockServer {
    let server = MockServer::start().await;
    mount_get(
        &server,
        "gpu-status",
        json!({"status": "in_use", "user": "alice", "pid": 4242, "type": "sql", "job_id": 2}),
    )
    .await;
    mount_get(
        &server,
        "jobs",
        json!([
            {"id": "00001", "status": "pending", "created": "2024-01-01T00:00:00"},
            {"id": "00002", "status": "completed", "created": "2024-01-02T00:00:00"}
        ]),
    )
    .await;
    mount_get(&server, "current-job", json!({"type": "sql", "content": "epoch 1/5", "job_id": 2})).await;
    server
}

fn client_for(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(
        ApiClient::new(&ServerConfig {
            base_url: server.uri(),
            timeout_seconds: 2,
        })
        .unwrap(),
    )
}

/// Long intervals so every second request comes from an invalidation.
fn slow_polling() -> PollingConfig {
    PollingConfig {
        gpu_status_ms: 60_000,
        jobs_ms: 60_000,
        job_runner_log_ms: 60_000,
        current_job_ms: 60_000,
        retry_attempts: 0,
        retry_delay_ms: 10,
    }
}

async fn runner_log_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == "/api/job-runner-log")
        .count()
}

#[tokio::test]
async fn test_dashboard_renders_scheduler_state() {
    let server = scheduler().await;
    mount_get(&server, "job-runner-log", runner_log(3)).await;

    let dashboard = Dashboard::start(client_for(&server), &slow_polling());
    let readiness = tokio::time::timeout(Duration::from_secs(5), dashboard.wait_ready())
        .await
        .unwrap();
    assert!(readiness.ready);
    assert!(readiness.errors.is_empty());

    let snapshot = dashboard.snapshot();
    match &snapshot.gpu_status.data {
        GpuStatus::InUse(info) => {
            assert_eq!(info.user.as_deref(), Some("alice"));
            assert_eq!(info.pid.as_deref(), Some("4242"));
        }
        other => panic!("expected in-use GPU, got {:?}", other),
    }
    assert!(matches!(snapshot.current_job.data, CurrentJob::Sql { .. }));

    let pending = filter_jobs(&snapshot.jobs.data, "pending", "", "");
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, "00001");
    let completed = filter_jobs(&snapshot.jobs.data, "completed", "", "");
    assert_eq!(completed[0].id, "00002");

    dashboard.shutdown().await;
}

#[tokio::test]
async fn test_unreachable_jobs_endpoint_reports_error() {
    let server = MockServer::start().await;
    mount_get(&server, "gpu-status", json!({"status": "available"})).await;
    mount_get(&server, "job-runner-log", Value::Null).await;
    mount_get(&server, "current-job", Value::Null).await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let dashboard = Dashboard::start(client_for(&server), &slow_polling());
    let readiness = tokio::time::timeout(Duration::from_secs(5), dashboard.wait_ready())
        .await
        .unwrap();

    assert!(readiness.ready);
    assert_eq!(readiness.errors.len(), 1);
    assert_eq!(readiness.errors[0].resource, "jobs");
    assert!(dashboard.snapshot().jobs.data.is_empty());
    dashboard.shutdown().await;
}

#[tokio::test]
async fn test_retention_success_refreshes_runner_log() {
    let server = scheduler().await;
    Mock::given(method("GET"))
        .and(path("/api/job-runner-log"))
        .respond_with(ResponseTemplate::new(200).set_body_json(runner_log(9)))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_get(&server, "job-runner-log", runner_log(7)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/remove_job_logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Removed 2 old log files",
            "removed_count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let dashboard = Dashboard::start(client.clone(), &slow_polling());
    tokio::time::timeout(Duration::from_secs(5), dashboard.wait_ready())
        .await
        .unwrap();
    let mut runner_log_handle = dashboard.runner_log().clone();
    let dates = runner_log_handle.snapshot().data.available_dates.len();
    assert_eq!(dates, 9);
    assert!(should_offer_cleanup(dates));

    let mutation = RetentionMutation::new(client, dashboard.invalidator(ResourceKind::JobRunnerLog));
    let notification = mutation.trigger().await;
    assert_eq!(notification.severity, NotificationSeverity::Success);
    assert_eq!(notification.message, "Removed 2 old log files");

    tokio::time::timeout(Duration::from_secs(5), async {
        while runner_log_handle.snapshot().data.available_dates.len() != 7 {
            assert!(runner_log_handle.changed().await);
        }
    })
    .await
    .unwrap();

    assert!(!should_offer_cleanup(7));
    assert_eq!(runner_log_requests(&server).await, 2);
    dashboard.shutdown().await;
}

#[tokio::test]
async fn test_retention_failure_leaves_runner_log_alone() {
    let server = scheduler().await;
    mount_get(&server, "job-runner-log", runner_log(9)).await;
    Mock::given(method("DELETE"))
        .and(path("/api/remove_job_logs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let dashboard = Dashboard::start(client.clone(), &slow_polling());
    tokio::time::timeout(Duration::from_secs(5), dashboard.wait_ready())
        .await
        .unwrap();

    let mutation = RetentionMutation::new(client, dashboard.invalidator(ResourceKind::JobRunnerLog));
    let notification = mutation.trigger().await;
    assert_eq!(notification.severity, NotificationSeverity::Error);
    assert_eq!(notification.message, REMOVE_LOGS_FAILED);
    assert!(!mutation.is_pending());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(runner_log_requests(&server).await, 1);
    assert_eq!(dashboard.snapshot().runner_log.data.available_dates.len(), 9);
    dashboard.shutdown().await;
}
