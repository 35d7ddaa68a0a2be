//! ApiClient against a mock scheduler.

use gpumon::client::{ApiClient, FetchError, ResourceSource, RetentionApi};
use gpumon::config::ServerConfig;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&ServerConfig {
        base_url: server.uri(),
        timeout_seconds: 1,
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_returns_json_payload() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/gpu-status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "available"})))
        .expect(1)
        .mount(&server)
        .await;

    let payload = client_for(&server).fetch("gpu-status").await.unwrap();
    assert_eq!(payload, Some(json!({"status": "available"})));
}

#[tokio::test]
async fn test_fetch_null_body_is_no_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/current-job"))
        .respond_with(ResponseTemplate::new(200).set_body_string("null"))
        .mount(&server)
        .await;

    assert_eq!(client_for(&server).fetch("current-job").await.unwrap(), None);
}

#[tokio::test]
async fn test_fetch_empty_list_is_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert_eq!(client_for(&server).fetch("jobs").await.unwrap(), Some(json!([])));
}

#[tokio::test]
async fn test_fetch_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/jobs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch("jobs").await.unwrap_err();
    assert_eq!(err, FetchError::HttpError(500));
}

#[tokio::test]
async fn test_fetch_garbage_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/job-runner-log"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch("job-runner-log").await.unwrap_err();
    assert!(matches!(err, FetchError::ParseError(_)));
}

#[tokio::test]
async fn test_fetch_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/gpu-status"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let err = client_for(&server).fetch("gpu-status").await.unwrap_err();
    assert_eq!(err, FetchError::Timeout(1));
}

#[tokio::test]
async fn test_connection_refused() {
    let client = ApiClient::new(&ServerConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        timeout_seconds: 1,
    })
    .unwrap();

    let err = client.fetch("jobs").await.unwrap_err();
    assert!(matches!(err, FetchError::ConnectionFailed(_)));
}

#[tokio::test]
async fn test_remove_job_logs_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/remove_job_logs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Removed 3 old log files", "removed_count": 3})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).remove_job_logs().await.unwrap();
    assert_eq!(result.message, "Removed 3 old log files");
    assert_eq!(result.removed_count, 3);
}

#[tokio::test]
async fn test_remove_job_logs_error_status_ignores_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/remove_job_logs"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"message": "Removed 3 old log files"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server).remove_job_logs().await.unwrap_err();
    assert_eq!(err, FetchError::HttpError(500));
}
