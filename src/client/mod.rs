//! HTTP access to the scheduler's dashboard API.
//!
//! The pollers only see [`ResourceSource`] and the retention mutation only
//! sees [`RetentionApi`]; [`ApiClient`] implements both over reqwest.

mod error;

pub use error::FetchError;

use crate::config::ServerConfig;
use crate::model::RemoveJobLogsResult;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Endpoint key of the retention mutation.
pub const REMOVE_JOB_LOGS_KEY: &str = "remove_job_logs";

/// Read access to pollable resources, keyed by endpoint.
#[async_trait]
pub trait ResourceSource: Send + Sync + 'static {
    /// Fetch the raw payload at `/api/{endpoint_key}`.
    ///
    /// `Ok(None)` means the server answered without usable data (empty body or
    /// a falsy JSON value); callers substitute their default.
    async fn fetch(&self, endpoint_key: &str) -> Result<Option<Value>, FetchError>;
}

/// The single write operation exposed by the scheduler.
#[async_trait]
pub trait RetentionApi: Send + Sync + 'static {
    async fn remove_job_logs(&self) -> Result<RemoveJobLogsResult, FetchError>;
}

/// reqwest-backed client for the scheduler API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::Client,
    timeout_seconds: u64,
}

impl ApiClient {
    /// Create a client with its own connection pool and timeout.
    pub fn new(config: &ServerConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self::with_client(&config.base_url, client, config.timeout_seconds))
    }

    /// Create a client around an existing reqwest client (for testing).
    pub fn with_client(base_url: &str, client: reqwest::Client, timeout_seconds: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_seconds,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint_key: &str) -> String {
        format!("{}/api/{}", self.base_url, endpoint_key)
    }
}

#[async_trait]
impl ResourceSource for ApiClient {
    async fn fetch(&self, endpoint_key: &str) -> Result<Option<Value>, FetchError> {
        let response = self
            .client
            .get(self.url(endpoint_key))
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_seconds))?;

        if !response.status().is_success() {
            return Err(FetchError::HttpError(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_seconds))?;
        parse_payload(&body)
    }
}

#[async_trait]
impl RetentionApi for ApiClient {
    async fn remove_job_logs(&self) -> Result<RemoveJobLogsResult, FetchError> {
        let response = self
            .client
            .delete(self.url(REMOVE_JOB_LOGS_KEY))
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_seconds))?;

        // The body of a failed delete is never trusted, whatever it says.
        if !response.status().is_success() {
            return Err(FetchError::HttpError(response.status().as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(e, self.timeout_seconds))?;
        serde_json::from_str(&body).map_err(|e| FetchError::ParseError(e.to_string()))
    }
}

/// Parse a response body, collapsing "no data" to `None`.
///
/// An empty body and the JSON values `null`, `false`, `0` and `""` all mean
/// the server had nothing to report. Empty arrays and objects are data.
pub fn parse_payload(body: &str) -> Result<Option<Value>, FetchError> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::ParseError(e.to_string()))?;
    Ok(if is_falsy(&value) { None } else { Some(value) })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
