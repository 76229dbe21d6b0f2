//! Document Intelligence client.
//!
//! Analysis is a long-running operation:
//!
//! ```text
//! POST {endpoint}/documentintelligence/documentModels/{model}:analyze?api-version=…
//!   ──▶ 202 Accepted, Operation-Location: <status url>
//! GET  <status url>   (repeat while status ∈ {notStarted, running})
//!   ──▶ 200 {"status": "succeeded", "analyzeResult": {…}}
//! ```
//!
//! Polling honours the service's `Retry-After` header and otherwise waits the
//! configured interval. There is no overall deadline; the caller awaits until
//! the operation reaches a terminal state.

use crate::config::{ConversionConfig, OcrModel, Settings};
use crate::error::DocIntelError;
use crate::output::AnalyzeResult;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE, RETRY_AFTER};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
const OPERATION_LOCATION: &str = "operation-location";
const SERVICE_NAME: &str = "azure-document-intelligence";

/// Request body handed to the OCR service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Raw document bytes, sent as `application/octet-stream`.
    Bytes(Vec<u8>),
    /// A URL the service downloads itself.
    Url(String),
}

/// Anything that can turn a document into an [`AnalyzeResult`].
///
/// The production implementation is [`AzureDocumentIntelligence`].
#[async_trait]
pub trait OcrClient: Send + Sync {
    /// Submit the document and wait for the analysis to finish.
    async fn analyze(
        &self,
        model: OcrModel,
        source: DocumentSource,
    ) -> Result<AnalyzeResult, DocIntelError>;
}

/// REST client for Azure AI Document Intelligence.
pub struct AzureDocumentIntelligence {
    http: reqwest::Client,
    endpoint: String,
    key: String,
    api_version: String,
    poll_interval: Duration,
}

impl std::fmt::Debug for AzureDocumentIntelligence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDocumentIntelligence")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

impl AzureDocumentIntelligence {
    /// Create a client for `endpoint` authenticated with `key`.
    pub fn new(
        endpoint: impl Into<String>,
        key: impl Into<String>,
        config: &ConversionConfig,
    ) -> Result<Self, DocIntelError> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| DocIntelError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            key: key.into(),
            api_version: config.api_version.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    /// Create a client from environment settings.
    ///
    /// Missing values are passed through as empty strings; the service (or
    /// the URL parser) rejects them on first use.
    pub fn from_settings(
        settings: &Settings,
        config: &ConversionConfig,
    ) -> Result<Self, DocIntelError> {
        if settings.endpoint.is_none() || settings.key.is_none() {
            warn!("Document Intelligence endpoint or key is not set");
        }
        Self::new(
            settings.endpoint.clone().unwrap_or_default(),
            settings.key.clone().unwrap_or_default(),
            config,
        )
    }

    /// The URL analysis requests are POSTed to.
    pub fn analyze_url(&self, model: OcrModel) -> String {
        format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}",
            self.endpoint,
            model.model_id(),
            self.api_version
        )
    }

    /// Submit the document and return the `Operation-Location` to poll.
    async fn submit(
        &self,
        model: OcrModel,
        source: DocumentSource,
    ) -> Result<String, DocIntelError> {
        let url = self.analyze_url(model);
        debug!("POST {}", url);

        let request = self.http.post(&url).header(KEY_HEADER, &self.key);
        let request = match source {
            DocumentSource::Bytes(bytes) => request
                .header(CONTENT_TYPE, "application/octet-stream")
                .body(bytes),
            DocumentSource::Url(url_source) => request.json(&AnalyzeDocumentRequest { url_source }),
        };

        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(error_from_status(status, &body));
        }

        operation_location(response.headers()).ok_or_else(|| {
            DocIntelError::service(format!(
                "HTTP {status} without an Operation-Location header"
            ))
        })
    }

    /// Poll the operation until it reaches a terminal state.
    async fn wait(&self, operation_url: &str) -> Result<AnalyzeResult, DocIntelError> {
        let mut polls: u32 = 0;
        loop {
            polls += 1;
            let response = self
                .http
                .get(operation_url)
                .header(KEY_HEADER, &self.key)
                .send()
                .await
                .map_err(transport_error)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(error_from_status(status, &body));
            }

            let delay = retry_after(response.headers()).unwrap_or(self.poll_interval);
            let operation: AnalyzeOperation = response
                .json()
                .await
                .map_err(|e| DocIntelError::service(format!("Malformed status response: {e}")))?;

            match operation.status {
                OperationStatus::Succeeded => {
                    debug!("Operation succeeded after {} polls", polls);
                    return operation.analyze_result.ok_or_else(|| {
                        DocIntelError::service("Operation succeeded without an analyzeResult")
                    });
                }
                OperationStatus::Failed | OperationStatus::Canceled | OperationStatus::Skipped => {
                    return Err(operation_failure(operation.status, operation.error));
                }
                OperationStatus::NotStarted
                | OperationStatus::Running
                | OperationStatus::Unknown => {
                    debug!(
                        "Operation {:?}; polling again in {}ms",
                        operation.status,
                        delay.as_millis()
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl OcrClient for AzureDocumentIntelligence {
    async fn analyze(
        &self,
        model: OcrModel,
        source: DocumentSource,
    ) -> Result<AnalyzeResult, DocIntelError> {
        info!("Analyzing document using model '{}'...", model.model_id());
        let operation_url = self.submit(model, source).await?;
        self.wait(&operation_url).await
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeDocumentRequest {
    url_source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
enum OperationStatus {
    NotStarted,
    Running,
    Succeeded,
    Failed,
    Canceled,
    Skipped,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: OperationStatus,
    #[serde(default)]
    analyze_result: Option<AnalyzeResult>,
    #[serde(default)]
    error: Option<ServiceErrorBody>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: String,
    #[serde(default)]
    innererror: Option<Box<ServiceErrorBody>>,
}

impl ServiceErrorBody {
    /// The innermost error carries the most specific message.
    fn into_error(self) -> DocIntelError {
        match self.innererror {
            Some(inner) if !inner.message.is_empty() => inner.into_error(),
            _ => DocIntelError::ServiceError {
                code: self.code,
                message: self.message,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ServiceErrorBody,
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn transport_error(e: reqwest::Error) -> DocIntelError {
    DocIntelError::service(format!("Request failed: {e}"))
}

fn operation_location(headers: &HeaderMap) -> Option<String> {
    headers
        .get(OPERATION_LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

/// Map a non-success HTTP response to an error.
fn error_from_status(status: StatusCode, body: &str) -> DocIntelError {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        let detail = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|env| env.error.message)
            .unwrap_or_else(|_| format!("HTTP {status}"));
        return DocIntelError::AuthError {
            service: SERVICE_NAME.to_string(),
            detail,
        };
    }

    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) => env.error.into_error(),
        Err(_) if body.trim().is_empty() => DocIntelError::service(format!("HTTP {status}")),
        Err(_) => DocIntelError::service(format!("HTTP {status}: {}", body.trim())),
    }
}

fn operation_failure(status: OperationStatus, error: Option<ServiceErrorBody>) -> DocIntelError {
    match error {
        Some(body) => body.into_error(),
        None => DocIntelError::service(format!("Analysis ended with status {status:?}")),
    }
}
