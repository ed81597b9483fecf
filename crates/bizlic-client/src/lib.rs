//! # bizlic-client — Typed Client for the Licensing Service
//!
//! One HTTP client covers the three service endpoints:
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | POST   | `/api/generate-report` | [`ServiceClient::generate_report`] |
//! | POST   | `/api/rag` | [`ServiceClient::ask`] |
//! | GET    | `/` | [`ServiceClient::health`] |
//!
//! ## Error Mapping
//!
//! Every call follows the same path: transport failure →
//! [`ServiceError::Transport`]; non-2xx → [`ServiceError::Server`] with the
//! body's `error` field as message when present; unparsable 2xx body →
//! [`ServiceError::MalformedResponse`] carrying the raw text.
//!
//! There is no retry layer. A failed call is surfaced once and the caller
//! decides whether to re-invoke.
//!
//! ## Seams
//!
//! The report and question pipelines depend on the [`ReportSource`] and
//! [`QuestionSource`] traits, not on this client, so they can run against
//! in-process fakes.

pub mod answer;
pub mod config;
pub mod error;
pub mod source;

pub use answer::{Answer, AnswerSource, ServiceHealth};
pub use config::{ConfigError, ServiceConfig};
pub use error::ServiceError;
pub use source::{QuestionSource, ReportSource};

use std::time::Duration;

use bizlic_core::{IntakePayload, Report};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

const GENERATE_PATH: &str = "api/generate-report";
const ASK_PATH: &str = "api/rag";
const HEALTH_PATH: &str = "";

/// HTTP client for the licensing service.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    generate_url: Url,
    ask_url: Url,
    health_url: Url,
}

impl ServiceClient {
    /// Create a client from configuration.
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ServiceError::Transport {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(Self {
            http,
            generate_url: config.endpoint(GENERATE_PATH)?,
            ask_url: config.endpoint(ASK_PATH)?,
            health_url: config.endpoint(HEALTH_PATH)?,
        })
    }

    /// Request a new report for `payload`.
    ///
    /// Calls `POST {base_url}/api/generate-report`. A 2xx report carrying the
    /// service's error marker is returned as-is; rejecting it is the
    /// fetcher's decision.
    pub async fn generate_report(&self, payload: &IntakePayload) -> Result<Report, ServiceError> {
        let endpoint = "POST /api/generate-report";
        tracing::info!(endpoint, fields = payload.fields().len(), "requesting report generation");
        let report: Report = self
            .post_json(endpoint, self.generate_url.clone(), payload)
            .await?;
        tracing::debug!(
            endpoint,
            rules = report.matched_rules.len(),
            declared = ?report.matched_rules_count,
            "report received"
        );
        Ok(report)
    }

    /// Ask a follow-up question.
    ///
    /// Calls `POST {base_url}/api/rag`. Blank questions are rejected
    /// locally with [`ServiceError::EmptyQuestion`].
    pub async fn ask(&self, question: &str) -> Result<Answer, ServiceError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ServiceError::EmptyQuestion);
        }
        let endpoint = "POST /api/rag";
        tracing::info!(endpoint, chars = question.chars().count(), "asking question");
        let answer: Answer = self
            .post_json(endpoint, self.ask_url.clone(), &answer::QuestionRequest { question })
            .await?;
        tracing::debug!(endpoint, sources = answer.sources.len(), "answer received");
        Ok(answer)
    }

    /// Probe service health.
    ///
    /// Calls `GET {base_url}/`.
    pub async fn health(&self) -> Result<ServiceHealth, ServiceError> {
        let endpoint = "GET /";
        let resp = self
            .http
            .get(self.health_url.clone())
            .send()
            .await
            .map_err(|e| ServiceError::Transport {
                endpoint: endpoint.into(),
                source: e,
            })?;
        read_json(endpoint, resp).await
    }

    async fn post_json<B, T>(&self, endpoint: &str, url: Url, body: &B) -> Result<T, ServiceError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport {
                endpoint: endpoint.into(),
                source: e,
            })?;
        read_json(endpoint, resp).await
    }
}

/// Map a response to `T` following the crate's error mapping.
async fn read_json<T: DeserializeOwned>(
    endpoint: &str,
    resp: reqwest::Response,
) -> Result<T, ServiceError> {
    let status = resp.status();
    let text = resp.text().await.map_err(|e| ServiceError::Transport {
        endpoint: endpoint.into(),
        source: e,
    })?;

    if !status.is_success() {
        let message = error_field(&text).unwrap_or_else(|| format!("HTTP {status}"));
        tracing::warn!(endpoint, status = status.as_u16(), %message, "service returned error status");
        return Err(ServiceError::Server {
            endpoint: endpoint.into(),
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&text).map_err(|e| {
        tracing::warn!(endpoint, error = %e, bytes = text.len(), "unparsable response body");
        ServiceError::MalformedResponse {
            endpoint: endpoint.into(),
            reason: e.to_string(),
            raw: text,
        }
    })
}

/// The `error` string of a `{"error": "..."}` body, if that is what `text` is.
fn error_field(text: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(text).ok()?;
    value
        .get("error")?
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
