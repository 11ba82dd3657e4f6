mod normalize;

use crate::model::{
    AnalysisOutcome, ClientConfig, JobDescription, UploadSelection, MSG_CONNECT_FAILED,
    MSG_READ_FAILED, PDF_MIME,
};
use anyhow::{Context, Result};
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, info, warn};

pub(crate) use normalize::interpret_response;

pub const ANALYZE_PATH: &str = "/api/v1/analyze";
pub const JOB_DESCRIPTION_PATH: &str = "/job-description";
pub const HEALTH_PATH: &str = "/health";

/// Transport-level failures. These never leave `submit`; they are folded into
/// `AnalysisOutcome::Failure`.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request timed out")]
    Timeout,
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("response was not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClientError::Timeout
        } else {
            ClientError::Transport(e)
        }
    }
}

/// Anything that can turn a selection into an outcome. The session drives this
/// seam so it can be exercised without a live service.
pub(crate) trait Analyzer: Send + Sync + 'static {
    fn analyze(&self, selection: UploadSelection) -> impl Future<Output = AnalysisOutcome> + Send;
}

pub struct AnalysisClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnalysisClient {
    pub fn new(cfg: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .user_agent(cfg.user_agent.clone())
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Upload one resume and return the normalized outcome. Never errors: every
    /// failure mode is mapped onto an `AnalysisOutcome`.
    pub async fn submit(&self, selection: &UploadSelection) -> AnalysisOutcome {
        let content = match tokio::fs::read(&selection.path).await {
            Ok(b) => Bytes::from(b),
            Err(e) => {
                warn!(file = %selection.path.display(), error = %e, "failed to read resume");
                return AnalysisOutcome::Failure(MSG_READ_FAILED.to_string());
            }
        };

        info!(
            file = %selection.name,
            size = content.len(),
            url = %self.url(ANALYZE_PATH),
            "submitting resume for analysis"
        );

        match self.post_analysis(selection, content).await {
            Ok((status, body)) => {
                debug!(%status, "analysis response received");
                let outcome = interpret_response(status, body);
                match &outcome {
                    AnalysisOutcome::Success(r) => {
                        info!(match_percentage = r.match_percentage, "analysis succeeded")
                    }
                    AnalysisOutcome::Failure(msg) => warn!(%status, error = %msg, "analysis failed"),
                    AnalysisOutcome::Malformed(_) => {
                        warn!(%status, "analysis response had an unexpected shape")
                    }
                }
                outcome
            }
            Err(e) => {
                warn!(error = %e, "analysis request did not complete");
                AnalysisOutcome::Failure(MSG_CONNECT_FAILED.to_string())
            }
        }
    }

    async fn post_analysis(
        &self,
        selection: &UploadSelection,
        content: Bytes,
    ) -> Result<(StatusCode, Value), ClientError> {
        let len = content.len() as u64;
        let part = Part::stream_with_length(content, len)
            .file_name(selection.name.clone())
            .mime_str(PDF_MIME)?;
        let form = Form::new().part("file", part);

        let resp = self
            .http
            .post(self.url(ANALYZE_PATH))
            .multipart(form)
            .send()
            .await?;
        let status = resp.status();
        // Body is parsed as JSON whatever the status; the error message lives there.
        let body = resp.bytes().await?;
        let value = serde_json::from_slice(&body)?;
        Ok((status, value))
    }

    /// Fetch the job the service scores against. Accepts both the enveloped
    /// `{success, data}` form and a bare object.
    pub async fn fetch_job_description(&self) -> Result<JobDescription> {
        let v: Value = self
            .http
            .get(self.url(JOB_DESCRIPTION_PATH))
            .send()
            .await
            .context("request job description")?
            .error_for_status()
            .context("job description endpoint returned an error")?
            .json()
            .await
            .context("decode job description")?;
        parse_job_description(v)
    }

    /// Probe the service's health endpoint and return its reported status.
    pub async fn health(&self) -> Result<String> {
        let v: Value = self
            .http
            .get(self.url(HEALTH_PATH))
            .send()
            .await
            .context("request health")?
            .error_for_status()
            .context("health endpoint returned an error")?
            .json()
            .await
            .context("decode health response")?;
        Ok(v.get("status")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown")
            .to_string())
    }
}

impl Analyzer for AnalysisClient {
    fn analyze(&self, selection: UploadSelection) -> impl Future<Output = AnalysisOutcome> + Send {
        async move { self.submit(&selection).await }
    }
}

fn parse_job_description(v: Value) -> Result<JobDescription> {
    let inner = match v.get("data") {
        Some(d) if d.is_object() => d.clone(),
        _ => v,
    };
    serde_json::from_value(inner).context("job description has an unexpected shape")
}
