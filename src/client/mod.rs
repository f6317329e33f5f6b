//! Reqwest-based client for the remote execution service.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

/// Fixed user-facing text rendered in place of output for any failed request.
/// The underlying cause is logged, then discarded.
pub const EXEC_ERROR_MESSAGE: &str = "An error occurred while executing the code.";

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("execution service returned {0}")]
    Status(reqwest::StatusCode),
    #[error("undecodable response body: {0}")]
    Body(String),
}

#[derive(Debug, Serialize)]
struct ExecuteBody<'a> {
    code: &'a str,
}

#[derive(Debug, Serialize)]
struct InputBody<'a> {
    input: &'a str,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ExecOutcome {
    /// Captured stdout (or error text) reported by the service, verbatim.
    pub output: String,
    /// Structured pending-input signal. Older service versions omit it, in
    /// which case the session falls back to the prompt-marker heuristic.
    #[serde(default)]
    pub awaiting_input: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct ExecClient {
    http: reqwest::Client,
    base_url: String,
}

impl ExecClient {
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let timeout = cfg.get_u64("REQUEST_TIMEOUT").unwrap_or(30);
        let base_url = cfg.execute_url().trim_end_matches('/').to_string();

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()?;

        Ok(Self { http, base_url })
    }

    /// Submit a full program for execution and return its captured output.
    pub async fn execute(&self, code: &str) -> Result<ExecOutcome, ExecError> {
        self.post("execute", &ExecuteBody { code }).await
    }

    /// Deliver one line of user input to a program paused on a read.
    pub async fn send_input(&self, line: &str) -> Result<ExecOutcome, ExecError> {
        self.post("input", &InputBody { input: line }).await
    }

    async fn post<B: Serialize>(&self, route: &str, body: &B) -> Result<ExecOutcome, ExecError> {
        let url = format!("{}/{}", self.base_url, route);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        debug!(%url, "posting to execution service");
        let resp = self.http.post(&url).headers(headers).json(body).send().await?;

        if !resp.status().is_success() {
            return Err(ExecError::Status(resp.status()));
        }

        let text = resp.text().await?;
        serde_json::from_str::<ExecOutcome>(&text)
            .map_err(|e| ExecError::Body(e.to_string()))
    }
}

/// Flatten any request failure to the fixed user-facing message, logging the
/// cause first.
pub fn flatten_error(err: &ExecError) -> &'static str {
    warn!(error = %err, "execution request failed");
    EXEC_ERROR_MESSAGE
}
