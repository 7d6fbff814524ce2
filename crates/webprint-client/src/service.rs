// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The print service seam and its wire-level response shapes.
//
// A `PrintService` only moves bytes and decodes JSON: it returns the raw
// response bodies and leaves their interpretation (error envelopes, missing
// fields, colour-mode synthesis) to the component clients built on top.
// Transport failures and undecodable bodies surface as
// `WebprintError::Transport`.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use webprint_core::error::Result;
use webprint_core::types::{JobId, JobState, PrinterId, SubmissionRequest};

/// The four HTTP operations exposed by the print service.
#[async_trait]
pub trait PrintService: Send + Sync {
    /// `GET /api/printers`
    async fn list_printers(&self) -> Result<DirectoryResponse>;

    /// `GET /api/printers/{printer}/options`
    async fn printer_options(&self, printer: &PrinterId) -> Result<OptionsResponse>;

    /// `POST /api/print` (multipart)
    async fn submit_job(&self, request: SubmissionRequest) -> Result<SubmitResponse>;

    /// `GET /api/jobs/{job}`
    async fn job_status(&self, job: &JobId) -> Result<StatusResponse>;
}

/// Body of `GET /api/printers`: a list of names, or an error envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DirectoryResponse {
    Printers(Vec<PrinterId>),
    Error { error: String },
}

/// Body of `GET /api/printers/{printer}/options`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OptionsResponse {
    #[serde(default)]
    pub media: Option<Vec<String>>,
    #[serde(default)]
    pub quality: Option<Vec<String>>,
    #[serde(default)]
    pub sides: Option<Vec<String>>,
    /// Any JSON value; only its truthiness matters.
    #[serde(default)]
    pub color_mode: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `POST /api/print`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "lenient_job_id")]
    pub job_id: Option<JobId>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /api/jobs/{job}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub state: Option<JobState>,
    #[serde(default, deserialize_with = "lenient_reason")]
    pub reason: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// JavaScript-style truthiness of a JSON value.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// CUPS job ids are integers; other services may send strings.
fn lenient_job_id<'de, D>(deserializer: D) -> std::result::Result<Option<JobId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(JobId::new(s)),
        Some(Value::Number(n)) => Some(JobId::new(n.to_string())),
        _ => None,
    })
}

/// `job-state-reasons` is multi-valued in IPP; join lists into one line.
fn lenient_reason<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let reason = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    Ok(Some(reason).filter(|r| !r.is_empty()))
}
