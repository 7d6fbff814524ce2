// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// HTTP transport for the print service, built on `reqwest`.
//
// Routes:
//   - GET  /api/printers
//   - GET  /api/printers/{printer}/options
//   - POST /api/print              (multipart/form-data)
//   - GET  /api/jobs/{job}
//
// Response bodies are decoded regardless of the HTTP status: the service
// reports failures as `{ "error": ... }` with a 4xx/5xx code, and those
// envelopes must reach the caller intact.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use webprint_core::config::ClientConfig;
use webprint_core::error::{Result, WebprintError};
use webprint_core::types::{JobId, PrinterId, SubmissionRequest};

use crate::service::{DirectoryResponse, OptionsResponse, PrintService, StatusResponse, SubmitResponse};

/// `PrintService` over HTTP.
///
/// No request timeout is configured; a request that hangs delays its caller
/// until the transport gives up.
pub struct HttpPrintService {
    base: Url,
    http: reqwest::Client,
}

impl HttpPrintService {
    /// Create a client for the service rooted at `base_url`.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self> {
        let base: Url = base_url
            .parse()
            .map_err(|e| WebprintError::Config(format!("invalid server URL '{base_url}': {e}")))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(WebprintError::Config(format!(
                "server URL '{base_url}' must be an http:// or https:// address"
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| WebprintError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base, http })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.server_url, &config.user_agent)
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| WebprintError::Config(format!("'{}' cannot carry a path", self.base)))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url, operation: &str) -> Result<T> {
        debug!(%url, "GET {operation}");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| WebprintError::Transport(format!("{operation}: {e}")))?;
        decode(response, operation).await
    }
}

#[async_trait]
impl PrintService for HttpPrintService {
    #[instrument(skip(self), fields(base = %self.base))]
    async fn list_printers(&self) -> Result<DirectoryResponse> {
        let url = self.endpoint(&["api", "printers"])?;
        self.get_json(url, "list printers").await
    }

    #[instrument(skip(self), fields(printer = %printer))]
    async fn printer_options(&self, printer: &PrinterId) -> Result<OptionsResponse> {
        let url = self.endpoint(&["api", "printers", printer.as_str(), "options"])?;
        self.get_json(url, "printer options").await
    }

    #[instrument(skip(self, request), fields(printer = %request.printer()))]
    async fn submit_job(&self, request: SubmissionRequest) -> Result<SubmitResponse> {
        let url = self.endpoint(&["api", "print"])?;
        let (printer, options, copies, file) = request.into_parts();

        let mut form = Form::new().text("printer", printer.to_string());
        for (name, value) in options {
            form = form.text(name.field_name(), value);
        }
        if let Some(copies) = copies {
            form = form.text("copies", copies.to_string());
        }
        let size = file.bytes.len();
        let part = Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.content_type)
            .map_err(|e| WebprintError::Transport(format!("submit job: bad content type: {e}")))?;
        form = form.part("file", part);

        info!(bytes = size, "POST submit job");
        let response = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| WebprintError::Transport(format!("submit job: {e}")))?;
        decode(response, "submit job").await
    }

    #[instrument(skip(self), fields(job_id = %job))]
    async fn job_status(&self, job: &JobId) -> Result<StatusResponse> {
        let url = self.endpoint(&["api", "jobs", job.as_str()])?;
        self.get_json(url, "job status").await
    }
}

/// Read the whole body and decode it as JSON, whatever the status code.
async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|e| WebprintError::Transport(format!("{operation}: reading body: {e}")))?;

    serde_json::from_slice(&body).map_err(|e| {
        warn!(%status, error = %e, "undecodable {operation} response");
        WebprintError::Transport(format!("{operation}: unparsable response (HTTP {status}): {e}"))
    })
}
