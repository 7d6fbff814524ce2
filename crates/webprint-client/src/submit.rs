// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job submission.

use std::sync::Arc;

use tracing::{error, info};

use webprint_core::error::{Result, WebprintError};
use webprint_core::types::{JobId, SubmissionRequest};

use crate::service::PrintService;

/// Sends validated submissions to the print service. Never retries.
pub struct SubmissionClient {
    service: Arc<dyn PrintService>,
}

impl SubmissionClient {
    pub fn new(service: Arc<dyn PrintService>) -> Self {
        Self { service }
    }

    /// Upload the document and return the job id the service assigned.
    pub async fn submit(&self, request: SubmissionRequest) -> Result<JobId> {
        let printer = request.printer().clone();
        info!(
            printer = %printer,
            document = %request.file().name,
            digest = %request.file().digest(),
            options = request.options().len(),
            "submitting print job"
        );

        let response = self.service.submit_job(request).await?;

        if response.success {
            return match response.job_id {
                Some(job) => {
                    info!(printer = %printer, job_id = %job, "print job accepted");
                    Ok(job)
                }
                None => Err(WebprintError::Transport(
                    "submission accepted without a job id".into(),
                )),
            };
        }

        match response.error.filter(|e| !e.is_empty()) {
            Some(message) => {
                error!(printer = %printer, %message, "print job rejected");
                Err(WebprintError::Application(message))
            }
            None => Err(WebprintError::Transport(
                "submission response carried neither a job id nor an error".into(),
            )),
        }
    }
}
