// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// User-facing status messages.
//
// There is a single status surface; every event overwrites it.  Each message
// carries one of three presentation kinds so the frontend can pick a colour
// without looking at the text.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, WebprintError};
use crate::types::{JobId, JobStatus, PrinterId};

/// Presentation category of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

/// One overwrite of the status surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    pub shown_at: DateTime<Utc>,
}

impl StatusMessage {
    pub fn new(kind: StatusKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            shown_at: Utc::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(StatusKind::Error, text)
    }
}

/// Where status messages are shown.
///
/// Implementations replace whatever was shown before; no history is kept
/// by the contract.
pub trait StatusSurface: Send + Sync {
    fn show(&self, message: &StatusMessage);
}

// -- Message catalogue --------------------------------------------------------

pub fn no_printers() -> StatusMessage {
    StatusMessage::error("No printers available, or the print service cannot reach CUPS.")
}

pub fn directory_failed() -> StatusMessage {
    StatusMessage::error("Failed to load the printer list. Check that the print service is running.")
}

pub fn options_failed(printer: &PrinterId, err: &WebprintError) -> StatusMessage {
    match err {
        WebprintError::Application(msg) => {
            StatusMessage::error(format!("Could not load options for {printer}: {msg}"))
        }
        _ => StatusMessage::error(format!(
            "Failed to load options for {printer}. Check the network or server status."
        )),
    }
}

pub fn submitting() -> StatusMessage {
    StatusMessage::info("Uploading and submitting the print job...")
}

pub fn submitted(job: &JobId) -> StatusMessage {
    StatusMessage::success(format!("Print job submitted. Job ID: {job}"))
}

pub fn submit_failed(err: &WebprintError) -> StatusMessage {
    match err {
        WebprintError::Validation(v) => validation_failed(v),
        WebprintError::Application(msg) => StatusMessage::error(format!("Error: {msg}")),
        _ => StatusMessage::error(
            "Failed to submit the print job. Check the network or server status.",
        ),
    }
}

pub fn validation_failed(err: &ValidationError) -> StatusMessage {
    let text = match err {
        ValidationError::MissingFile => "Please choose a file.".to_string(),
        ValidationError::MissingPrinter => "Please choose a printer.".to_string(),
        ValidationError::SubmissionInProgress => {
            "A print job is still being tracked. Wait for it to finish.".to_string()
        }
        other => format!("Please check the form: {other}."),
    };
    StatusMessage::error(text)
}

pub fn job_progress(job: &JobId, status: &JobStatus) -> StatusMessage {
    StatusMessage::info(format!(
        "Job {job} status: {} ({})",
        status.state,
        status.reason.as_deref().unwrap_or("no details")
    ))
}

/// Final message for a job that reached a terminal state.
pub fn job_finished(job: &JobId, status: &JobStatus) -> StatusMessage {
    if status.state.is_success() {
        StatusMessage::success(format!("Job {job} completed."))
    } else {
        StatusMessage::error(format!("Job {job} ended with state: {}", status.state))
    }
}

pub fn poll_failed(job: &JobId, err: &WebprintError) -> StatusMessage {
    match err {
        WebprintError::Application(msg) => {
            StatusMessage::error(format!("Failed to query job {job} status: {msg}"))
        }
        _ => StatusMessage::error(format!("Network error while querying job {job} status.")),
    }
}
