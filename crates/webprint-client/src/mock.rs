// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scripted in-memory print service for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use webprint_core::error::{Result, WebprintError};
use webprint_core::status::{StatusMessage, StatusSurface};
use webprint_core::types::{JobId, OptionChoices, PrinterId, SubmissionRequest};

use crate::service::{DirectoryResponse, OptionsResponse, PrintService, StatusResponse, SubmitResponse};

/// A request the service received.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ListPrinters,
    Options(PrinterId),
    Submit {
        printer: PrinterId,
        options: OptionChoices,
        copies: Option<u32>,
        file_name: String,
    },
    Status(JobId),
}

type Delayed<T> = (Duration, Result<T>);

/// Answers each operation from a queue of canned replies.
///
/// Option replies are queued per printer and may be delayed, which lets
/// tests reorder responses against selection changes.  An exhausted queue
/// answers with a transport error.
#[derive(Default)]
pub(crate) struct ScriptedService {
    directory: Mutex<VecDeque<Result<DirectoryResponse>>>,
    options: Mutex<HashMap<PrinterId, VecDeque<Delayed<OptionsResponse>>>>,
    submissions: Mutex<VecDeque<Result<SubmitResponse>>>,
    statuses: Mutex<VecDeque<Result<StatusResponse>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_directory(&self, reply: Result<DirectoryResponse>) {
        lock(&self.directory).push_back(reply);
    }

    pub(crate) fn push_options(&self, printer: &PrinterId, delay: Duration, reply: Result<OptionsResponse>) {
        lock(&self.options)
            .entry(printer.clone())
            .or_default()
            .push_back((delay, reply));
    }

    pub(crate) fn push_submit(&self, reply: Result<SubmitResponse>) {
        lock(&self.submissions).push_back(reply);
    }

    pub(crate) fn push_status(&self, reply: Result<StatusResponse>) {
        lock(&self.statuses).push_back(reply);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn exhausted<T>(what: &str) -> Result<T> {
    Err(WebprintError::Transport(format!("no scripted {what} reply")))
}

#[async_trait]
impl PrintService for ScriptedService {
    async fn list_printers(&self) -> Result<DirectoryResponse> {
        self.record(Call::ListPrinters);
        let reply = lock(&self.directory).pop_front();
        reply.unwrap_or_else(|| exhausted("directory"))
    }

    async fn printer_options(&self, printer: &PrinterId) -> Result<OptionsResponse> {
        self.record(Call::Options(printer.clone()));
        let next = lock(&self.options)
            .get_mut(printer)
            .and_then(VecDeque::pop_front);
        match next {
            Some((delay, reply)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                reply
            }
            None => exhausted("options"),
        }
    }

    async fn submit_job(&self, request: SubmissionRequest) -> Result<SubmitResponse> {
        self.record(Call::Submit {
            printer: request.printer().clone(),
            options: request.options().clone(),
            copies: request.copies(),
            file_name: request.file().name.clone(),
        });
        let reply = lock(&self.submissions).pop_front();
        reply.unwrap_or_else(|| exhausted("submission"))
    }

    async fn job_status(&self, job: &JobId) -> Result<StatusResponse> {
        self.record(Call::Status(job.clone()));
        let reply = lock(&self.statuses).pop_front();
        reply.unwrap_or_else(|| exhausted("status"))
    }
}

pub(crate) fn options_reply(value: Value) -> OptionsResponse {
    serde_json::from_value(value).expect("valid options reply")
}

pub(crate) fn submit_reply(value: Value) -> SubmitResponse {
    serde_json::from_value(value).expect("valid submit reply")
}

pub(crate) fn status_reply(value: Value) -> StatusResponse {
    serde_json::from_value(value).expect("valid status reply")
}

/// Status surface that keeps every message it was shown.
#[derive(Default)]
pub(crate) struct RecordingSurface {
    shown: Mutex<Vec<StatusMessage>>,
}

impl RecordingSurface {
    pub(crate) fn messages(&self) -> Vec<StatusMessage> {
        lock(&self.shown).clone()
    }
}

impl StatusSurface for RecordingSurface {
    fn show(&self, message: &StatusMessage) {
        lock(&self.shown).push(message.clone());
    }
}
