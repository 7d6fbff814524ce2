// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print job lifecycle orchestration.
//
// Sequences directory load -> option resolution -> submission -> polling
// over one explicit state object, and owns the submit lock.  The lock is not
// stored: it is derived from the phase, which only this module writes.
//
// The state sits behind a `std::sync::Mutex` that is never held across an
// await, so the frontend can read snapshots while a poll session runs.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error, info, warn};

use webprint_core::config::ClientConfig;
use webprint_core::error::{Result, ValidationError};
use webprint_core::status::{self, StatusMessage, StatusSurface};
use webprint_core::types::{
    FilePayload, JobId, JobStatus, OptionChoices, OptionName, OptionSchema, PrinterId,
    SubmissionRequest,
};

use crate::directory::{DirectoryClient, PrinterChoice, selectable_set};
use crate::options::OptionResolver;
use crate::poller::{JobPoller, PollOutcome};
use crate::service::PrintService;
use crate::submit::SubmissionClient;

/// Where the submit flow currently is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Upload in flight.
    Submitting,
    /// A poll session is tracking this job.
    Polling(JobId),
}

/// What the user has entered in the print form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub file: Option<FilePayload>,
    pub options: OptionChoices,
    pub copies: Option<u32>,
}

/// How the submit button should be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitAffordance {
    pub enabled: bool,
    pub label: &'static str,
}

/// Everything the frontend renders.
#[derive(Debug, Clone, Default)]
pub struct OrchestratorState {
    /// Printer selection list, placeholder first.
    pub printers: Vec<PrinterChoice>,
    pub selected_printer: Option<PrinterId>,
    /// Bumped on every selection change; an options response is rendered
    /// only if this has not moved since its request was issued.
    pub selection_generation: u64,
    /// Option groups currently rendered; `None` when nothing is shown.
    pub schema: Option<OptionSchema>,
    pub form: FormState,
    pub phase: Phase,
    /// Most recent status fetched for the tracked job.
    pub last_job_status: Option<JobStatus>,
    /// Content of the status surface.
    pub status: Option<StatusMessage>,
}

impl OrchestratorState {
    /// The submit lock: held from submission until the job settles.
    pub fn lock_held(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn active_job(&self) -> Option<&JobId> {
        match &self.phase {
            Phase::Polling(job) => Some(job),
            _ => None,
        }
    }

    pub fn affordance(&self) -> SubmitAffordance {
        match self.phase {
            Phase::Idle => SubmitAffordance {
                enabled: true,
                label: "Submit print job",
            },
            Phase::Submitting => SubmitAffordance {
                enabled: false,
                label: "Submitting...",
            },
            Phase::Polling(_) => SubmitAffordance {
                enabled: false,
                label: "Printing...",
            },
        }
    }
}

/// Input events from the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The printer list changed value; `None` is the placeholder.
    SelectionChanged(Option<PrinterId>),
    /// The user pressed submit.
    FormConfirmed,
}

/// Drives one print form against one print service.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct Orchestrator {
    directory: Arc<DirectoryClient>,
    resolver: Arc<OptionResolver>,
    submitter: Arc<SubmissionClient>,
    poller: Arc<JobPoller>,
    surface: Arc<dyn StatusSurface>,
    state: Arc<Mutex<OrchestratorState>>,
    max_upload_bytes: u64,
}

impl Orchestrator {
    pub fn new(
        service: Arc<dyn PrintService>,
        surface: Arc<dyn StatusSurface>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            directory: Arc::new(DirectoryClient::new(service.clone())),
            resolver: Arc::new(OptionResolver::new(service.clone())),
            submitter: Arc::new(SubmissionClient::new(service.clone())),
            poller: Arc::new(JobPoller::new(service, config.poll_interval())),
            surface,
            state: Arc::new(Mutex::new(OrchestratorState::default())),
            max_upload_bytes: config.max_upload_bytes,
        }
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> OrchestratorState {
        self.state().clone()
    }

    pub fn lock_held(&self) -> bool {
        self.state().lock_held()
    }

    /// Dispatch a presentation-layer event.
    pub async fn handle(&self, event: UiEvent) -> Result<()> {
        match event {
            UiEvent::SelectionChanged(selection) => self.select_printer(selection).await,
            UiEvent::FormConfirmed => self.confirm().await.map(|_| ()),
        }
    }

    // -- Directory -----------------------------------------------------------

    /// Load the printer directory. Called once at startup.
    ///
    /// Returns the number of selectable printers.
    pub async fn start(&self) -> Result<usize> {
        let result = self.directory.fetch().await;
        let choices = selectable_set(&result);
        {
            let mut state = self.state();
            state.printers = choices;
            state.selected_printer = None;
            state.selection_generation += 1;
            state.schema = None;
            state.form.options.clear();
        }

        match result {
            Ok(printers) if printers.is_empty() => {
                warn!("print service reports no printers");
                self.report(status::no_printers());
                Ok(0)
            }
            Ok(printers) => Ok(printers.len()),
            Err(err) => {
                error!(error = %err, "failed to load printer directory");
                self.report(status::directory_failed());
                Err(err)
            }
        }
    }

    // -- Option form ---------------------------------------------------------

    /// Handle a change of the printer selection.
    ///
    /// Rendered options are cleared immediately.  The placeholder issues no
    /// request.  A response that arrives after any later selection change is
    /// discarded, error or not, even when the same printer was re-selected.
    pub async fn select_printer(&self, selection: Option<PrinterId>) -> Result<()> {
        let selection = selection.filter(|p| !p.is_empty());
        let generation = {
            let mut state = self.state();
            state.selected_printer = selection.clone();
            state.selection_generation += 1;
            state.schema = None;
            state.form.options.clear();
            state.selection_generation
        };

        let Some(printer) = selection else {
            debug!("placeholder selected, options cleared");
            return Ok(());
        };

        let result = self.resolver.resolve(&printer).await;

        let mut state = self.state();
        if state.selection_generation != generation {
            debug!(printer = %printer, "discarding options for a stale selection");
            return Ok(());
        }
        match result {
            Ok(schema) => {
                info!(printer = %printer, groups = schema.len(), "options rendered");
                state.schema = Some(schema);
                state.form.options.clear();
                Ok(())
            }
            Err(err) => {
                drop(state);
                warn!(printer = %printer, error = %err, "failed to resolve options");
                self.report(status::options_failed(&printer, &err));
                Err(err)
            }
        }
    }

    /// Attach (or detach) the document to print.
    pub fn attach_file(&self, file: Option<FilePayload>) {
        self.state().form.file = file;
    }

    pub fn set_copies(&self, copies: Option<u32>) {
        self.state().form.copies = copies;
    }

    /// Choose a value for one rendered option, or `None` for the default.
    pub fn choose_option(
        &self,
        name: OptionName,
        value: Option<String>,
    ) -> std::result::Result<(), ValidationError> {
        let mut state = self.state();
        let Some(value) = value else {
            state.form.options.remove(&name);
            return Ok(());
        };
        state
            .schema
            .as_ref()
            .ok_or(ValidationError::UnknownOption(name))?
            .check(name, &value)?;
        state.form.options.insert(name, value);
        Ok(())
    }

    // -- Submission and polling ----------------------------------------------

    /// Submit the form and track the job until it settles.
    ///
    /// Returns the final status of a completed job.  Validation failures
    /// issue no request.  Every other failure releases the lock and resets
    /// the form before returning.
    pub async fn confirm(&self) -> Result<JobStatus> {
        let prepared = {
            let mut state = self.state();
            if state.lock_held() {
                Err(ValidationError::SubmissionInProgress)
            } else {
                let built = SubmissionRequest::new(
                    state.selected_printer.clone(),
                    state.form.file.clone(),
                    state.form.options.clone(),
                    state.form.copies,
                    self.max_upload_bytes,
                );
                if built.is_ok() {
                    state.phase = Phase::Submitting;
                }
                built
            }
        };

        let request = match prepared {
            Ok(request) => request,
            Err(invalid) => {
                warn!(reason = %invalid, "submission rejected before sending");
                self.report(status::validation_failed(&invalid));
                return Err(invalid.into());
            }
        };

        self.report(status::submitting());
        let job = match self.submitter.submit(request).await {
            Ok(job) => job,
            Err(err) => {
                self.report(status::submit_failed(&err));
                self.release();
                return Err(err);
            }
        };

        {
            let mut state = self.state();
            state.phase = Phase::Polling(job.clone());
            state.last_job_status = None;
        }
        self.report(status::submitted(&job));

        let outcome = self
            .poller
            .run(&job, |observed| {
                self.state().last_job_status = Some(observed.clone());
                if !observed.state.is_terminal() {
                    self.report(status::job_progress(&job, observed));
                }
            })
            .await;

        match &outcome {
            PollOutcome::Completed(last) | PollOutcome::Failed(last) => {
                self.report(status::job_finished(&job, last));
            }
            PollOutcome::Aborted(err) => {
                self.report(status::poll_failed(&job, err));
            }
        }
        self.release();
        outcome.into_result(&job)
    }

    // -- Internals -----------------------------------------------------------

    fn state(&self) -> MutexGuard<'_, OrchestratorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Overwrite the status surface.
    fn report(&self, message: StatusMessage) {
        debug!(kind = ?message.kind, text = %message.text, "status");
        self.state().status = Some(message.clone());
        self.surface.show(&message);
    }

    /// Drop the submit lock and reset the form.
    fn release(&self) {
        let mut state = self.state();
        state.phase = Phase::Idle;
        state.form = FormState::default();
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("state", &*self.state())
            .field("poll_interval", &self.poller.interval())
            .finish()
    }
}
