// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job status polling.
//
// One session per accepted job:
//
//   Polling(job) --tick--> Polling(job)          non-terminal state
//                --tick--> Terminal(success)     completed
//                --tick--> Terminal(failure)     canceled | aborted
//                --tick--> Aborted(error)        error envelope or network failure
//
// Each tick sleeps for the interval, then fetches.  The interval is measured
// from the end of one fetch to the start of the next, and the session owns
// its only timer, so two ticks can never overlap.  A failed tick ends the
// session; there is no retry.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use webprint_core::error::{Result, WebprintError};
use webprint_core::types::{JobId, JobStatus};

use crate::service::PrintService;

/// How a poll session ended.
#[derive(Debug)]
pub enum PollOutcome {
    /// The job reached `completed`.
    Completed(JobStatus),
    /// The job reached `canceled` or `aborted`.
    Failed(JobStatus),
    /// The service reported an error, or the request failed.
    Aborted(WebprintError),
}

impl PollOutcome {
    /// Convert into a result; `Failed` becomes `WebprintError::JobEnded`.
    pub fn into_result(self, job: &JobId) -> Result<JobStatus> {
        match self {
            Self::Completed(status) => Ok(status),
            Self::Failed(status) => Err(WebprintError::JobEnded {
                job: job.clone(),
                state: status.state,
            }),
            Self::Aborted(err) => Err(err),
        }
    }
}

/// Polls one job at a fixed interval until it settles.
pub struct JobPoller {
    service: Arc<dyn PrintService>,
    interval: Duration,
}

impl JobPoller {
    pub fn new(service: Arc<dyn PrintService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fetch the job's status once.
    pub async fn fetch(&self, job: &JobId) -> Result<JobStatus> {
        let response = self.service.job_status(job).await?;
        if let Some(error) = response.error.filter(|e| !e.is_empty()) {
            return Err(WebprintError::Application(error));
        }
        let state = response.state.ok_or_else(|| {
            WebprintError::Transport(format!("status for job {job} carried no state"))
        })?;
        Ok(JobStatus::new(state, response.reason))
    }

    /// Run the session to its end.
    ///
    /// `observe` sees every status fetched, including the terminal one and
    /// repeats of an unchanged state.
    pub async fn run<F>(&self, job: &JobId, mut observe: F) -> PollOutcome
    where
        F: FnMut(&JobStatus) + Send,
    {
        info!(job_id = %job, interval_ms = self.interval.as_millis() as u64, "poll session started");
        let mut ticks: u32 = 0;

        loop {
            tokio::time::sleep(self.interval).await;
            ticks += 1;

            let status = match self.fetch(job).await {
                Ok(status) => status,
                Err(err) => {
                    warn!(job_id = %job, ticks, error = %err, "poll session aborted");
                    return PollOutcome::Aborted(err);
                }
            };

            debug!(job_id = %job, ticks, state = %status.state, reason = ?status.reason, "job status");
            observe(&status);

            if status.state.is_terminal() {
                info!(job_id = %job, ticks, state = %status.state, "poll session finished");
                return if status.state.is_success() {
                    PollOutcome::Completed(status)
                } else {
                    PollOutcome::Failed(status)
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Call, ScriptedService, status_reply};
    use serde_json::json;
    use webprint_core::types::JobState;

    const INTERVAL: Duration = Duration::from_secs(3);

    fn poller(service: &Arc<ScriptedService>) -> JobPoller {
        JobPoller::new(service.clone(), INTERVAL)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_until_completed() {
        let service = Arc::new(ScriptedService::new());
        service.push_status(Ok(status_reply(json!({ "state": "processing" }))));
        service.push_status(Ok(status_reply(json!({ "state": "processing", "reason": "job-printing" }))));
        service.push_status(Ok(status_reply(json!({ "state": "completed" }))));

        let job = JobId::new("42");
        let mut seen = Vec::new();
        let started = tokio::time::Instant::now();
        let outcome = poller(&service).run(&job, |s| seen.push(s.clone())).await;

        assert!(matches!(outcome, PollOutcome::Completed(ref s) if s.state == JobState::Completed));
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].reason.as_deref(), Some("job-printing"));
        assert!(started.elapsed() >= INTERVAL * 3);
        assert_eq!(service.calls(), vec![Call::Status(job.clone()); 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_states_are_still_observed() {
        let service = Arc::new(ScriptedService::new());
        for _ in 0..4 {
            service.push_status(Ok(status_reply(json!({ "state": "pending" }))));
        }
        service.push_status(Ok(status_reply(json!({ "state": "canceled" }))));

        let mut observed = 0;
        let outcome = poller(&service).run(&JobId::new("5"), |_| observed += 1).await;

        assert!(matches!(outcome, PollOutcome::Failed(ref s) if s.state == JobState::Canceled));
        assert_eq!(observed, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn error_envelope_aborts_immediately() {
        let service = Arc::new(ScriptedService::new());
        service.push_status(Ok(status_reply(json!({ "state": "processing" }))));
        service.push_status(Ok(status_reply(json!({ "error": "job not found" }))));
        service.push_status(Ok(status_reply(json!({ "state": "completed" }))));

        let outcome = poller(&service).run(&JobId::new("9"), |_| {}).await;

        assert!(matches!(outcome, PollOutcome::Aborted(WebprintError::Application(ref m)) if m == "job not found"));
        assert_eq!(service.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_error_string_keeps_polling() {
        let service = Arc::new(ScriptedService::new());
        service.push_status(Ok(status_reply(json!({ "state": "processing", "error": "" }))));
        service.push_status(Ok(status_reply(json!({ "state": "completed" }))));

        let outcome = poller(&service).run(&JobId::new("11"), |_| {}).await;

        assert!(matches!(outcome, PollOutcome::Completed(_)));
        assert_eq!(service.calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn network_failure_aborts_without_retry() {
        let service = Arc::new(ScriptedService::new());
        service.push_status(Err(WebprintError::Transport("connection refused".into())));
        service.push_status(Ok(status_reply(json!({ "state": "completed" }))));

        let mut observed = 0;
        let outcome = poller(&service).run(&JobId::new("9"), |_| observed += 1).await;

        assert!(matches!(outcome, PollOutcome::Aborted(WebprintError::Transport(_))));
        assert_eq!(observed, 0);
        assert_eq!(service.calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_state_is_malformed() {
        let service = Arc::new(ScriptedService::new());
        service.push_status(Ok(status_reply(json!({ "reason": "none" }))));

        let outcome = poller(&service).run(&JobId::new("9"), |_| {}).await;
        assert!(matches!(outcome, PollOutcome::Aborted(WebprintError::Transport(_))));
    }

    #[test]
    fn failed_outcome_becomes_job_ended() {
        let job = JobId::new("3");
        let err = PollOutcome::Failed(JobStatus::new(JobState::Aborted, None))
            .into_result(&job)
            .unwrap_err();
        assert!(matches!(err, WebprintError::JobEnded { state: JobState::Aborted, .. }));
    }
}
