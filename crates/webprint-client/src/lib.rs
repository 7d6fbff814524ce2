// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Webprint client: talks to a print service over HTTP and drives the
// lifecycle of a single print job.
//
// - `service`      : wire contract and response shapes
// - `http`         : reqwest transport for the contract
// - `directory`    : printer directory
// - `options`      : per-printer option schema
// - `submit`       : job submission
// - `poller`       : job status polling
// - `orchestrator` : state, submit lock and event handling

pub mod directory;
pub mod http;
pub mod options;
pub mod orchestrator;
pub mod poller;
pub mod service;
pub mod submit;

#[cfg(test)]
mod mock;

pub use directory::{DirectoryClient, Placeholder, PrinterChoice, selectable_set};
pub use http::HttpPrintService;
pub use options::{OptionResolver, schema_from_response};
pub use orchestrator::{FormState, Orchestrator, OrchestratorState, Phase, SubmitAffordance, UiEvent};
pub use poller::{JobPoller, PollOutcome};
pub use service::{DirectoryResponse, OptionsResponse, PrintService, StatusResponse, SubmitResponse};
pub use submit::SubmissionClient;
