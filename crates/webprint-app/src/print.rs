// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Form preparation for the `print` subcommand.

use tracing::warn;

use webprint_client::{Orchestrator, UiEvent};
use webprint_core::error::Result;
use webprint_core::types::{FilePayload, PrinterId};

use crate::cli::OptionArg;

/// Select the printer and fill in the form from the command line.
///
/// When the printer's options cannot be resolved the failure is already on
/// the status surface; the job still goes out with printer defaults unless
/// `--option` values were given, since those cannot be checked.
pub async fn prepare_form(
    orch: &Orchestrator,
    printer: PrinterId,
    options: Vec<OptionArg>,
    copies: Option<u32>,
    file: FilePayload,
) -> Result<()> {
    if let Err(err) = orch
        .handle(UiEvent::SelectionChanged(Some(printer.clone())))
        .await
    {
        if !options.is_empty() {
            return Err(err);
        }
        warn!(printer = %printer, error = %err, "options unavailable, using printer defaults");
    }

    for option in options {
        orch.choose_option(option.name, Some(option.value))?;
    }
    orch.set_copies(copies);
    orch.attach_file(Some(file));
    Ok(())
}
