// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Terminal status surface.

use std::io::Write;

use webprint_core::status::{StatusKind, StatusMessage, StatusSurface};

/// Writes each status update as one line: errors to stderr, the rest to
/// stdout.  A terminal cannot overwrite, so the latest line is the current
/// status.
#[derive(Debug, Default)]
pub struct TerminalSurface;

pub(crate) fn render(message: &StatusMessage) -> String {
    let tag = match message.kind {
        StatusKind::Info => "..",
        StatusKind::Success => "ok",
        StatusKind::Error => "!!",
    };
    format!(
        "[{}] {tag} {}",
        message.shown_at.format("%H:%M:%S"),
        message.text
    )
}

impl StatusSurface for TerminalSurface {
    fn show(&self, message: &StatusMessage) {
        let line = render(message);
        // Write failures (closed pipe) are ignored.
        let _ = match message.kind {
            StatusKind::Error => writeln!(std::io::stderr().lock(), "{line}"),
            _ => writeln!(std::io::stdout().lock(), "{line}"),
        };
    }
}
