// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printer directory: one fetch of the available printer names, turned into
// the selectable set shown to the user.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{info, warn};

use webprint_core::error::{Result, WebprintError};
use webprint_core::types::PrinterId;

use crate::service::{DirectoryResponse, PrintService};

/// Non-selectable entries of the printer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// Heads a non-empty list.
    ChoosePrinter,
    /// The directory answered with zero printers.
    NoneAvailable,
    /// The directory could not be loaded.
    LoadFailed,
}

impl Placeholder {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChoosePrinter => "-- Please choose a printer --",
            Self::NoneAvailable => "No printers available",
            Self::LoadFailed => "Failed to load printers",
        }
    }
}

/// One entry of the printer selection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrinterChoice {
    Placeholder(Placeholder),
    Printer(PrinterId),
}

impl PrinterChoice {
    pub fn is_selectable(&self) -> bool {
        matches!(self, Self::Printer(_))
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Placeholder(p) => p.label(),
            Self::Printer(id) => id.as_str(),
        }
    }
}

/// Selectable set for a directory result.
///
/// A non-empty list gains a leading placeholder; empty and failed loads
/// collapse to a single placeholder.
pub fn selectable_set(result: &Result<Vec<PrinterId>>) -> Vec<PrinterChoice> {
    match result {
        Ok(printers) if printers.is_empty() => {
            vec![PrinterChoice::Placeholder(Placeholder::NoneAvailable)]
        }
        Ok(printers) => std::iter::once(PrinterChoice::Placeholder(Placeholder::ChoosePrinter))
            .chain(printers.iter().cloned().map(PrinterChoice::Printer))
            .collect(),
        Err(_) => vec![PrinterChoice::Placeholder(Placeholder::LoadFailed)],
    }
}

/// Fetches the printer directory. Never retries.
pub struct DirectoryClient {
    service: Arc<dyn PrintService>,
}

impl DirectoryClient {
    pub fn new(service: Arc<dyn PrintService>) -> Self {
        Self { service }
    }

    /// Fetch the printer names in service order, dropping blanks and repeats.
    pub async fn fetch(&self) -> Result<Vec<PrinterId>> {
        let printers = match self.service.list_printers().await? {
            DirectoryResponse::Printers(printers) => printers,
            DirectoryResponse::Error { error } => {
                warn!(%error, "printer directory reported an error");
                return Err(WebprintError::Application(error));
            }
        };

        let mut seen = HashSet::new();
        let mut unique = Vec::with_capacity(printers.len());
        for printer in printers {
            if printer.is_empty() {
                warn!("ignoring blank printer name in directory");
            } else if seen.insert(printer.clone()) {
                unique.push(printer);
            } else {
                warn!(printer = %printer, "ignoring duplicate printer name in directory");
            }
        }

        info!(count = unique.len(), "printer directory loaded");
        Ok(unique)
    }
}
