// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Option schema resolution.
//
// Fetches what a printer supports and turns it into the option groups the
// form renders.  The colour group is never taken from the server: when the
// printer reports colour capability we offer the fixed pair
// `monochrome`/`color`.

use std::sync::Arc;

use tracing::{debug, warn};

use webprint_core::error::{Result, ValidationError, WebprintError};
use webprint_core::types::{COLOR_MODES, OptionName, OptionSchema, PrinterId};

use crate::service::{OptionsResponse, PrintService, is_truthy};

/// Build the renderable schema from a successful options response.
///
/// Groups with no values are dropped.
pub fn schema_from_response(response: OptionsResponse) -> OptionSchema {
    let mut schema = OptionSchema::new();
    schema.insert_group(OptionName::Media, response.media.unwrap_or_default());
    schema.insert_group(OptionName::Quality, response.quality.unwrap_or_default());
    schema.insert_group(OptionName::Sides, response.sides.unwrap_or_default());

    if response.color_mode.as_ref().is_some_and(is_truthy) {
        schema.insert_group(
            OptionName::PrintColorMode,
            COLOR_MODES.iter().map(|m| m.to_string()).collect(),
        );
    }
    schema
}

/// Resolves the option schema for one printer.
pub struct OptionResolver {
    service: Arc<dyn PrintService>,
}

impl OptionResolver {
    pub fn new(service: Arc<dyn PrintService>) -> Self {
        Self { service }
    }

    /// Fetch and build the schema for `printer`.
    ///
    /// A non-empty `error` field in the response fails the whole resolution
    /// even if option lists are present alongside it.
    pub async fn resolve(&self, printer: &PrinterId) -> Result<OptionSchema> {
        if printer.is_empty() {
            return Err(ValidationError::MissingPrinter.into());
        }

        let mut response = self.service.printer_options(printer).await?;
        if let Some(error) = response.error.take().filter(|e| !e.is_empty()) {
            warn!(printer = %printer, %error, "option lookup rejected by print service");
            return Err(WebprintError::Application(error));
        }

        let schema = schema_from_response(response);
        debug!(printer = %printer, groups = schema.len(), "option schema resolved");
        Ok(schema)
    }
}
