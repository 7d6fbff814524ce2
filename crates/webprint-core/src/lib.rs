// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Webprint: core types, errors and status messages shared across all crates.

pub mod config;
pub mod error;
pub mod status;
pub mod types;

pub use config::ClientConfig;
pub use error::{Result, ValidationError, WebprintError};
pub use status::{StatusKind, StatusMessage, StatusSurface};
pub use types::*;
