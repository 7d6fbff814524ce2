// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Webprint.

use thiserror::Error;

use crate::types::{JobId, JobState, OptionName};

/// Top-level error type for all Webprint operations.
#[derive(Debug, Error)]
pub enum WebprintError {
    // -- Caught locally, before any request is issued --
    #[error("invalid submission: {0}")]
    Validation(#[from] ValidationError),

    // -- Reported by the print service --
    #[error("print service error: {0}")]
    Application(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("job {job} ended in state {state}")]
    JobEnded { job: JobId, state: JobState },

    // -- Local setup --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Problems with a submission that are detected without touching the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no file attached")]
    MissingFile,

    #[error("no printer selected")]
    MissingPrinter,

    #[error("option {0} is not offered by the selected printer")]
    UnknownOption(OptionName),

    #[error("value '{value}' is not permitted for option {name}")]
    UnsupportedValue { name: OptionName, value: String },

    #[error("copies must be at least 1")]
    InvalidCopies,

    #[error("file is {size} bytes, the upload limit is {limit} bytes")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("a print job is already being tracked")]
    SubmissionInProgress,
}

/// Coarse classification used to pick how an error is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Fixable by the user before resubmitting.
    Validation,
    /// Well-formed error payload from the server; shown verbatim.
    Application,
    /// Network failure or unparsable response; shown generically.
    Transport,
    /// The job reached `canceled` or `aborted`.
    ProtocolExhaustion,
    /// Local configuration or filesystem problem.
    Local,
}

impl WebprintError {
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) => ErrorClass::Validation,
            Self::Application(_) => ErrorClass::Application,
            Self::Transport(_) | Self::Serialization(_) => ErrorClass::Transport,
            Self::JobEnded { .. } => ErrorClass::ProtocolExhaustion,
            Self::Config(_) | Self::Io(_) => ErrorClass::Local,
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, WebprintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_convert() {
        let err: WebprintError = ValidationError::MissingFile.into();
        assert_eq!(err.class(), ErrorClass::Validation);
        assert_eq!(err.to_string(), "invalid submission: no file attached");
    }

    #[test]
    fn job_ended_is_protocol_exhaustion() {
        let err = WebprintError::JobEnded {
            job: JobId::new("7"),
            state: JobState::Aborted,
        };
        assert_eq!(err.class(), ErrorClass::ProtocolExhaustion);
        assert_eq!(err.to_string(), "job 7 ended in state aborted");
    }

    #[test]
    fn unparsable_json_is_transport() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(WebprintError::from(parse).class(), ErrorClass::Transport);
    }
}
