// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Webprint job client.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, ValidationError};

/// Printer identifier as reported by the directory service.
///
/// Never generated locally; it is only ever copied out of a directory
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrinterId(String);

impl PrinterId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for PrinterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned to an accepted submission by the print service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The configurable print parameters a printer may expose.
///
/// Declaration order is the rendering order of the option form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OptionName {
    Media,
    Quality,
    Sides,
    PrintColorMode,
}

impl OptionName {
    pub const ALL: [OptionName; 4] = [
        Self::Media,
        Self::Quality,
        Self::Sides,
        Self::PrintColorMode,
    ];

    /// Multipart field name used when submitting a job.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Media => "media",
            Self::Quality => "quality",
            Self::Sides => "sides",
            Self::PrintColorMode => "print-color-mode",
        }
    }

    /// Label shown next to the option input.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Media => "Paper size",
            Self::Quality => "Print quality",
            Self::Sides => "Duplex",
            Self::PrintColorMode => "Colour mode",
        }
    }
}

impl std::fmt::Display for OptionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

impl FromStr for OptionName {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|name| name.field_name() == s)
            .ok_or_else(|| format!("unknown print option '{s}'"))
    }
}

/// Colour modes offered whenever a printer reports colour capability.
pub const COLOR_MODES: [&str; 2] = ["monochrome", "color"];

/// Permitted values per option for one printer.
///
/// Groups with no values are never stored, so every group present here is
/// renderable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSchema {
    groups: BTreeMap<OptionName, Vec<String>>,
}

impl OptionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a group. Empty value lists are dropped.
    pub fn insert_group(&mut self, name: OptionName, values: Vec<String>) {
        if values.is_empty() {
            self.groups.remove(&name);
        } else {
            self.groups.insert(name, values);
        }
    }

    /// Groups in rendering order.
    pub fn groups(&self) -> impl Iterator<Item = (OptionName, &[String])> {
        self.groups.iter().map(|(name, values)| (*name, values.as_slice()))
    }

    pub fn values(&self, name: OptionName) -> Option<&[String]> {
        self.groups.get(&name).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Check that `value` may be chosen for `name` on this printer.
    pub fn check(&self, name: OptionName, value: &str) -> std::result::Result<(), ValidationError> {
        let values = self
            .groups
            .get(&name)
            .ok_or(ValidationError::UnknownOption(name))?;
        if values.iter().any(|v| v == value) {
            Ok(())
        } else {
            Err(ValidationError::UnsupportedValue {
                name,
                value: value.to_string(),
            })
        }
    }
}

/// Chosen option values; an absent option means "use the printer default".
pub type OptionChoices = BTreeMap<OptionName, String>;

/// A document to upload, read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePayload {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FilePayload {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = Path::new(&name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(content_type_for_extension)
            .unwrap_or(OCTET_STREAM)
            .to_string();
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Read a document from disk.
    ///
    /// Files larger than `max_bytes` are refused from their metadata, before
    /// any content is read.
    pub fn from_path(path: impl AsRef<Path>, max_bytes: u64) -> Result<Self> {
        let path = path.as_ref();
        let size = std::fs::metadata(path)?.len();
        if size > max_bytes {
            return Err(ValidationError::FileTooLarge {
                size,
                limit: max_bytes,
            }
            .into());
        }
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "document".into());
        Ok(Self::new(name, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Hex-encoded SHA-256 of the payload bytes.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(&self.bytes))
    }
}

const OCTET_STREAM: &str = "application/octet-stream";

/// MIME type for the document formats the print service accepts.
pub fn content_type_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "txt" => "text/plain",
        _ => OCTET_STREAM,
    }
}

/// A validated job submission.
///
/// Only constructible through [`SubmissionRequest::new`], so a request
/// without a printer or without a file cannot exist.
#[derive(Debug, Clone)]
pub struct SubmissionRequest {
    printer: PrinterId,
    options: OptionChoices,
    copies: Option<u32>,
    file: FilePayload,
}

impl SubmissionRequest {
    /// Validate the form contents. The file is checked before the printer.
    pub fn new(
        printer: Option<PrinterId>,
        file: Option<FilePayload>,
        options: OptionChoices,
        copies: Option<u32>,
        max_upload_bytes: u64,
    ) -> std::result::Result<Self, ValidationError> {
        let file = file.ok_or(ValidationError::MissingFile)?;
        let printer = printer
            .filter(|p| !p.is_empty())
            .ok_or(ValidationError::MissingPrinter)?;
        if copies == Some(0) {
            return Err(ValidationError::InvalidCopies);
        }
        if file.size() > max_upload_bytes {
            return Err(ValidationError::FileTooLarge {
                size: file.size(),
                limit: max_upload_bytes,
            });
        }
        Ok(Self {
            printer,
            options,
            copies,
            file,
        })
    }

    pub fn printer(&self) -> &PrinterId {
        &self.printer
    }

    pub fn options(&self) -> &OptionChoices {
        &self.options
    }

    pub fn copies(&self) -> Option<u32> {
        self.copies
    }

    pub fn file(&self) -> &FilePayload {
        &self.file
    }

    pub fn into_parts(self) -> (PrinterId, OptionChoices, Option<u32>, FilePayload) {
        (self.printer, self.options, self.copies, self.file)
    }
}

/// Job states reported by the print service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobState {
    Pending,
    PendingHeld,
    Processing,
    Stopped,
    Canceled,
    Aborted,
    Completed,
    Unknown,
    /// Any state string the service reports that we have no name for.
    Other(String),
}

impl JobState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::PendingHeld => "pending_held",
            Self::Processing => "processing",
            Self::Stopped => "stopped",
            Self::Canceled => "canceled",
            Self::Aborted => "aborted",
            Self::Completed => "completed",
            Self::Unknown => "unknown",
            Self::Other(s) => s,
        }
    }

    /// No further change is expected after a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Canceled | Self::Aborted)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl From<&str> for JobState {
    fn from(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "pending_held" => Self::PendingHeld,
            "processing" => Self::Processing,
            "stopped" => Self::Stopped,
            "canceled" => Self::Canceled,
            "aborted" => Self::Aborted,
            "completed" => Self::Completed,
            "unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for JobState {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<JobState> for String {
    fn from(state: JobState) -> Self {
        state.as_str().to_string()
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One observation of a job's state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobStatus {
    pub state: JobState,
    pub reason: Option<String>,
}

impl JobStatus {
    pub fn new(state: JobState, reason: Option<String>) -> Self {
        Self { state, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pdf() -> FilePayload {
        FilePayload::new("report.pdf", b"%PDF-1.7".to_vec())
    }

    #[test]
    fn empty_groups_are_dropped() {
        let mut schema = OptionSchema::new();
        schema.insert_group(OptionName::Media, vec!["A4".into()]);
        schema.insert_group(OptionName::Quality, Vec::new());
        assert_eq!(schema.len(), 1);
        assert!(schema.values(OptionName::Quality).is_none());
    }

    #[test]
    fn groups_render_in_declaration_order() {
        let mut schema = OptionSchema::new();
        schema.insert_group(OptionName::PrintColorMode, vec!["color".into()]);
        schema.insert_group(OptionName::Media, vec!["A4".into()]);
        let order: Vec<_> = schema.groups().map(|(name, _)| name).collect();
        assert_eq!(order, vec![OptionName::Media, OptionName::PrintColorMode]);
    }

    #[test]
    fn schema_check_rejects_foreign_options() {
        let mut schema = OptionSchema::new();
        schema.insert_group(OptionName::Sides, vec!["one-sided".into()]);
        assert!(schema.check(OptionName::Sides, "one-sided").is_ok());
        assert_eq!(
            schema.check(OptionName::Media, "A4"),
            Err(ValidationError::UnknownOption(OptionName::Media))
        );
        assert!(matches!(
            schema.check(OptionName::Sides, "two-sided-long-edge"),
            Err(ValidationError::UnsupportedValue { .. })
        ));
    }

    #[test]
    fn option_names_parse_from_field_names() {
        assert_eq!(
            "print-color-mode".parse::<OptionName>(),
            Ok(OptionName::PrintColorMode)
        );
        assert!("copies".parse::<OptionName>().is_err());
    }

    #[test]
    fn submission_requires_file_first() {
        let err = SubmissionRequest::new(None, None, OptionChoices::new(), None, 1024).unwrap_err();
        assert_eq!(err, ValidationError::MissingFile);
    }

    #[test]
    fn submission_requires_printer() {
        let err =
            SubmissionRequest::new(None, Some(pdf()), OptionChoices::new(), None, 1024).unwrap_err();
        assert_eq!(err, ValidationError::MissingPrinter);

        let err = SubmissionRequest::new(
            Some(PrinterId::new("")),
            Some(pdf()),
            OptionChoices::new(),
            None,
            1024,
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::MissingPrinter);
    }

    #[test]
    fn submission_rejects_zero_copies_and_oversize_files() {
        let printer = Some(PrinterId::new("office"));
        let err = SubmissionRequest::new(printer.clone(), Some(pdf()), OptionChoices::new(), Some(0), 1024)
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidCopies);

        let err = SubmissionRequest::new(printer, Some(pdf()), OptionChoices::new(), None, 4).unwrap_err();
        assert_eq!(err, ValidationError::FileTooLarge { size: 8, limit: 4 });
    }

    #[test]
    fn terminal_states_are_exactly_three() {
        for state in ["completed", "canceled", "aborted"] {
            assert!(JobState::from(state).is_terminal(), "{state}");
        }
        for state in ["pending", "pending_held", "processing", "stopped", "unknown", "held-for-review"] {
            assert!(!JobState::from(state).is_terminal(), "{state}");
        }
        assert!(JobState::Completed.is_success());
        assert!(!JobState::Canceled.is_success());
    }

    #[test]
    fn unrecognised_states_keep_their_text() {
        let state: JobState = serde_json::from_str("\"held-for-review\"").unwrap();
        assert_eq!(state, JobState::Other("held-for-review".into()));
        assert_eq!(serde_json::to_string(&state).unwrap(), "\"held-for-review\"");
    }

    #[test]
    fn payload_content_type_follows_extension() {
        assert_eq!(pdf().content_type, "application/pdf");
        assert_eq!(FilePayload::new("scan.JPG", vec![]).content_type, "image/jpeg");
        assert_eq!(FilePayload::new("notes", vec![]).content_type, "application/octet-stream");
    }

    #[test]
    fn payload_from_path_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("letter.txt");
        std::fs::write(&path, b"hello").unwrap();

        let payload = FilePayload::from_path(&path, 1024).unwrap();
        assert_eq!(payload.name, "letter.txt");
        assert_eq!(payload.content_type, "text/plain");
        assert_eq!(payload.bytes, b"hello");
        assert_eq!(
            payload.digest(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn oversized_file_is_refused_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("poster.pdf");
        std::fs::write(&path, vec![0u8; 2048]).unwrap();

        let err = FilePayload::from_path(&path, 1024).unwrap_err();
        assert!(matches!(
            err,
            crate::error::WebprintError::Validation(ValidationError::FileTooLarge {
                size: 2048,
                limit: 1024
            })
        ));
        assert!(FilePayload::from_path(&path, 2048).is_ok());
    }
}
