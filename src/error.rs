//! Error taxonomy for document synthesis.
//!
//! Every failure aborts the artifact being built. The assembler wraps the
//! underlying [`FormsError`] in a [`SynthesisError`] so callers can tell which
//! application and document kind failed.

use std::path::PathBuf;
use thiserror::Error;

use crate::assembler::DocumentKind;

/// A domain value could not be rendered into the shape its field requires.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    #[error("field '{field}': expected exactly {expected} characters, got {actual} ('{value}')")]
    WidthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
        value: String,
    },
    #[error("field '{field}': amount {value} cannot be written as a number cell")]
    NotRepresentable { field: &'static str, value: String },
    #[error("field '{field}': {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Template file missing, corrupt, or the row expansion failed.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {path} not found")]
    Missing { path: PathBuf },
    #[error("template {path} is not a regular file")]
    NotAFile { path: PathBuf },
    #[error("failed to read template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("template {path} could not be parsed: {message}")]
    Corrupt { path: PathBuf, message: String },
    #[error("sheet '{sheet}' missing from template")]
    MissingSheet { sheet: String },
    #[error("failed to expand calculation table: {0}")]
    Expansion(String),
    #[error("failed to prepare render directory: {0}")]
    TempDir(#[source] std::io::Error),
    #[error("failed to write Typst source: {0}")]
    WriteTypst(#[source] std::io::Error),
    #[error("Typst CLI execution failed: {0}")]
    TypstIo(#[source] std::io::Error),
    #[error("Typst CLI exited with status {code}: {stderr}")]
    TypstExit { code: i32, stderr: String },
    #[error("failed to read generated PDF: {0}")]
    ReadPdf(#[source] std::io::Error),
    #[error("failed to encode QR code: {0}")]
    QrCode(String),
}

/// An external collaborator (timetable, upload area) failed.
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("timetable request '{method}' failed: {message}")]
    Timetable { method: String, message: String },
    #[error("timetable session is not authenticated")]
    NotAuthenticated,
    #[error("timetable response id {got} does not match request id {expected}")]
    IdMismatch { expected: String, got: String },
    #[error("no timetable entry named '{0}'")]
    UnknownSubject(String),
    #[error("upload area {path}: {message}")]
    Upload { path: PathBuf, message: String },
}

impl CollaboratorError {
    pub(crate) fn timetable(method: &str, message: impl ToString) -> Self {
        Self::Timetable {
            method: method.to_string(),
            message: message.to_string(),
        }
    }
}

/// Top level error returned by every engine operation.
#[derive(Debug, Error)]
pub enum FormsError {
    #[error("unsupported document kind '{kind}': {reason}")]
    UnsupportedKind { kind: String, reason: String },
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FormsError {
    pub(crate) fn unsupported(kind: impl ToString, reason: impl ToString) -> Self {
        Self::UnsupportedKind {
            kind: kind.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Output {
            path: path.into(),
            source,
        }
    }
}

/// Failure of one `synthesize` call, tagged with the entity and kind.
#[derive(Debug, Error)]
#[error("{kind} for application {entity} failed: {source}")]
pub struct SynthesisError {
    pub entity: String,
    pub kind: DocumentKind,
    #[source]
    pub source: FormsError,
}

impl SynthesisError {
    /// The underlying engine error.
    pub fn cause(&self) -> &FormsError {
        &self.source
    }
}

pub type Result<T, E = FormsError> = std::result::Result<T, E>;
