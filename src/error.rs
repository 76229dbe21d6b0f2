//! Error types for the docintel2md library.
//!
//! Every failure is returned as a [`DocIntelError`]; nothing is printed by the
//! library itself. Callers that only care about the broad class of failure
//! (no input, missing file, remote service) use [`DocIntelError::kind`].

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the docintel2md library.
#[derive(Debug, Error)]
pub enum DocIntelError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Neither a file path nor a document URL was supplied.
    #[error("No document given.\nPlease provide either a file path or a document URL.")]
    MissingInput,

    /// Input file was not found at the given path.
    #[error("File not found at '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// The input cannot be used for the requested operation.
    #[error("Invalid input '{input}': {reason}")]
    InvalidInput { input: String, reason: String },

    // ── Service errors ────────────────────────────────────────────────────
    /// Document Intelligence rejected the request or the analysis failed.
    #[error("Document Intelligence error{}: {message}", .code.as_deref().map(|c| format!(" ({c})")).unwrap_or_default())]
    ServiceError {
        code: Option<String>,
        message: String,
    },

    /// The service returned 401/403; a retry will not help.
    #[error("Authentication error from '{service}': {detail}\nCheck the endpoint and key.")]
    AuthError { service: String, detail: String },

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The LLM provider could not be created (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The LLM API call failed.
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not read an input file that exists.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of a [`DocIntelError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No file path and no URL were given.
    MissingInput,
    /// A local file path was given but nothing exists there.
    FileNotFound,
    /// The OCR or LLM service failed or rejected the call.
    ServiceError,
    /// Anything else: configuration, local I/O, internal.
    Other,
}

impl DocIntelError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DocIntelError::MissingInput => ErrorKind::MissingInput,
            DocIntelError::FileNotFound { .. } => ErrorKind::FileNotFound,
            DocIntelError::ServiceError { .. }
            | DocIntelError::AuthError { .. }
            | DocIntelError::ProviderNotConfigured { .. }
            | DocIntelError::LlmApiError { .. } => ErrorKind::ServiceError,
            DocIntelError::InvalidInput { .. }
            | DocIntelError::OutputWriteFailed { .. }
            | DocIntelError::ReadFailed { .. }
            | DocIntelError::InvalidConfig(_)
            | DocIntelError::Internal(_) => ErrorKind::Other,
        }
    }

    pub(crate) fn service(message: impl Into<String>) -> Self {
        DocIntelError::ServiceError {
            code: None,
            message: message.into(),
        }
    }
}
