//! Structured error types for shelfdash
//!
//! Uses thiserror for ergonomic error definitions with automatic Display
//! and Error trait implementations.

use crate::overlay::{DialogKind, OverlayId};
use thiserror::Error;

/// Error returned by a dialog close hook
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the overlay managers
#[derive(Error, Debug)]
pub enum OverlayError {
    /// `close` named a dialog that is not tracked (retired or never opened)
    #[error("Unknown overlay request: {0}")]
    UnknownRequest(OverlayId),

    /// The dialog's close hook failed; the dialog stays open
    #[error("Close hook failed for {id}: {source}")]
    CloseHookFailure {
        id: OverlayId,
        #[source]
        source: HookError,
    },

    /// The close result does not fit the kind of dialog
    #[error("Result does not match {expected} dialog {id}")]
    ResultMismatch { id: OverlayId, expected: DialogKind },

    /// The completion was dropped without a result (context shut down)
    #[error("Dialog {0} was dismissed without a result")]
    Dismissed(OverlayId),
}

/// Errors from the book REST API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("{context} (HTTP {status})")]
    Status { status: u16, context: &'static str },

    /// No book with this id
    #[error("Book {0} not found")]
    NotFound(u64),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configured API URL is not usable
    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Convenience Result type for overlay operations
pub type Result<T> = std::result::Result<T, OverlayError>;
