//! # Framework Errors
//!
//! This module defines the common error types used throughout the view framework.
//! By centralizing error definitions, every component, the broker and the
//! persistence adapter report failures the same way.

/// Error returned by a broker handler.
///
/// Handlers are plain closures, so the error is just a message. The broker
/// wraps it into [`FrameworkError::HandlerFailed`] together with the event type.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl From<String> for HandlerError {
    fn from(msg: String) -> Self {
        HandlerError(msg)
    }
}

impl From<&str> for HandlerError {
    fn from(msg: &str) -> Self {
        HandlerError(msg.to_string())
    }
}

/// Errors that can occur within the view framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// A broker handler failed; remaining handlers of that publish were skipped.
    #[error("Handler for `{event_type}` failed: {source}")]
    HandlerFailed {
        event_type: String,
        #[source]
        source: HandlerError,
    },

    #[error("Storage I/O error for key `{key}`: {source}")]
    Storage {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Render error: {0}")]
    Render(String),
}
