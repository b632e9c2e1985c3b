//! Error types for the Inferview library.

use std::path::PathBuf;

use serde_json::Value;
use thiserror::Error;

/// Shown when a request was sent but nothing came back.
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check your connection.";

/// Shown for server-side failures that carry no usable message.
pub const SERVER_ERROR_MESSAGE: &str = "Internal server error. Please try again later.";

/// Shown when a fetched analysis does not exist.
pub const NOT_FOUND_MESSAGE: &str = "The requested analysis could not be found.";

/// Shown when a non-CSV file is selected for upload.
pub const CSV_ONLY_MESSAGE: &str = "Only CSV files are supported";

/// Main error type for Inferview operations.
#[derive(Debug, Error)]
pub enum InferviewError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error talking to the inference service.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A workflow transition was refused.
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

/// Result type alias for Inferview operations.
pub type Result<T> = std::result::Result<T, InferviewError>;

/// A candidate file was rejected before any request was made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{file_name}' is not a CSV file")]
pub struct ValidationError {
    pub file_name: String,
    pub media_type: Option<String>,
}

/// Refused workflow transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// The selected file did not pass the CSV filter.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Submit was requested with nothing selected.
    #[error("Please select a file first")]
    NoFileSelected,

    /// A submission is in flight.
    #[error("a submission is already in progress")]
    Busy,
}

/// Failure talking to the inference service.
///
/// Cloneable so a mock service can hand out the same failure repeatedly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The request was sent but no response arrived.
    #[error("no response from server: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Http { status: u16, body: Option<Value> },

    /// The requested analysis does not exist.
    #[error("analysis '{id}' not found")]
    NotFound { id: String },

    /// The response body did not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request could not be built or sent for a non-network reason.
    #[error("request failed: {0}")]
    Request(String),
}

impl ServiceError {
    /// Returns true if this error should route to a "not found" view.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound { .. })
    }

    /// Derive the message shown to the user.
    ///
    /// For HTTP failures the body's `error` field wins, then its `message`
    /// field, then a fixed message for 5xx statuses, then `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ServiceError::Network(_) => NO_RESPONSE_MESSAGE.to_string(),
            ServiceError::Http { status, body } => body
                .as_ref()
                .and_then(|b| body_field(b, "error").or_else(|| body_field(b, "message")))
                .unwrap_or_else(|| {
                    if (500..600).contains(status) {
                        SERVER_ERROR_MESSAGE.to_string()
                    } else {
                        fallback.to_string()
                    }
                }),
            ServiceError::NotFound { .. } => NOT_FOUND_MESSAGE.to_string(),
            ServiceError::MalformedResponse(_) => fallback.to_string(),
            ServiceError::Request(msg) if !msg.trim().is_empty() => msg.clone(),
            ServiceError::Request(_) => fallback.to_string(),
        }
    }
}

/// A non-empty string field of a JSON object body.
fn body_field(body: &Value, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
