//! Error types for the API client

use serde::Deserialize;
use thiserror::Error;

/// The four calls the client makes, used to pick fallback messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Update,
    Delete,
}

impl Operation {
    /// Message used when the server gives no detail
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Operation::List => "Failed to fetch issues",
            Operation::Create => "Failed to create issue",
            Operation::Update => "Failed to update issue",
            Operation::Delete => "Failed to delete issue",
        }
    }

    /// Prefix for the alert shown when the operation fails
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            Operation::List => "Failed to load issues",
            Operation::Create => "Failed to create issue",
            Operation::Update => "Failed to update issue",
            Operation::Delete => "Failed to delete issue",
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never completed
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{message}")]
    Server {
        status: reqwest::StatusCode,
        message: String,
    },

    /// A success response whose body was not what we expected
    #[error("Invalid response from server: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// reqwest rejected the client settings
    #[error("Failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            ClientError::Server { status, .. } => Some(*status),
            ClientError::Network(e) | ClientError::Decode(e) => e.status(),
            ClientError::InvalidUrl(_) | ClientError::Build(_) => None,
        }
    }
}

/// Error body shape: `{"detail": ...}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Pull a human-readable message out of an error response body.
///
/// `detail` is either a plain string or a list of validation entries that
/// each carry a `msg`.
pub(crate) fn detail_message(body: &str) -> Option<String> {
    let body: ErrorBody = serde_json::from_str(body).ok()?;
    match body.detail? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
        serde_json::Value::Array(entries) => {
            let messages: Vec<&str> = entries
                .iter()
                .filter_map(|entry| entry.get("msg").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
