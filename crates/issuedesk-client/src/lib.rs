//! issuedesk-client: REST client for the issues endpoint
//!
//! One request per call, JSON in and out, no retries. Failures come back as
//! [`ClientError`] values carrying a message fit to show the user.

pub mod client;
pub mod error;

pub use client::{ApiClient, IssueApi};
pub use error::{ClientError, Operation};
pub use reqwest::StatusCode;

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
