//! issuedesk-core: Core library for the issuedesk client
//!
//! Data model, in-memory store, filtering and display helpers shared by the
//! API client and the terminal UI. Nothing here touches the network.

pub mod config;
pub mod error;
pub mod filter;
pub mod format;
pub mod issue;
pub mod store;

pub use config::{Config, UiConfig};
pub use error::Error;
pub use filter::IssueFilter;
pub use issue::{Issue, IssueUpdate, NewIssue, Priority, Status, validate_required};
pub use store::{IssueStats, IssueStore};

/// Result type for issuedesk operations
pub type Result<T> = std::result::Result<T, Error>;
