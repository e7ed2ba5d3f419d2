//! Issue data model for issuedesk
//!
//! Mirrors the JSON records served by the issues endpoint. The server owns
//! `id` and the initial `status`; everything else comes from the user.

use serde::{Deserialize, Serialize};

/// Issue status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Open,
    InProgress,
    Closed,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Open, Status::InProgress, Status::Closed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::InProgress => "in_progress",
            Status::Closed => "closed",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(Status::Open),
            "in_progress" | "in-progress" | "inprogress" => Ok(Status::InProgress),
            "closed" => Ok(Status::Closed),
            _ => Err(crate::Error::InvalidStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Issue priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(crate::Error::InvalidPriority(s.to_string())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An issue as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Server-assigned identifier, immutable after creation
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {} - {}",
            self.id, self.priority, self.status, self.title
        )
    }
}

/// Body of a create request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl NewIssue {
    /// Build a create payload from raw form input.
    ///
    /// Title and description are trimmed and must be non-empty.
    pub fn from_input(title: &str, description: &str, priority: Priority) -> crate::Result<Self> {
        let (title, description) = validate_required(title, description)?;
        Ok(Self {
            title,
            description,
            priority,
        })
    }
}

/// Body of an update request; a full replacement of the editable fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueUpdate {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
}

impl IssueUpdate {
    /// Build an update payload from raw form input, with the same
    /// required-field rules as [`NewIssue::from_input`].
    pub fn from_input(
        title: &str,
        description: &str,
        priority: Priority,
        status: Status,
    ) -> crate::Result<Self> {
        let (title, description) = validate_required(title, description)?;
        Ok(Self {
            title,
            description,
            priority,
            status,
        })
    }
}

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

/// Trim title and description and reject either being empty.
pub fn validate_required(title: &str, description: &str) -> crate::Result<(String, String)> {
    let title = title.trim();
    let description = description.trim();
    if title.is_empty() || description.is_empty() {
        return Err(crate::Error::Validation(REQUIRED_FIELDS_MESSAGE.to_string()));
    }
    Ok((title.to_string(), description.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!("open".parse::<Status>().unwrap(), Status::Open);
        assert_eq!("In-Progress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!("inprogress".parse::<Status>().unwrap(), Status::InProgress);
        assert_eq!(Status::InProgress.to_string(), "in_progress");
        assert!("blocked".parse::<Status>().is_err());
    }

    #[test]
    fn test_priority_parse_and_display() {
        assert_eq!("HIGH".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(Priority::Low.to_string(), "low");
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_issue_wire_format() {
        let json = r#"{"id":"3f2a9c1e-aaaa","title":"Crash","description":"On save","priority":"high","status":"in_progress"}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.priority, Priority::High);
        assert_eq!(issue.status, Status::InProgress);

        let update = IssueUpdate {
            title: "t".into(),
            description: "d".into(),
            priority: Priority::Low,
            status: Status::Closed,
        };
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(value["status"], "closed");
        assert_eq!(value["priority"], "low");
    }

    #[test]
    fn test_validate_required_trims() {
        let (title, description) = validate_required("  Bug  ", "\tdetails\n").unwrap();
        assert_eq!(title, "Bug");
        assert_eq!(description, "details");
    }

    #[test]
    fn test_validate_required_rejects_blank_fields() {
        for (title, description) in [("", "d"), ("t", ""), ("   ", "d"), ("t", " \n ")] {
            let err = validate_required(title, description).unwrap_err();
            assert!(matches!(err, crate::Error::Validation(_)));
            assert_eq!(err.to_string(), REQUIRED_FIELDS_MESSAGE);
        }
    }

    #[test]
    fn test_new_issue_from_input() {
        let new = NewIssue::from_input(" Title ", " Body ", Priority::High).unwrap();
        assert_eq!(new.title, "Title");
        assert_eq!(new.description, "Body");
        assert!(NewIssue::from_input("", "Body", Priority::Low).is_err());
    }
}
