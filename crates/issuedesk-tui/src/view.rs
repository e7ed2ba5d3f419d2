//! View model for the issue list
//!
//! Rows keep the raw text; each renderer applies its own escaping when it
//! writes the text out (terminal sanitizing in `ui`, HTML escaping here).

use issuedesk_core::format::{escape_html, format_label, short_id};
use issuedesk_core::{Issue, Priority, Status};
use std::fmt::Write;

pub const EMPTY_TITLE: &str = "No Issues Found";
pub const EMPTY_TEXT: &str = "Nothing matches. Change the filters or create an issue.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Wire value, used as the style key
    pub value: &'static str,
    pub label: String,
}

impl Badge {
    fn new(value: &'static str) -> Self {
        Self {
            value,
            label: format_label(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueRow {
    /// Full id; the edit and delete actions of the row target it
    pub id: String,
    pub short_id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub status_badge: Badge,
    pub priority: Priority,
    pub priority_badge: Badge,
}

impl IssueRow {
    pub fn from_issue(issue: &Issue) -> Self {
        Self {
            id: issue.id.clone(),
            short_id: short_id(&issue.id).to_string(),
            title: issue.title.clone(),
            description: issue.description.clone(),
            status: issue.status,
            status_badge: Badge::new(issue.status.as_str()),
            priority: issue.priority,
            priority_badge: Badge::new(issue.priority.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueListView {
    Empty,
    Rows(Vec<IssueRow>),
}

impl IssueListView {
    pub fn build(issues: &[&Issue]) -> Self {
        if issues.is_empty() {
            IssueListView::Empty
        } else {
            IssueListView::Rows(issues.iter().map(|i| IssueRow::from_issue(i)).collect())
        }
    }

    pub fn rows(&self) -> &[IssueRow] {
        match self {
            IssueListView::Empty => &[],
            IssueListView::Rows(rows) => rows,
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = String::new();
        match self {
            IssueListView::Empty => {
                let _ = writeln!(
                    html,
                    "<div class=\"no-issues\">\n  <div class=\"no-issues-title\">{}</div>\n  <p class=\"no-issues-text\">{}</p>\n</div>",
                    EMPTY_TITLE, EMPTY_TEXT
                );
            }
            IssueListView::Rows(rows) => {
                for row in rows {
                    write_row_html(&mut html, row);
                }
            }
        }
        html
    }
}

fn write_row_html(html: &mut String, row: &IssueRow) {
    let id = escape_html(&row.id);
    let _ = writeln!(html, "<div class=\"issue-item\" data-id=\"{}\">", id);
    let _ = writeln!(html, "  <div class=\"issue-header\">");
    let _ = writeln!(
        html,
        "    <span class=\"issue-id\">#{}</span>",
        escape_html(&row.short_id)
    );
    let _ = writeln!(
        html,
        "    <h3 class=\"issue-title\">{}</h3>",
        escape_html(&row.title)
    );
    let _ = writeln!(html, "  </div>");
    let _ = writeln!(
        html,
        "  <p class=\"issue-description\">{}</p>",
        escape_html(&row.description)
    );
    let _ = writeln!(
        html,
        "  <div class=\"issue-meta\"><span class=\"badge badge-status {}\">{}</span><span class=\"badge badge-priority {}\">{}</span></div>",
        row.status_badge.value,
        row.status_badge.label,
        row.priority_badge.value,
        row.priority_badge.label
    );
    let _ = writeln!(
        html,
        "  <div class=\"issue-actions\"><button data-action=\"edit\" data-id=\"{id}\">Edit</button><button data-action=\"delete\" data-id=\"{id}\">Delete</button></div>"
    );
    let _ = writeln!(html, "</div>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(id: &str, title: &str) -> Issue {
        Issue {
            id: id.into(),
            title: title.into(),
            description: "Steps: open & click".into(),
            priority: Priority::High,
            status: Status::InProgress,
        }
    }

    #[test]
    fn test_empty_sequence_gives_placeholder() {
        let view = IssueListView::build(&[]);
        assert_eq!(view, IssueListView::Empty);
        assert!(view.rows().is_empty());
        assert!(view.to_html().contains(EMPTY_TITLE));
    }

    #[test]
    fn test_row_fields() {
        let issue = issue("0123456789abcdef", "Crash");
        let view = IssueListView::build(&[&issue]);
        let row = &view.rows()[0];
        assert_eq!(row.id, "0123456789abcdef");
        assert_eq!(row.short_id, "01234567");
        assert_eq!(row.status_badge.label, "In Progress");
        assert_eq!(row.status_badge.value, "in_progress");
        assert_eq!(row.priority_badge.label, "High");
    }

    #[test]
    fn test_html_escapes_user_text() {
        let issue = issue("a1", "<script>alert('x')</script>");
        let html = IssueListView::build(&[&issue]).to_html();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"));
        assert!(html.contains("Steps: open &amp; click"));
        assert!(html.contains("#a1"));
        assert!(html.contains("badge-status in_progress\">In Progress"));
        assert!(html.contains("data-action=\"delete\" data-id=\"a1\""));
    }

    #[test]
    fn test_rows_follow_input_order() {
        let a = issue("a", "A");
        let b = issue("b", "B");
        let view = IssueListView::build(&[&b, &a]);
        let ids: Vec<_> = view.rows().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["b", "a"]);
    }
}
