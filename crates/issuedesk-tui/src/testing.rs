//! In-memory `IssueApi` for tests

use async_trait::async_trait;
use issuedesk_client::{ClientError, IssueApi, StatusCode};
use issuedesk_core::{Issue, IssueUpdate, NewIssue, Priority, Status};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeApi {
    issues: Mutex<Vec<Issue>>,
    /// `list_issues` never completes, like a server that accepts and hangs
    pub stall_list: bool,
}

impl FakeApi {
    pub fn with_issues(issues: Vec<Issue>) -> Self {
        Self {
            issues: Mutex::new(issues),
            stall_list: false,
        }
    }

    pub fn stalled() -> Self {
        Self {
            stall_list: true,
            ..Self::default()
        }
    }
}

pub fn issue(id: &str, status: Status, priority: Priority) -> Issue {
    Issue {
        id: id.into(),
        title: format!("Title {id}"),
        description: format!("Description {id}"),
        priority,
        status,
    }
}

fn not_found() -> ClientError {
    ClientError::Server {
        status: StatusCode::NOT_FOUND,
        message: "not found".into(),
    }
}

#[async_trait]
impl IssueApi for FakeApi {
    async fn list_issues(&self) -> issuedesk_client::Result<Vec<Issue>> {
        if self.stall_list {
            std::future::pending::<()>().await;
        }
        Ok(self.issues.lock().unwrap().clone())
    }

    async fn create_issue(&self, payload: &NewIssue) -> issuedesk_client::Result<Issue> {
        let mut issues = self.issues.lock().unwrap();
        let issue = Issue {
            id: format!("id-{}", issues.len() + 1),
            title: payload.title.clone(),
            description: payload.description.clone(),
            priority: payload.priority,
            status: Status::Open,
        };
        issues.push(issue.clone());
        Ok(issue)
    }

    async fn update_issue(
        &self,
        id: &str,
        payload: &IssueUpdate,
    ) -> issuedesk_client::Result<Issue> {
        let mut issues = self.issues.lock().unwrap();
        let issue = issues.iter_mut().find(|i| i.id == id).ok_or_else(not_found)?;
        issue.title = payload.title.clone();
        issue.description = payload.description.clone();
        issue.priority = payload.priority;
        issue.status = payload.status;
        Ok(issue.clone())
    }

    async fn delete_issue(&self, id: &str) -> issuedesk_client::Result<()> {
        let mut issues = self.issues.lock().unwrap();
        let before = issues.len();
        issues.retain(|i| i.id != id);
        if issues.len() == before {
            return Err(not_found());
        }
        Ok(())
    }
}
