//! In-memory issue store
//!
//! Holds the issues fetched for the current session, in server order. It is
//! only ever mutated after the server has confirmed a change.

use crate::{Issue, Status};
use std::collections::HashSet;

/// Ordered, id-unique collection of issues
#[derive(Debug, Clone, Default)]
pub struct IssueStore {
    issues: Vec<Issue>,
}

/// Aggregate counts over the whole store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct IssueStats {
    pub open: usize,
    pub in_progress: usize,
    pub closed: usize,
    pub total: usize,
}

impl IssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection with a fresh server listing.
    ///
    /// Later records repeating an id already seen are dropped.
    pub fn replace_all(&mut self, issues: Vec<Issue>) {
        let mut seen = HashSet::new();
        self.issues = issues
            .into_iter()
            .filter(|issue| seen.insert(issue.id.clone()))
            .collect();
    }

    /// Append a newly created issue.
    ///
    /// If the id is already present the existing record is replaced in place.
    pub fn append(&mut self, issue: Issue) {
        match self.position(&issue.id) {
            Some(index) => self.issues[index] = issue,
            None => self.issues.push(issue),
        }
    }

    /// Replace the record with the same id. Returns false if no such record.
    pub fn replace(&mut self, issue: Issue) -> bool {
        match self.position(&issue.id) {
            Some(index) => {
                self.issues[index] = issue;
                true
            }
            None => false,
        }
    }

    /// Remove the record with the given id. Returns false if no such record.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.issues.len();
        self.issues.retain(|issue| issue.id != id);
        self.issues.len() != before
    }

    pub fn get(&self, id: &str) -> Option<&Issue> {
        self.issues.iter().find(|issue| issue.id == id)
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// Counts by status over every issue, ignoring any active filter
    pub fn stats(&self) -> IssueStats {
        let mut stats = IssueStats {
            total: self.issues.len(),
            ..IssueStats::default()
        };
        for issue in &self.issues {
            match issue.status {
                Status::Open => stats.open += 1,
                Status::InProgress => stats.in_progress += 1,
                Status::Closed => stats.closed += 1,
            }
        }
        stats
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.issues.iter().position(|issue| issue.id == id)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::Priority;

    pub(crate) fn issue(id: &str, status: Status, priority: Priority) -> Issue {
        Issue {
            id: id.to_string(),
            title: format!("Issue {id}"),
            description: format!("Description of {id}"),
            priority,
            status,
        }
    }

    fn ids(store: &IssueStore) -> Vec<&str> {
        store.issues().iter().map(|i| i.id.as_str()).collect()
    }

    #[test]
    fn test_replace_all_keeps_server_order_and_drops_duplicates() {
        let mut store = IssueStore::new();
        store.replace_all(vec![
            issue("b", Status::Open, Priority::Low),
            issue("a", Status::Open, Priority::Low),
            issue("b", Status::Closed, Priority::High),
        ]);
        assert_eq!(ids(&store), ["b", "a"]);
        assert_eq!(store.get("b").unwrap().status, Status::Open);
    }

    #[test]
    fn test_append_goes_to_end() {
        let mut store = IssueStore::new();
        store.replace_all(vec![issue("a", Status::Open, Priority::Low)]);
        store.append(issue("z", Status::Open, Priority::High));
        store.append(issue("m", Status::Open, Priority::High));
        assert_eq!(ids(&store), ["a", "z", "m"]);
    }

    #[test]
    fn test_append_existing_id_replaces_in_place() {
        let mut store = IssueStore::new();
        store.replace_all(vec![
            issue("a", Status::Open, Priority::Low),
            issue("b", Status::Open, Priority::Low),
        ]);
        store.append(issue("a", Status::Closed, Priority::Low));
        assert_eq!(ids(&store), ["a", "b"]);
        assert_eq!(store.get("a").unwrap().status, Status::Closed);
    }

    #[test]
    fn test_replace_matches_by_id() {
        let mut store = IssueStore::new();
        store.replace_all(vec![
            issue("a", Status::Open, Priority::Low),
            issue("b", Status::Open, Priority::Low),
        ]);
        let mut updated = issue("b", Status::InProgress, Priority::High);
        updated.title = "Renamed".into();
        assert!(store.replace(updated));
        assert_eq!(ids(&store), ["a", "b"]);
        assert_eq!(store.get("b").unwrap().title, "Renamed");

        assert!(!store.replace(issue("missing", Status::Open, Priority::Low)));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut store = IssueStore::new();
        store.replace_all(vec![
            issue("a", Status::Open, Priority::Low),
            issue("b", Status::Open, Priority::Low),
        ]);
        assert!(store.remove("a"));
        assert!(store.get("a").is_none());
        assert!(!store.remove("a"));
        assert_eq!(ids(&store), ["b"]);
    }

    #[test]
    fn test_stats_scenario() {
        let mut store = IssueStore::new();
        store.replace_all(vec![
            issue("a1", Status::Open, Priority::High),
            issue("a2", Status::Closed, Priority::Low),
        ]);
        assert_eq!(
            store.stats(),
            IssueStats {
                open: 1,
                in_progress: 0,
                closed: 1,
                total: 2
            }
        );
    }

    #[test]
    fn test_stats_always_sum_to_total() {
        let mut store = IssueStore::new();
        let check = |store: &IssueStore| {
            let s = store.stats();
            assert_eq!(s.open + s.in_progress + s.closed, s.total);
            assert_eq!(s.total, store.len());
        };
        check(&store);
        for (n, status) in Status::ALL.iter().cycle().take(7).enumerate() {
            store.append(issue(&format!("i{n}"), *status, Priority::Medium));
            check(&store);
        }
        store.remove("i3");
        check(&store);
        store.replace(issue("i0", Status::Closed, Priority::Medium));
        check(&store);
        store.replace_all(Vec::new());
        check(&store);
    }
}
