//! Client-side filtering of the issue store

use crate::{Issue, Priority, Status};

/// Active filter inputs. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub search: String,
}

impl IssueFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: Option<Status>) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Option<Priority>) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn is_active(&self) -> bool {
        self.status.is_some() || self.priority.is_some() || !self.search.trim().is_empty()
    }

    pub fn matches(&self, issue: &Issue) -> bool {
        if self.status.is_some_and(|status| issue.status != status) {
            return false;
        }

        if self.priority.is_some_and(|priority| issue.priority != priority) {
            return false;
        }

        let term = self.search.trim().to_lowercase();
        if !term.is_empty() {
            let title_match = issue.title.to_lowercase().contains(&term);
            let desc_match = issue.description.to_lowercase().contains(&term);
            if !title_match && !desc_match {
                return false;
            }
        }

        true
    }

    /// The issues passing every active predicate, in their original order
    pub fn apply<'a>(&self, issues: &'a [Issue]) -> Vec<&'a Issue> {
        issues.iter().filter(|issue| self.matches(issue)).collect()
    }

    /// Advance the status filter: all -> open -> in_progress -> closed -> all
    pub fn cycle_status(&mut self) {
        self.status = cycle(&Status::ALL, self.status);
    }

    /// Advance the priority filter: all -> low -> medium -> high -> all
    pub fn cycle_priority(&mut self) {
        self.priority = cycle(&Priority::ALL, self.priority);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn cycle<T: Copy + PartialEq>(values: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => values.first().copied(),
        Some(value) => values
            .iter()
            .position(|v| *v == value)
            .and_then(|i| values.get(i + 1))
            .copied(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::issue;

    fn ids<'a>(issues: &[&'a Issue]) -> Vec<&'a str> {
        issues.iter().map(|i| i.id.as_str()).collect()
    }

    fn sample() -> Vec<Issue> {
        let mut issues = vec![
            issue("1", Status::Open, Priority::High),
            issue("2", Status::Closed, Priority::Low),
            issue("3", Status::Open, Priority::Low),
            issue("4", Status::InProgress, Priority::High),
            issue("5", Status::Open, Priority::Medium),
        ];
        issues[0].title = "Login page crashes".into();
        issues[1].description = "The LOGIN button is misaligned".into();
        issues[3].title = "Slow dashboard".into();
        issues
    }

    #[test]
    fn test_empty_filter_returns_everything() {
        let issues = sample();
        let filter = IssueFilter::new();
        assert!(!filter.is_active());
        assert_eq!(ids(&filter.apply(&issues)), ["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_status_filter_preserves_order() {
        let issues = sample();
        let filter = IssueFilter::new().with_status(Some(Status::Open));
        assert_eq!(ids(&filter.apply(&issues)), ["1", "3", "5"]);
    }

    #[test]
    fn test_priority_filter() {
        let issues = sample();
        let filter = IssueFilter::new().with_priority(Some(Priority::High));
        assert_eq!(ids(&filter.apply(&issues)), ["1", "4"]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let issues = sample();
        let filter = IssueFilter::new().with_search("  login ");
        assert_eq!(ids(&filter.apply(&issues)), ["1", "2"]);
    }

    #[test]
    fn test_search_for_absent_text_is_empty() {
        let issues = sample();
        let filter = IssueFilter::new().with_search("no such words");
        assert!(filter.apply(&issues).is_empty());
    }

    #[test]
    fn test_predicates_combine() {
        let issues = sample();
        let filter = IssueFilter::new()
            .with_status(Some(Status::Open))
            .with_priority(Some(Priority::Low))
            .with_search("issue");
        assert_eq!(ids(&filter.apply(&issues)), ["3"]);
    }

    #[test]
    fn test_scenario_open_filter() {
        let issues = vec![
            issue("a1", Status::Open, Priority::High),
            issue("a2", Status::Closed, Priority::Low),
        ];
        let filter = IssueFilter::new().with_status(Some(Status::Open));
        assert_eq!(ids(&filter.apply(&issues)), ["a1"]);
    }

    #[test]
    fn test_cycle_status_wraps_to_all() {
        let mut filter = IssueFilter::new();
        let mut seen = Vec::new();
        for _ in 0..4 {
            filter.cycle_status();
            seen.push(filter.status);
        }
        assert_eq!(
            seen,
            [
                Some(Status::Open),
                Some(Status::InProgress),
                Some(Status::Closed),
                None
            ]
        );
    }

    #[test]
    fn test_cycle_priority_and_clear() {
        let mut filter = IssueFilter::new().with_search("x");
        filter.cycle_priority();
        assert_eq!(filter.priority, Some(Priority::Low));
        assert!(filter.is_active());
        filter.clear();
        assert_eq!(filter, IssueFilter::default());
    }
}
