//! Non-interactive subcommands

use crate::view::IssueListView;
use anyhow::{Context, Result, anyhow, bail};
use issuedesk_client::IssueApi;
use issuedesk_core::{Config, Issue, IssueFilter, IssueStats, IssueStore, Priority, Status};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Build a filter from command line values. `all` means no restriction.
pub fn build_filter(status: &str, priority: &str, search: Option<&str>) -> Result<IssueFilter> {
    let status = match status.trim() {
        s if s.eq_ignore_ascii_case("all") => None,
        s => Some(s.parse::<Status>()?),
    };
    let priority = match priority.trim() {
        p if p.eq_ignore_ascii_case("all") => None,
        p => Some(p.parse::<Priority>()?),
    };
    Ok(IssueFilter::new()
        .with_status(status)
        .with_priority(priority)
        .with_search(search.unwrap_or_default()))
}

#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    total: usize,
    matched: usize,
    issues: Vec<&'a Issue>,
}

async fn fetch_issues<A: IssueApi + ?Sized>(api: &A) -> Result<Vec<Issue>> {
    let issues = api.list_issues().await.context("Failed to fetch issues")?;
    tracing::info!(count = issues.len(), "fetched issues");
    Ok(issues)
}

/// Filtered issues as JSON
pub async fn robot_list<A: IssueApi + ?Sized>(
    api: &A,
    filter: &IssueFilter,
    out: &mut impl Write,
) -> Result<()> {
    let issues = fetch_issues(api).await?;
    let matched = filter.apply(&issues);
    let output = ListOutput {
        total: issues.len(),
        matched: matched.len(),
        issues: matched,
    };
    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

/// Status counts over every issue as JSON
pub async fn robot_stats<A: IssueApi + ?Sized>(api: &A, out: &mut impl Write) -> Result<()> {
    let mut store = IssueStore::new();
    store.replace_all(fetch_issues(api).await?);
    let stats: IssueStats = store.stats();
    writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
    Ok(())
}

/// Filtered issue list as an escaped HTML fragment
pub async fn robot_html<A: IssueApi + ?Sized>(
    api: &A,
    filter: &IssueFilter,
    out: &mut impl Write,
) -> Result<()> {
    let issues = fetch_issues(api).await?;
    let view = IssueListView::build(&filter.apply(&issues));
    write!(out, "{}", view.to_html())?;
    Ok(())
}

/// Show current configuration
pub fn config_show(config: &Config, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", toml::to_string_pretty(config)?);
        println!();
        println!("# issues endpoint: {}", config.issues_url());
    }
    Ok(())
}

/// Write the commented default config file
pub fn config_reset(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default_with_comments())?;
    println!("Configuration reset to defaults: {}", path.display());
    Ok(())
}

/// Set a single config value and save
pub fn config_set(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = Config::load(path)?;
    apply_setting(&mut config, key, value)?;
    config.save(path)?;
    println!("{} = {}", key, value);
    Ok(())
}

fn apply_setting(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let parse_u64 = |value: &str| {
        value
            .parse::<u64>()
            .map_err(|_| anyhow!("Invalid number for {}: {}", key, value))
    };

    match key {
        "server_url" => config.server_url = value.to_string(),
        "base_path" => config.base_path = value.to_string(),
        "request_timeout_secs" => {
            config.request_timeout_secs = match value {
                "" | "none" => None,
                v => Some(parse_u64(v)?),
            }
        }
        "ui.alert_timeout_secs" => config.ui.alert_timeout_secs = parse_u64(value)?,
        "ui.tick_rate_ms" => config.ui.tick_rate_ms = parse_u64(value)?,
        "ui.log_file" => {
            config.ui.log_file = match value {
                "" | "none" => None,
                v => Some(v.into()),
            }
        }
        _ => bail!("Unknown config key: {}", key),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::testing::{FakeApi, issue};
    use serde_json::Value;
    use tempfile::TempDir;

    fn tracker() -> FakeApi {
        let mut crash = issue("c1", Status::Open, Priority::High);
        crash.title = "Crash on save".into();
        let mut script = issue("c2", Status::InProgress, Priority::High);
        script.title = "<script>alert('x')</script> & more".into();
        FakeApi::with_issues(vec![
            crash,
            script,
            issue("c3", Status::Closed, Priority::Low),
            issue("c4", Status::Open, Priority::Medium),
        ])
    }

    #[test]
    fn test_build_filter_parses_values() {
        let filter = build_filter("IN_PROGRESS", "all", Some("crash")).unwrap();
        assert_eq!(filter.status, Some(Status::InProgress));
        assert_eq!(filter.priority, None);
        assert_eq!(filter.search, "crash");

        let filter = build_filter("All", "High", None).unwrap();
        assert_eq!(filter.status, None);
        assert_eq!(filter.priority, Some(Priority::High));

        assert!(build_filter("pending", "all", None).is_err());
    }

    #[test]
    fn test_config_set_round_trips_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        config_set(&path, "server_url", "http://tracker:9000").unwrap();
        config_set(&path, "ui.alert_timeout_secs", "7").unwrap();
        config_set(&path, "request_timeout_secs", "15").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server_url, "http://tracker:9000");
        assert_eq!(config.ui.alert_timeout_secs, 7);
        assert_eq!(config.request_timeout_secs, Some(15));
        assert_eq!(config.base_path, "/api/v1/issues");
    }

    #[test]
    fn test_config_set_rejects_bad_input() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        assert!(config_set(&path, "colour", "blue").is_err());
        assert!(config_set(&path, "ui.tick_rate_ms", "fast").is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_config_reset_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        config_reset(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[tokio::test]
    async fn test_robot_list_applies_filter() {
        let api = tracker();
        let filter = build_filter("all", "high", None).unwrap();
        let mut out = Vec::new();
        robot_list(&api, &filter, &mut out).await.unwrap();

        let json: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["total"], 4);
        assert_eq!(json["matched"], 2);
        let ids: Vec<&str> = json["issues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["c1", "c2"]);
        assert_eq!(json["issues"][1]["status"], "in_progress");

        let filter = build_filter("open", "all", Some("CRASH")).unwrap();
        let mut out = Vec::new();
        robot_list(&api, &filter, &mut out).await.unwrap();
        let json: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["total"], 4);
        assert_eq!(json["matched"], 1);
        assert_eq!(json["issues"][0]["title"], "Crash on save");
    }

    #[tokio::test]
    async fn test_robot_stats_counts_every_issue() {
        let mut out = Vec::new();
        robot_stats(&tracker(), &mut out).await.unwrap();

        let json: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["open"], 2);
        assert_eq!(json["in_progress"], 1);
        assert_eq!(json["closed"], 1);
        assert_eq!(json["total"], 4);
    }

    #[tokio::test]
    async fn test_robot_html_escapes_issue_text() {
        let filter = build_filter("in_progress", "all", None).unwrap();
        let mut out = Vec::new();
        robot_html(&tracker(), &filter, &mut out).await.unwrap();

        let html = String::from_utf8(out).unwrap();
        assert!(html.contains("&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt; &amp; more"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("data-id=\"c2\""));
        assert!(!html.contains("data-id=\"c1\""));
    }

    #[tokio::test]
    async fn test_robot_html_empty_state() {
        let filter = build_filter("closed", "high", None).unwrap();
        let mut out = Vec::new();
        robot_html(&tracker(), &filter, &mut out).await.unwrap();
        assert!(String::from_utf8(out).unwrap().contains("no-issues"));
    }
}
