//! Integration tests for CLI parsing and command execution.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use civic::cli::{AppContext, Cli, Commands, execute, parse_day};
use civic::snapshot::Snapshot;
use civic_core::{Category, IssueStatus};
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn paths(dir: &TempDir) -> (PathBuf, PathBuf) {
    (dir.path().join("civic.json"), dir.path().join("civic.toml"))
}

fn run(snapshot: &Path, config: &Path, args: &[&str]) -> Result<(), civic_core::CivicError> {
    let mut argv = vec![
        "civic".to_string(),
        "--quiet".to_string(),
        "--json-mode".to_string(),
        "--snapshot".to_string(),
        snapshot.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    execute(Cli::try_parse_from(argv).unwrap())
}

// =============================================================================
// PARSING TESTS
// =============================================================================

#[test]
fn test_cli_definition_is_consistent() {
    Cli::command().debug_assert();
}

#[test]
fn test_parse_defaults() {
    let cli = Cli::try_parse_from(["civic"]).unwrap();
    assert_eq!(cli.snapshot, PathBuf::from("civic.json"));
    assert_eq!(cli.config, PathBuf::from("civic.toml"));
    assert!(!cli.json_mode);
    assert!(cli.command.is_none());
}

#[test]
fn test_parse_route_command() {
    let cli = Cli::try_parse_from(["civic", "route", "-c", "water", "--full"]).unwrap();
    match cli.command {
        Some(Commands::Route { category, full }) => {
            assert_eq!(category, "water");
            assert!(full);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_parse_day_bounds() {
    let start = parse_day("2024-09-01", false).unwrap();
    let end = parse_day("2024-09-01", true).unwrap();
    assert_eq!(start.to_rfc3339(), "2024-09-01T00:00:00+00:00");
    assert_eq!(end.to_rfc3339(), "2024-09-01T23:59:59+00:00");
    assert!(parse_day("01/09/2024", false).is_err());
}

// =============================================================================
// EXECUTION TESTS
// =============================================================================

#[test]
fn test_report_persists_issue() {
    let dir = TempDir::new().unwrap();
    let (snapshot, config) = paths(&dir);

    run(&snapshot, &config, &["report", "-c", "water", "-l", "Mamelodi", "-d", "No water"]).unwrap();

    let saved = Snapshot::load_or_default(&snapshot);
    assert_eq!(saved.issues.len(), 1);
    assert_eq!(saved.issues[0].category, Category::Water);
    assert_eq!(saved.issues[0].location, "Mamelodi");
}

#[test]
fn test_report_rejects_unknown_category_and_blank_location() {
    let dir = TempDir::new().unwrap();
    let (snapshot, config) = paths(&dir);

    assert!(run(&snapshot, &config, &["report", "-c", "parks", "-l", "CBD"]).is_err());
    assert!(run(&snapshot, &config, &["report", "-c", "roads", "-l", "  "]).is_err());
    assert!(!snapshot.exists());
}

#[test]
fn test_advance_records_status_updates() {
    let dir = TempDir::new().unwrap();
    let (snapshot, config) = paths(&dir);

    let mut ctx = AppContext::open(&snapshot, &config).unwrap();
    let id = ctx.report(Category::Roads, "Menlyn", "Pothole").unwrap();
    ctx.save().unwrap();

    let id_text = id.to_string();
    run(&snapshot, &config, &["advance", "-i", &id_text, "-s", "triaged", "-n", "Desk 1"]).unwrap();
    run(&snapshot, &config, &["advance", "-i", &id_text, "-s", "assigned"]).unwrap();
    // Skipping InProgress is refused and nothing is stored.
    assert!(run(&snapshot, &config, &["advance", "-i", &id_text, "-s", "resolved"]).is_err());

    let saved = Snapshot::load_or_default(&snapshot);
    let statuses: Vec<IssueStatus> = saved.status_updates.iter().map(|u| u.status).collect();
    assert_eq!(statuses, vec![IssueStatus::Triaged, IssueStatus::Assigned]);
    assert_eq!(saved.status_updates[0].note, "Desk 1");

    let reopened = AppContext::open(&snapshot, &config).unwrap();
    assert_eq!(reopened.session.current_status(&id), Some(IssueStatus::Assigned));
    assert_eq!(reopened.open_count(), 1);
}

#[test]
fn test_advance_unknown_issue_fails() {
    let dir = TempDir::new().unwrap();
    let (snapshot, config) = paths(&dir);
    let unknown = civic_core::IssueId::from_u128(404).to_string();

    assert!(run(&snapshot, &config, &["advance", "-i", &unknown, "-s", "triaged"]).is_err());
    assert!(run(&snapshot, &config, &["advance", "-i", "not-a-uuid", "-s", "triaged"]).is_err());
}

#[test]
fn test_ingest_events_then_search() {
    let dir = TempDir::new().unwrap();
    let (snapshot, config) = paths(&dir);
    let feed = dir.path().join("events.json");
    std::fs::write(
        &feed,
        r#"[
            {"id":"00000000-0000-0000-0000-000000000001","title":"Water outage",
             "category":"Utilities","location":"Mamelodi","start":"2024-09-02T08:00:00Z"},
            {"id":"00000000-0000-0000-0000-000000000002","title":"Ward meeting",
             "category":"Community","location":"Town Hall","start":"2024-09-05T17:00:00Z"}
        ]"#,
    )
    .unwrap();

    run(&snapshot, &config, &["ingest", "-f", &feed.display().to_string(), "-t", "events"]).unwrap();
    assert_eq!(Snapshot::load_or_default(&snapshot).events.len(), 2);

    let ctx = AppContext::open(&snapshot, &config).unwrap();
    let found = ctx.session.search_events(
        "outage",
        "",
        parse_day("2024-09-01", false).ok(),
        parse_day("2024-09-03", true).ok(),
    );
    assert_eq!(found.len(), 1);

    run(&snapshot, &config, &["events", "-Q", "meeting", "-c", "Community"]).unwrap();
    assert!(run(&snapshot, &config, &["ingest", "-f", &feed.display().to_string(), "-t", "people"]).is_err());
}

#[test]
fn test_search_counts_carry_across_runs() {
    let dir = TempDir::new().unwrap();
    let (snapshot, config) = paths(&dir);
    let feed = dir.path().join("events.json");
    std::fs::write(
        &feed,
        r#"[
            {"id":"00000000-0000-0000-0000-000000000001","title":"Water outage",
             "category":"Utilities","location":"Mamelodi","start":"2024-09-02T08:00:00Z"},
            {"id":"00000000-0000-0000-0000-000000000002","title":"Budget imbizo",
             "category":"Governance","location":"Town Hall","start":"2024-09-05T17:00:00Z"}
        ]"#,
    )
    .unwrap();
    run(&snapshot, &config, &["ingest", "-f", &feed.display().to_string(), "-t", "events"]).unwrap();

    run(&snapshot, &config, &["events", "-c", "Utilities"]).unwrap();
    run(&snapshot, &config, &["events", "-c", "Utilities"]).unwrap();
    run(&snapshot, &config, &["events", "-c", "Governance"]).unwrap();
    run(&snapshot, &config, &["events"]).unwrap();

    let stored = Snapshot::load_or_default(&snapshot);
    assert!(stored.searches.counts.contains(&("cat:utilities".to_string(), 2)));
    assert_eq!(stored.searches.recent.len(), 3);

    let ctx = AppContext::open(&snapshot, &config).unwrap();
    assert_eq!(
        ctx.session.recommend_categories(3).to_vec(),
        vec!["utilities", "governance"]
    );
}

#[test]
fn test_timeline_command_reads_recorded_statuses() {
    let dir = TempDir::new().unwrap();
    let (snapshot, config) = paths(&dir);

    run(&snapshot, &config, &["report", "-c", "water", "-l", "Mamelodi", "-d", "No water"]).unwrap();
    let id = Snapshot::load_or_default(&snapshot).issues[0].id.to_string();
    run(&snapshot, &config, &["advance", "-i", &id, "-s", "triaged"]).unwrap();
    run(&snapshot, &config, &["timeline", "-i", &id]).unwrap();

    let ctx = AppContext::open(&snapshot, &config).unwrap();
    let id = id.parse().unwrap();
    let tree = ctx.session.timeline_tree(&id).unwrap();
    let statuses: Vec<_> = tree.in_order().map(|c| c.status).collect();
    assert_eq!(statuses, vec![IssueStatus::Submitted, IssueStatus::Triaged]);
    assert!(run(&snapshot, &config, &["timeline", "-i", "not-a-uuid"]).is_err());
}

#[test]
fn test_ingest_issues_skips_duplicates() {
    let dir = TempDir::new().unwrap();
    let (snapshot, config) = paths(&dir);
    let file = dir.path().join("issues.json");
    std::fs::write(
        &file,
        r#"[
            {"id":"00000000-0000-0000-0000-00000000000a","created_at":"2024-07-01T08:00:00Z",
             "category":"Waste","location":"Hatfield","description":"Bins not collected"}
        ]"#,
    )
    .unwrap();
    let file_arg = file.display().to_string();

    run(&snapshot, &config, &["ingest", "-f", &file_arg]).unwrap();
    run(&snapshot, &config, &["ingest", "-f", &file_arg]).unwrap();
    assert_eq!(Snapshot::load_or_default(&snapshot).issues.len(), 1);
}

#[test]
fn test_read_only_commands_succeed_on_empty_snapshot() {
    let dir = TempDir::new().unwrap();
    let (snapshot, config) = paths(&dir);

    for args in [
        vec!["status"],
        vec!["route", "-c", "utilities"],
        vec!["oldest"],
        vec!["earliest", "-n", "3"],
        vec!["mst"],
        vec!["upcoming"],
        vec!["categories"],
    ] {
        run(&snapshot, &config, &args).unwrap();
    }
    assert!(!snapshot.exists());
}

#[test]
fn test_export_writes_binary_graph() {
    let dir = TempDir::new().unwrap();
    let (snapshot, config) = paths(&dir);
    let output = dir.path().join("network.civg");

    run(&snapshot, &config, &["export", "-o", &output.display().to_string()]).unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[..4], b"CIVG");
    let graph: civic_core::Graph<civic_core::Department> =
        civic_core::graph_from_bytes(&bytes).unwrap();
    assert_eq!(graph.vertex_count(), 12);
}
