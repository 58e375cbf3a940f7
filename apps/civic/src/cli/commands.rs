//! # CLI Command Implementations
//!
//! Every command opens the snapshot, rebuilds a [`Session`] from it, runs
//! one query or mutation, and saves the snapshot again when it changed.

use crate::config::AppConfig;
use crate::snapshot::Snapshot;
use chrono::{DateTime, NaiveDate, Utc};
use civic_core::{
    Category, CivicError, EventItem, Issue, IssueId, IssueStatus, Session, StatusUpdate,
    graph_to_bytes,
};
use serde_json::json;
use std::path::{Path, PathBuf};

// =============================================================================
// FILE SIZE LIMITS
// =============================================================================

/// Maximum file size for ingestion (100 MB).
const MAX_INGEST_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Validate file size before reading.
fn validate_file_size(path: &Path, max_size: u64) -> Result<(), CivicError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| CivicError::Io(format!("Cannot read file metadata: {}", e)))?;

    if metadata.len() > max_size {
        return Err(CivicError::InvalidInput(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            max_size
        )));
    }
    Ok(())
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

fn print_heading(title: &str) {
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));
}

/// Parse a `YYYY-MM-DD` day into its first or last second (UTC).
pub fn parse_day(text: &str, end_of_day: bool) -> Result<DateTime<Utc>, CivicError> {
    let day = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| CivicError::InvalidInput(format!("invalid date '{}': {}", text, e)))?;
    let moment = if end_of_day {
        day.and_hms_opt(23, 59, 59)
    } else {
        day.and_hms_opt(0, 0, 0)
    };
    moment
        .map(|m| m.and_utc())
        .ok_or_else(|| CivicError::InvalidInput(format!("invalid date '{}'", text)))
}

// =============================================================================
// APPLICATION CONTEXT
// =============================================================================

/// Snapshot on disk plus the session rebuilt from it.
#[derive(Debug)]
pub struct AppContext {
    pub snapshot_path: PathBuf,
    pub snapshot: Snapshot,
    pub session: Session,
}

impl AppContext {
    pub fn open(snapshot_path: &Path, config_path: &Path) -> Result<Self, CivicError> {
        let config = AppConfig::load(config_path)?;
        let snapshot = Snapshot::load_or_default(snapshot_path);
        let session = snapshot.to_session(config.core)?;
        Ok(Self {
            snapshot_path: snapshot_path.to_path_buf(),
            snapshot,
            session,
        })
    }

    pub fn save(&self) -> Result<(), CivicError> {
        self.snapshot.save(&self.snapshot_path)
    }

    /// Record a new issue in both the session and the snapshot.
    pub fn report(
        &mut self,
        category: Category,
        location: &str,
        description: &str,
    ) -> Result<IssueId, CivicError> {
        if location.trim().is_empty() {
            return Err(CivicError::InvalidInput("location is required".to_string()));
        }
        let issue = Issue::new(category, location.trim(), description.trim(), Utc::now());
        self.snapshot.issues.push(issue.clone());
        Ok(self.session.add_issue(issue))
    }

    /// Append a status change. A refused transition is an error here.
    pub fn advance(
        &mut self,
        id: &IssueId,
        status: IssueStatus,
        note: &str,
    ) -> Result<StatusUpdate, CivicError> {
        if !self.session.advance_status(id, status, note)? {
            let current = self
                .session
                .current_status(id)
                .map(|s| s.to_string())
                .unwrap_or_else(|| "none".to_string());
            return Err(CivicError::InvalidInput(format!(
                "transition {} -> {} is not allowed",
                current, status
            )));
        }

        // The session may have clamped the timestamp; store what it recorded.
        let timeline = self.session.timeline(id);
        let timestamp = timeline.last().map_or_else(Utc::now, |c| c.timestamp);
        let update = StatusUpdate {
            issue_id: *id,
            status,
            timestamp,
            note: note.to_string(),
        };
        self.snapshot.status_updates.push(update.clone());
        Ok(update)
    }

    /// Count of issues whose latest status is still open.
    pub fn open_count(&self) -> usize {
        self.session
            .issues()
            .iter()
            .filter(|issue| {
                self.session
                    .current_status(&issue.id)
                    .is_none_or(IssueStatus::is_open)
            })
            .count()
    }
}

// =============================================================================
// STATUS
// =============================================================================

/// Show snapshot status.
pub fn cmd_status(ctx: &AppContext, json_mode: bool) -> Result<(), CivicError> {
    let issues = ctx.session.issues();
    let per_status = ctx.session.status_counts();

    if json_mode {
        let by_status: serde_json::Map<String, serde_json::Value> = per_status
            .iter()
            .map(|(status, count)| (status.to_string(), json!(count)))
            .collect();
        print_json(&json!({
            "snapshot": ctx.snapshot_path.display().to_string(),
            "issues": issues.len(),
            "open_issues": ctx.open_count(),
            "status_updates": ctx.snapshot.status_updates.len(),
            "events": ctx.snapshot.events.len(),
            "by_status": by_status,
        }));
        return Ok(());
    }

    print_heading("civic Status");
    println!("Snapshot:       {}", ctx.snapshot_path.display());
    println!();
    println!("Issues:         {}", issues.len());
    println!("Open issues:    {}", ctx.open_count());
    println!("Status updates: {}", ctx.snapshot.status_updates.len());
    println!("Events:         {}", ctx.snapshot.events.len());
    println!();
    for (status, count) in &per_status {
        println!("  {:<12} {}", status, count);
    }
    Ok(())
}

// =============================================================================
// ISSUES
// =============================================================================

/// Record a new issue and save the snapshot.
pub fn cmd_report(
    ctx: &mut AppContext,
    json_mode: bool,
    category: &str,
    location: &str,
    description: &str,
) -> Result<(), CivicError> {
    let category: Category = category.parse()?;
    let id = ctx.report(category, location, description)?;
    ctx.save()?;

    let route = ctx.session.route_to_department(category);
    let route: Vec<String> = route.iter().map(|d| d.to_string()).collect();
    tracing::info!(issue = %id, %category, "issue reported");

    if json_mode {
        print_json(&json!({
            "success": true,
            "id": id.to_string(),
            "category": category,
            "route": route,
        }));
    } else {
        println!("Issue recorded: {}", id);
        println!("Route: {}", route.join(" -> "));
    }
    Ok(())
}

/// Append a status change and save the snapshot.
pub fn cmd_advance(
    ctx: &mut AppContext,
    json_mode: bool,
    id: &str,
    status: &str,
    note: &str,
) -> Result<(), CivicError> {
    let id: IssueId = id.parse()?;
    let status: IssueStatus = status.parse()?;
    let update = ctx.advance(&id, status, note)?;
    ctx.save()?;

    if json_mode {
        print_json(&json!({
            "success": true,
            "update": update,
        }));
    } else {
        println!(
            "{} -> {} at {}",
            id,
            update.status,
            update.timestamp.format("%d %b %Y %H:%M")
        );
    }
    Ok(())
}

/// Show the status timeline of one issue.
pub fn cmd_timeline(ctx: &AppContext, json_mode: bool, id: &str) -> Result<(), CivicError> {
    let id: IssueId = id.parse()?;
    let issue = ctx
        .session
        .issue(&id)
        .ok_or_else(|| CivicError::InvalidInput(format!("unknown issue {}", id)))?;
    let tree = ctx.session.timeline_tree(&id)?;
    let timeline: Vec<_> = tree.in_order().collect();

    if json_mode {
        print_json(&json!({
            "issue": issue,
            "current": ctx.session.current_status(&id),
            "timeline": timeline,
        }));
        return Ok(());
    }

    print_heading("Issue Timeline");
    println!("{}", issue.summary());
    if !issue.description.is_empty() {
        println!("{}", issue.description);
    }
    println!();
    for checkpoint in timeline.iter().copied() {
        if checkpoint.note.is_empty() {
            println!("  [x] {}", checkpoint);
        } else {
            println!("  [x] {} - {}", checkpoint, checkpoint.note);
        }
    }

    let current = ctx.session.current_status(&id);
    if current.is_some_and(|s| !s.is_terminal()) {
        let pending = IssueStatus::DEFAULT_FLOW
            .into_iter()
            .filter(|step| !timeline.iter().any(|c| c.status == *step));
        for step in pending {
            println!("  [ ] {}", step);
        }
    }
    Ok(())
}

/// Show the department route for a category.
pub fn cmd_route(
    ctx: &AppContext,
    json_mode: bool,
    category: &str,
    full: bool,
) -> Result<(), CivicError> {
    let category: Category = category.parse()?;
    let route = if full {
        ctx.session.full_lifecycle_route(category)
    } else {
        ctx.session.route_to_department(category)
    };
    let names: Vec<String> = route.iter().map(|d| d.to_string()).collect();

    if json_mode {
        print_json(&json!({
            "category": category,
            "full": full,
            "route": names,
        }));
    } else {
        print_heading(&format!("Route for {}", category));
        println!("{}", names.join(" -> "));
    }
    Ok(())
}

/// List the oldest issues first, open ones only unless `only_open` is false.
pub fn cmd_oldest(
    ctx: &AppContext,
    json_mode: bool,
    k: Option<usize>,
    only_open: bool,
) -> Result<(), CivicError> {
    let k = k.unwrap_or(ctx.session.config().oldest_open);
    let issues = ctx.session.oldest_open(k, only_open);
    print_issue_list(ctx, json_mode, "Oldest Issues", &issues.to_vec());
    Ok(())
}

/// List issues in creation order.
pub fn cmd_earliest(ctx: &AppContext, json_mode: bool, n: usize) -> Result<(), CivicError> {
    let issues = ctx.session.earliest(n);
    print_issue_list(ctx, json_mode, "Earliest Issues", &issues.to_vec());
    Ok(())
}

fn print_issue_list(ctx: &AppContext, json_mode: bool, title: &str, issues: &[Issue]) {
    if json_mode {
        let rows: Vec<serde_json::Value> = issues
            .iter()
            .map(|issue| {
                json!({
                    "issue": issue,
                    "status": ctx.session.current_status(&issue.id),
                })
            })
            .collect();
        print_json(&json!({ "count": rows.len(), "issues": rows }));
        return;
    }

    print_heading(title);
    if issues.is_empty() {
        println!("No issues.");
    }
    for issue in issues {
        let status = ctx
            .session
            .current_status(&issue.id)
            .map(|s| s.to_string())
            .unwrap_or_default();
        println!("{} | {}", issue.summary(), status);
    }
}

/// Minimum spanning tree over the locations of open issues.
pub fn cmd_mst(ctx: &AppContext, json_mode: bool) -> Result<(), CivicError> {
    let mst = ctx.session.open_issues_mst();

    if json_mode {
        print_json(&json!(mst));
        return Ok(());
    }

    print_heading("Open Issue Spanning Tree");
    if mst.links.is_empty() {
        println!("Fewer than two open issues.");
        return Ok(());
    }
    for link in &mst.links {
        println!("  {} -- {}  {:.2}", link.from, link.to, link.distance);
    }
    println!();
    println!("Total distance: {:.2}", mst.total_distance);
    Ok(())
}

// =============================================================================
// EVENTS
// =============================================================================

/// Recent searches listed by `events`.
const RECENT_SHOWN: usize = 5;

/// Search events, then show the categories searched most often.
pub fn cmd_events(
    ctx: &mut AppContext,
    json_mode: bool,
    query: &str,
    category: &str,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<(), CivicError> {
    let from = from.map(|d| parse_day(d, false)).transpose()?;
    let to = to.map(|d| parse_day(d, true)).transpose()?;

    let results = ctx.session.search_events(query, category, from, to);
    ctx.snapshot.searches = ctx.session.search_record();
    ctx.save()?;
    let recommended = ctx
        .session
        .recommend_categories(ctx.session.config().top_categories);
    let recent = ctx.session.recent_searches(RECENT_SHOWN);

    if json_mode {
        print_json(&json!({
            "count": results.len(),
            "events": results,
            "recommended": recommended,
            "recent": recent,
        }));
        return Ok(());
    }

    print_heading("Events");
    print_events(&results.to_vec());
    if !recommended.is_empty() {
        println!();
        println!("Recommended: {}", recommended.to_vec().join(", "));
    }
    if !recent.is_empty() {
        println!("Recent:      {}", recent.to_vec().join(", "));
    }
    Ok(())
}

/// List the next events by start time.
pub fn cmd_upcoming(ctx: &AppContext, json_mode: bool, max: Option<usize>) -> Result<(), CivicError> {
    let max = max.unwrap_or(ctx.session.config().upcoming);
    let events = ctx.session.upcoming_events(max);

    if json_mode {
        print_json(&json!({ "count": events.len(), "events": events }));
        return Ok(());
    }

    print_heading("Upcoming Events");
    print_events(&events.to_vec());
    Ok(())
}

fn print_events(events: &[EventItem]) {
    if events.is_empty() {
        println!("No events.");
    }
    for event in events {
        println!("  [{}] {}", event.category, event);
    }
}

/// List issue categories and the categories present in the event feed.
pub fn cmd_categories(ctx: &AppContext, json_mode: bool) -> Result<(), CivicError> {
    let issue_categories: Vec<&str> = ctx.session.categories().iter().map(|c| c.as_str()).collect();
    let event_categories = ctx.session.event_categories().to_vec();

    if json_mode {
        print_json(&json!({
            "issue_categories": issue_categories,
            "event_categories": event_categories,
        }));
        return Ok(());
    }

    print_heading("Categories");
    println!("Issues: {}", issue_categories.join(", "));
    println!("Events: {}", event_categories.join(", "));
    Ok(())
}

// =============================================================================
// IMPORT / EXPORT
// =============================================================================

/// Append issues or events from a JSON array and save the snapshot.
pub fn cmd_ingest(
    ctx: &mut AppContext,
    json_mode: bool,
    file: &Path,
    kind: &str,
) -> Result<(), CivicError> {
    validate_file_size(file, MAX_INGEST_FILE_SIZE)?;
    let text = std::fs::read_to_string(file).map_err(|e| CivicError::Io(e.to_string()))?;

    let (added, skipped) = match kind {
        "issues" => {
            let issues: Vec<Issue> = serde_json::from_str(&text)
                .map_err(|e| CivicError::Deserialization(e.to_string()))?;
            let mut added = 0;
            let mut skipped = 0;
            for issue in issues {
                if ctx.session.issue(&issue.id).is_some() {
                    tracing::warn!(issue = %issue.id, "duplicate issue skipped");
                    skipped += 1;
                    continue;
                }
                ctx.snapshot.issues.push(issue.clone());
                ctx.session.add_issue(issue);
                added += 1;
            }
            (added, skipped)
        }
        "events" => {
            let events: Vec<EventItem> = serde_json::from_str(&text)
                .map_err(|e| CivicError::Deserialization(e.to_string()))?;
            let added = events.len();
            ctx.session.load_events(events.iter().cloned());
            ctx.snapshot.events.extend(events);
            (added, 0)
        }
        other => {
            return Err(CivicError::InvalidInput(format!(
                "unknown record kind '{}' (expected issues or events)",
                other
            )));
        }
    };

    ctx.save()?;
    tracing::info!(kind, added, skipped, "ingest complete");

    if json_mode {
        print_json(&json!({
            "success": true,
            "kind": kind,
            "added": added,
            "skipped": skipped,
        }));
    } else {
        println!("Ingested {} {} ({} skipped)", added, kind, skipped);
    }
    Ok(())
}

/// Write the department network in the binary graph format.
pub fn cmd_export(ctx: &AppContext, json_mode: bool, output: &Path) -> Result<(), CivicError> {
    let graph = ctx.session.network().graph();
    let bytes = graph_to_bytes(graph)?;
    std::fs::write(output, &bytes).map_err(|e| CivicError::Io(e.to_string()))?;

    if json_mode {
        print_json(&json!({
            "success": true,
            "output": output.display().to_string(),
            "bytes": bytes.len(),
            "vertices": graph.vertex_count(),
            "edges": graph.edge_count(),
        }));
    } else {
        println!(
            "Exported {} departments and {} edges ({} bytes) to {}",
            graph.vertex_count(),
            graph.edge_count(),
            bytes.len(),
            output.display()
        );
    }
    Ok(())
}
