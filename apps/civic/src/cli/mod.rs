//! # civic CLI Module
//!
//! ## Available Commands
//!
//! - `status` - Counts of issues, open issues and events
//! - `report` - Record a new issue
//! - `advance` - Append a status change to an issue
//! - `timeline` - Show the status history of one issue
//! - `route` - Department route for a category
//! - `oldest` - Oldest (open) issues first
//! - `earliest` - Issues in creation order
//! - `mst` - Minimum spanning tree over open issue locations
//! - `events` - Search the event feed
//! - `upcoming` - Next events by start time
//! - `categories` - Issue and event categories
//! - `ingest` - Append issues or events from a JSON file
//! - `export` - Write the department network as a binary graph

mod commands;

use civic_core::CivicError;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// civic - municipal service requests
///
/// Tracks citizen-reported issues, routes them through departments and
/// keeps a status timeline for each one.
#[derive(Parser, Debug)]
#[command(name = "civic")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the JSON snapshot file
    #[arg(short = 'S', long, global = true, default_value = "civic.json")]
    pub snapshot: PathBuf,

    /// Path to the TOML configuration file
    #[arg(short = 'C', long, global = true, default_value = "civic.toml")]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show snapshot status
    Status,

    /// Record a new issue
    Report {
        /// Category (Sanitation, Roads, Electricity, Water, Waste, Utilities, Safety)
        #[arg(short, long)]
        category: String,

        /// Place name
        #[arg(short, long)]
        location: String,

        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Append a status change to an issue
    Advance {
        /// Issue identifier (UUID)
        #[arg(short, long)]
        id: String,

        /// Target status
        #[arg(short, long)]
        status: String,

        /// Note attached to the checkpoint
        #[arg(short, long, default_value = "")]
        note: String,
    },

    /// Show the status timeline of an issue
    Timeline {
        /// Issue identifier (UUID)
        #[arg(short, long)]
        id: String,
    },

    /// Show the department route for a category
    Route {
        /// Issue category
        #[arg(short, long)]
        category: String,

        /// Continue through field operations to close-out
        #[arg(short, long)]
        full: bool,
    },

    /// List the oldest issues first
    Oldest {
        /// Number of issues (defaults to the configured value)
        #[arg(short, long)]
        k: Option<usize>,

        /// Include resolved, closed and rejected issues
        #[arg(short, long)]
        all: bool,
    },

    /// List issues in creation order
    Earliest {
        /// Number of issues
        #[arg(short, long, default_value = "10")]
        n: usize,
    },

    /// Minimum spanning tree over open issue locations
    Mst,

    /// Search the event feed
    Events {
        /// Search text (matches title, description and location)
        #[arg(short = 'Q', long, default_value = "")]
        query: String,

        /// Exact category name
        #[arg(short, long, default_value = "")]
        category: String,

        /// First day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Last day, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,
    },

    /// List upcoming events
    Upcoming {
        /// Maximum number of events (defaults to the configured value)
        #[arg(short, long)]
        max: Option<usize>,
    },

    /// List issue and event categories
    Categories,

    /// Append issues or events from a JSON file
    Ingest {
        /// Path to a JSON array
        #[arg(short, long)]
        file: PathBuf,

        /// Record kind (issues, events)
        #[arg(short = 't', long, default_value = "issues")]
        kind: String,
    },

    /// Export the department network in the binary graph format
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), CivicError> {
    let json_mode = cli.json_mode;
    let mut ctx = AppContext::open(&cli.snapshot, &cli.config)?;

    match cli.command {
        Some(Commands::Status) | None => cmd_status(&ctx, json_mode),
        Some(Commands::Report {
            category,
            location,
            description,
        }) => cmd_report(&mut ctx, json_mode, &category, &location, &description),
        Some(Commands::Advance { id, status, note }) => {
            cmd_advance(&mut ctx, json_mode, &id, &status, &note)
        }
        Some(Commands::Timeline { id }) => cmd_timeline(&ctx, json_mode, &id),
        Some(Commands::Route { category, full }) => cmd_route(&ctx, json_mode, &category, full),
        Some(Commands::Oldest { k, all }) => cmd_oldest(&ctx, json_mode, k, !all),
        Some(Commands::Earliest { n }) => cmd_earliest(&ctx, json_mode, n),
        Some(Commands::Mst) => cmd_mst(&ctx, json_mode),
        Some(Commands::Events {
            query,
            category,
            from,
            to,
        }) => cmd_events(
            &mut ctx,
            json_mode,
            &query,
            &category,
            from.as_deref(),
            to.as_deref(),
        ),
        Some(Commands::Upcoming { max }) => cmd_upcoming(&ctx, json_mode, max),
        Some(Commands::Categories) => cmd_categories(&ctx, json_mode),
        Some(Commands::Ingest { file, kind }) => cmd_ingest(&mut ctx, json_mode, &file, &kind),
        Some(Commands::Export { output }) => cmd_export(&ctx, json_mode, &output),
    }
}
