//! # civic - Municipal Service Requests
//!
//! Command-line front end for the civic-core indexes.
//!
//! ## Usage
//!
//! ```bash
//! # Overview of the snapshot
//! civic --snapshot civic.json status
//!
//! # Report an issue and move it along
//! civic report -c water -l "Mamelodi" -d "No water since morning"
//! civic advance --id <uuid> --status triaged --note "Desk 3"
//!
//! # Queries
//! civic oldest -k 5
//! civic route -c roads --full
//! civic mst --json-mode
//! civic events -q outage --from 2024-09-01
//! ```

use civic::cli;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // CIVIC_LOG_FORMAT=json switches to machine-parseable logs.
    let log_format = std::env::var("CIVIC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "civic=info,civic_core=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  civic v{}
  service requests - routing - timelines
"#,
        env!("CARGO_PKG_VERSION")
    );
}
