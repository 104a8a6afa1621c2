//! # Workload - Programme Workload Estimator
//!
//! The main binary for the workload and resource calculation engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based), with hashed-key admin routes
//! - CLI interface for calculations, stored submissions and exports
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/workload (THE BINARY)               │
//! │                                                          │
//! │   ┌─────────────┐    ┌─────────────┐    ┌────────────┐   │
//! │   │   CLI       │    │   HTTP API  │    │  Settings  │   │
//! │   │  (clap)     │    │   (axum)    │    │  (toml)    │   │
//! │   └──────┬──────┘    └──────┬──────┘    └─────┬──────┘   │
//! │          └──────────────────┼─────────────────┘          │
//! │                             ▼                            │
//! │                    ┌────────────────┐                    │
//! │                    │ workload-core  │                    │
//! │                    │  (THE LOGIC)   │                    │
//! │                    └────────────────┘                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! workload server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! workload calculate -f programme.json --save
//! workload export -o submissions.csv -t csv
//! echo -n 'my admin key' | workload admin-hash
//! ```

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use workload::cli;

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // WORKLOAD_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("WORKLOAD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "workload=debug,workload_core=debug,tower_http=debug"
    } else {
        "workload=info,tower_http=debug"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if !cli.quiet && !cli.json_mode && matches!(cli.command, Some(cli::Commands::Server { .. })) {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  Programme Workload Estimator v{}

  Exact • Deterministic • Auditable
"#,
        env!("CARGO_PKG_VERSION")
    );
}
