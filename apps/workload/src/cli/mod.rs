//! # Workload CLI Module
//!
//! This module implements the CLI interface for the workload estimator.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `calculate` - Calculate metrics for a programme input file
//! - `init` - Initialize a new submission database
//! - `list` - List stored submissions
//! - `show` - Show one stored submission
//! - `export` - Export submissions as CSV or JSON
//! - `summary` - Aggregate figures across submissions
//! - `config` - Show the engine constants in use
//! - `admin-hash` - Digest an admin key read from stdin

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use workload_core::WorkloadError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Programme workload estimator
///
/// Derives required staff effort, available staff capacity and student/staff
/// ratios from a programme's delivery and staffing figures.
#[derive(Parser, Debug)]
#[command(name = "workload")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the submission database
    #[arg(short = 'D', long, global = true, default_value = "workload.redb")]
    pub database: PathBuf,

    /// Engine configuration file (TOML); overrides WORKLOAD_CONFIG
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

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
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Calculate metrics for a programme input (JSON)
    Calculate {
        /// Path to the input file
        #[arg(short, long)]
        file: PathBuf,

        /// Store the submission after calculating
        #[arg(short, long)]
        save: bool,
    },

    /// Initialize a new empty database
    Init {
        /// Force initialization even if database exists
        #[arg(short, long)]
        force: bool,
    },

    /// List stored submissions
    List,

    /// Show one stored submission
    Show {
        /// Submission ID
        #[arg(long)]
        id: u64,
    },

    /// Export submissions as a flat table
    Export {
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Export format (csv, json)
        #[arg(short = 't', long, default_value = "csv")]
        format: String,
    },

    /// Aggregate figures across stored submissions
    Summary,

    /// Show the engine configuration in use
    Config,

    /// Read an admin key from stdin and print its BLAKE3 digest
    AdminHash,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), WorkloadError> {
    let json_mode = cli.json_mode;
    let config_path = cli.config.as_deref();

    match cli.command {
        Some(Commands::Server { host, port }) => {
            cmd_server(&cli.database, config_path, &host, port).await
        }
        Some(Commands::Calculate { file, save }) => {
            cmd_calculate(&cli.database, config_path, json_mode, &file, save)
        }
        Some(Commands::Init { force }) => cmd_init(&cli.database, force),
        Some(Commands::List) => cmd_list(&cli.database, json_mode),
        Some(Commands::Show { id }) => cmd_show(&cli.database, json_mode, id),
        Some(Commands::Export { output, format }) => {
            cmd_export(&cli.database, &output, &format)
        }
        Some(Commands::Summary) => cmd_summary(&cli.database, json_mode),
        Some(Commands::Config) => cmd_config(config_path, json_mode),
        Some(Commands::AdminHash) => cmd_admin_hash(),
        None => {
            // No subcommand - show summary by default
            cmd_summary(&cli.database, json_mode)
        }
    }
}
