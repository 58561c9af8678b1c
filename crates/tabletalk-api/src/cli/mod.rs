//! CLI command definitions and dispatch for the `ttalk` binary.
//!
//! Uses clap derive macros for argument parsing. Commands map one-to-one
//! onto pipeline operations (e.g., `ttalk refresh` runs an index sweep,
//! `ttalk ask` runs the full question-to-results pipeline).

pub mod ask;
pub mod history;
pub mod init;
pub mod refresh;
pub mod schema;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Ask your SQLite database questions in plain English.
#[derive(Parser)]
#[command(name = "ttalk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through the OpenTelemetry stdout exporter.
    #[arg(long, global = true, env = "TABLETALK_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prepare the data directory and config; optionally seed a demo database.
    Init {
        /// Create and seed the demo retail database (customers, orders, ...).
        #[arg(long)]
        demo: bool,
    },

    /// Sync the schema index with the database (embeds changed tables).
    Refresh,

    /// Ask a question in plain English.
    Ask {
        /// The question to answer.
        question: String,

        /// Always produce a plain-language summary of the results.
        #[arg(short, long)]
        summary: bool,
    },

    /// Show extracted tables, columns, and relationships.
    Schema,

    /// Show questions answered in this session.
    History {
        /// Maximum entries to show.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// System status dashboard.
    Status,

    /// Start the HTTP server and browser UI.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
