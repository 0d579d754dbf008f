//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Browse paginated invoices from a REST API
#[derive(Parser, Debug)]
#[command(name = "invoice-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// API base URL (overrides INVOICE_API_URL and the config file)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load one page of invoices and print it
    List {
        /// Page number
        #[arg(short, long)]
        page: Option<u32>,

        /// Invoices per page
        #[arg(short = 's', long)]
        page_size: Option<u32>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Page through invoices interactively
    Browse {
        /// Starting location (e.g., "/invoices?page=2&pageSize=20")
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Serve a JSON file of invoices with json-server style pagination
    Fixtures {
        /// Port to listen on
        #[arg(short, long, default_value = "3001")]
        port: u16,

        /// JSON file containing an array of invoices
        #[arg(long, default_value = "fixtures/invoices.json")]
        data: PathBuf,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one invoice per line)
    Json,
    /// Human-readable output
    Pretty,
}
