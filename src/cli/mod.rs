//! CLI module
//!
//! Command-line interface for the invoice pager.
//!
//! # Commands
//!
//! - `list` - Load one page and print it
//! - `browse` - Page through invoices interactively
//! - `fixtures` - Serve a local json-server style invoices API

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::{apply_command, BrowseCommand, Runner};
pub use server::{load_fixtures, router, serve, ServerConfig};
