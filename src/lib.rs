//! # invoice-pager
//!
//! Paginated invoice browsing against a REST API.
//!
//! ## Features
//!
//! - **Link Header Page Counts**: total pages recovered from `rel="last"`
//! - **Cancel-then-Fetch**: at most one request in flight per view
//! - **Stale-Response Suppression**: superseded responses never touch state
//! - **URL Sync**: `?page=N&pageSize=M` kept in step with the paginator
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_pager::{AppConfig, HttpPageSource, InvoiceList, Invoice, PageRequest, Result};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::default().with_env_overrides();
//!     let source = HttpPageSource::<Invoice>::new(config.http_client()?, "/invoices");
//!
//!     let mut list = InvoiceList::mount(Arc::new(source), PageRequest::new(1, 10));
//!     list.settle().await;
//!     println!("{}", list.render());
//!
//!     list.next_page();
//!     list.settle().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 InvoicesApp (history, routes)                │
//! │   on_page_change → remount     on_invoice_click → push       │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌───────────────────┬──────────┴──────────┬───────────────────┐
//! │  PaginationState  │  FetchCoordinator   │   PageSource      │
//! ├───────────────────┼─────────────────────┼───────────────────┤
//! │ advance / retreat │ cancel-then-fetch   │ GET ?_page&_limit │
//! │ reconcile         │ generation guard    │ Link → total      │
//! └───────────────────┴─────────────────────┴───────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Domain records and host contracts
pub mod types;

/// HTTP client for the invoices API
pub mod http;

/// Paginator state and Link header parsing
pub mod pagination;

/// Cancellable page fetching
pub mod fetch;

/// Headless list and detail screens
pub mod view;

/// Application configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::AppConfig;
pub use error::{Error, Result};
pub use fetch::{FetchCoordinator, FetchOutcome, HttpPageSource, Page, PageSource};
pub use pagination::{PageRequest, PaginationState};
pub use types::*;
pub use view::{InvoiceList, InvoicesApp};
