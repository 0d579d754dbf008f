//! Invoice list view
//!
//! Composes the paginator state with a fetch coordinator. Every change to
//! the requested page goes through `refresh`, which cancels whatever is in
//! flight and issues the new request.

use super::format::{format_amount, format_date};
use crate::fetch::{FetchCoordinator, FetchOutcome, PageSource};
use crate::pagination::{PageRequest, PaginationState};
use crate::types::{Invoice, PageChange};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::debug;

pub(crate) const TITLE: &str = "Invoices 💸";
pub(crate) const LOADING: &str = "Loading...";
pub(crate) const LOAD_FAILED: &str = "Error: Couldn't load invoices";
pub(crate) const NO_DATA: &str = "There are no invoices yet";

/// The paginated invoice list
#[derive(Debug)]
pub struct InvoiceList {
    paginator: PaginationState,
    coordinator: FetchCoordinator<Invoice>,
}

impl InvoiceList {
    /// Mount the list at `request` and start loading it
    pub fn mount(source: Arc<dyn PageSource<Invoice>>, request: PageRequest) -> Self {
        let mut list = Self {
            paginator: PaginationState::new(request),
            coordinator: FetchCoordinator::new(source),
        };
        list.refresh();
        list
    }

    pub fn paginator(&self) -> &PaginationState {
        &self.paginator
    }

    pub fn outcome(&self) -> Option<&FetchOutcome<Invoice>> {
        self.coordinator.outcome()
    }

    pub fn is_loading(&self) -> bool {
        self.coordinator.is_pending()
    }

    /// Invoices of the last successful load
    pub fn invoices(&self) -> &[Invoice] {
        match self.coordinator.outcome() {
            Some(FetchOutcome::Succeeded { items, .. }) => items,
            _ => &[],
        }
    }

    /// Invoice by its position on the current page (0-based)
    pub fn invoice(&self, index: usize) -> Option<&Invoice> {
        self.invoices().get(index)
    }

    pub fn find(&self, id: &str) -> Option<&Invoice> {
        self.invoices().iter().find(|invoice| invoice.id == id)
    }

    /// Go to the next page; returns the change when there was one
    pub fn next_page(&mut self) -> Option<PageChange> {
        if !self.paginator.advance() {
            return None;
        }
        self.refresh();
        Some(self.paginator.request().into())
    }

    /// Go to the previous page; returns the change when there was one
    pub fn previous_page(&mut self) -> Option<PageChange> {
        if !self.paginator.retreat() {
            return None;
        }
        self.refresh();
        Some(self.paginator.request().into())
    }

    /// Re-issue the request for the current page
    pub fn refresh(&mut self) {
        self.coordinator.fetch(self.paginator.request());
    }

    /// Wait for the current request and reconcile the paginator with it.
    ///
    /// Returns `false` when nothing was in flight.
    pub async fn settle(&mut self) -> bool {
        let Some(settled) = self.coordinator.settle().await else {
            return false;
        };

        if let Some(total_pages) = settled.total_pages {
            debug!(
                "Reconciling page {} with {} total pages",
                settled.request.page, total_pages
            );
            self.paginator.reconcile(
                settled.request.page,
                settled.request.page_size,
                total_pages,
            );
        }
        true
    }

    /// Render the list as plain text
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{TITLE}");

        if self.paginator.shows_controls() {
            let _ = writeln!(
                out,
                "{}  {}  Page {} of {}",
                control("Previous", self.paginator.has_previous()),
                control("Next", self.paginator.has_next()),
                self.paginator.current_page(),
                self.paginator.total_pages()
            );
        }
        out.push('\n');

        match self.coordinator.outcome() {
            Some(FetchOutcome::Loading) => {
                let _ = writeln!(out, "{LOADING}");
            }
            Some(FetchOutcome::Failed { .. }) => {
                let _ = writeln!(out, "{LOAD_FAILED}");
            }
            Some(FetchOutcome::Succeeded { items, .. }) if !items.is_empty() => {
                for (i, invoice) in items.iter().enumerate() {
                    let _ = writeln!(
                        out,
                        "{:>3}. {:<28} {:<24} {:>16}",
                        i + 1,
                        invoice.recipient,
                        format_date(&invoice.date),
                        format_amount(&invoice.amount)
                    );
                }
            }
            _ => {
                let _ = writeln!(out, "{NO_DATA}");
            }
        }

        out
    }
}

fn control(label: &str, enabled: bool) -> String {
    if enabled {
        format!("[{label}]")
    } else {
        format!("({label})")
    }
}
