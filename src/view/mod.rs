//! View module
//!
//! A headless rendition of the invoices screens.
//!
//! # Overview
//!
//! `InvoicesApp` plays the host: it resolves locations into screens,
//! keeps a browser-like history, and wires the list's page changes and
//! invoice clicks into that history. Screens render to plain text.

mod app;
mod detail;
pub mod format;
mod invoices;
mod router;

pub use app::{InvoicesApp, Screen};
pub use detail::InvoiceDetail;
pub use invoices::InvoiceList;
pub use router::{
    detail_location, list_location, page_request_from_query, History, Route, LIST_PATH,
};
